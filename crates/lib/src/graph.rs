//! RDF graph read/write helper.
//!
//! Turtle, N-Triples, and JSON-LD bodies are parsed into a flat list of
//! triples with `sophia` and written back out as Turtle. RDF/XML is not read;
//! requests ask servers for one of the readable serializations instead.
//!
//! Only IRI-valued lookups are needed by the manager and container code, so
//! the helpers here deal in IRI strings.

use std::sync::Arc;

use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::prelude::Iri;
use sophia_api::quad::Spog;
use sophia_api::serializer::{Stringifier, TripleSerializer};
use sophia_api::source::{QuadSource, TripleSource};
use sophia_api::term::{IriRef, SimpleTerm, Term};
use sophia_jsonld::loader::NoLoader;
use sophia_jsonld::{JsonLdOptions, JsonLdParser};
use sophia_turtle::parser::nt::NTriplesParser;
use sophia_turtle::parser::turtle::TurtleParser;
use sophia_turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};
use thiserror::Error;
use url::Url;

use crate::vocab::content_type;

/// Errors raised while reading or writing RDF.
#[derive(Debug, Error)]
pub enum GraphError {
  #[error("failed to parse {content_type} body of {url}: {message}")]
  Parse {
    url: String,
    content_type: String,
    message: String,
  },

  #[error("failed to serialize graph: {0}")]
  Serialize(String),

  #[error("cannot read {0} bodies as a graph")]
  UnsupportedContentType(String),

  #[error("invalid base iri {0}")]
  InvalidBase(String),
}

pub type RdfTriple = [SimpleTerm<'static>; 3];

/// An in-memory RDF graph.
#[derive(Debug, Clone, Default)]
pub struct RdfGraph {
  triples: Vec<RdfTriple>,
}

impl RdfGraph {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse `body` with relative IRIs resolved against `base`.
  ///
  /// Turtle, N-Triples, and JSON-LD are supported; a missing content type is
  /// read as Turtle.
  pub fn parse(body: &str, base: &Url, media_type: Option<&str>) -> Result<Self, GraphError> {
    let media_type = media_type
      .map(content_type::essence)
      .unwrap_or_else(|| content_type::TEXT_TURTLE.to_string());
    let parse_failed = |message: String| GraphError::Parse {
      url: base.to_string(),
      content_type: media_type.clone(),
      message,
    };

    let triples: Vec<RdfTriple> = match media_type.as_str() {
      content_type::TEXT_TURTLE => {
        let base_iri = Iri::new(base.to_string()).map_err(|_| GraphError::InvalidBase(base.to_string()))?;
        let parser = TurtleParser { base: Some(base_iri) };
        parser
          .parse_str(body)
          .collect_triples()
          .map_err(|e| parse_failed(e.to_string()))?
      }
      content_type::N_TRIPLES => NTriplesParser::default()
        .parse_str(body)
        .collect_triples()
        .map_err(|e| parse_failed(e.to_string()))?,
      content_type::LD_JSON => {
        let base_iri =
          Iri::new(Arc::<str>::from(base.as_str())).map_err(|_| GraphError::InvalidBase(base.to_string()))?;
        let parser = JsonLdParser::new_with_options(
          JsonLdOptions::new()
            .with_default_document_loader::<NoLoader>()
            .with_base(base_iri),
        );
        let quads: Vec<Spog<SimpleTerm<'static>>> = parser
          .parse_str(body)
          .collect_quads()
          .map_err(|e| parse_failed(e.to_string()))?;
        // Named graphs carry nothing a manager or container listing needs.
        quads
          .into_iter()
          .filter(|(_, graph)| graph.is_none())
          .map(|(triple, _)| triple)
          .collect()
      }
      other => return Err(GraphError::UnsupportedContentType(other.to_string())),
    };

    Ok(Self { triples })
  }

  /// Serialize the graph as Turtle.
  pub fn to_turtle(&self) -> Result<String, GraphError> {
    let mut serializer = TurtleSerializer::new_stringifier_with_config(TurtleConfig::new().with_pretty(true));
    serializer
      .serialize_graph(&self.triples)
      .map_err(|e| GraphError::Serialize(e.to_string()))?;
    Ok(serializer.as_str().to_string())
  }

  pub fn len(&self) -> usize {
    self.triples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.triples.is_empty()
  }

  /// Add a triple whose three terms are IRIs.
  pub fn add_iri_triple(&mut self, subject: &str, predicate: &str, object: &str) {
    self.triples.push([iri_term(subject), iri_term(predicate), iri_term(object)]);
  }

  /// Objects of `subject predicate ?o` that are IRIs, in document order.
  pub fn iri_objects(&self, subject: &str, predicate: &str) -> Vec<String> {
    self
      .triples
      .iter()
      .filter(|t| is_iri(&t[0], subject) && is_iri(&t[1], predicate))
      .filter_map(|t| iri_of(&t[2]))
      .collect()
  }

  /// First IRI object of `subject predicate ?o`.
  pub fn iri_object(&self, subject: &str, predicate: &str) -> Option<String> {
    self.iri_objects(subject, predicate).into_iter().next()
  }
}

fn iri_term(iri: &str) -> SimpleTerm<'static> {
  IriRef::new_unchecked(iri.to_string()).into_term()
}

fn iri_of(term: &SimpleTerm<'static>) -> Option<String> {
  term.iri().map(|iri| iri.as_str().to_string())
}

fn is_iri(term: &SimpleTerm<'static>, expected: &str) -> bool {
  term.iri().is_some_and(|iri| iri.as_str() == expected)
}
