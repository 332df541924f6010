//! Namespaces, link relations, header names, and URL conventions.

/// Linked Data Platform vocabulary.
pub mod ldp {
  pub const CONTAINER: &str = "http://www.w3.org/ns/ldp#Container";
  pub const BASIC_CONTAINER: &str = "http://www.w3.org/ns/ldp#BasicContainer";
  pub const RESOURCE: &str = "http://www.w3.org/ns/ldp#Resource";
  pub const CONTAINS: &str = "http://www.w3.org/ns/ldp#contains";
}

/// RDF core vocabulary.
pub mod rdf {
  pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
}

/// Shape tree vocabulary used in manager documents.
pub mod shapetree {
  pub const MANAGER: &str = "http://www.w3.org/ns/shapetrees#Manager";
  pub const ASSIGNMENT: &str = "http://www.w3.org/ns/shapetrees#Assignment";
  pub const HAS_ASSIGNMENT: &str = "http://www.w3.org/ns/shapetrees#hasAssignment";
  pub const ASSIGNS: &str = "http://www.w3.org/ns/shapetrees#assigns";
  pub const MANAGES: &str = "http://www.w3.org/ns/shapetrees#manages";
  pub const MANAGED_BY: &str = "http://www.w3.org/ns/shapetrees#managedBy";
  pub const HAS_ROOT_ASSIGNMENT: &str = "http://www.w3.org/ns/shapetrees#hasRootAssignment";
  pub const FOCUS_NODE: &str = "http://www.w3.org/ns/shapetrees#focusNode";
  pub const SHAPE: &str = "http://www.w3.org/ns/shapetrees#shape";
}

/// Link header relation types.
pub mod rel {
  pub const TYPE: &str = "type";
  pub const MANAGED_BY: &str = "managedBy";
  pub const MANAGES: &str = "manages";
  pub const FOCUS_NODE: &str = "focusNode";
  pub const TARGET_SHAPETREE: &str = "target-shapetree";
}

/// HTTP header names, lowercase.
pub mod header {
  pub const ACCEPT: &str = "accept";
  pub const AUTHORIZATION: &str = "authorization";
  pub const CONTENT_TYPE: &str = "content-type";
  pub const LINK: &str = "link";
  pub const LOCATION: &str = "location";
  pub const ORIGIN: &str = "origin";
  pub const SLUG: &str = "slug";
}

/// Media types the client produces or recognises.
pub mod content_type {
  pub const TEXT_TURTLE: &str = "text/turtle";
  pub const RDF_XML: &str = "application/rdf+xml";
  pub const N_TRIPLES: &str = "application/n-triples";
  pub const LD_JSON: &str = "application/ld+json";
  pub const SPARQL_UPDATE: &str = "application/sparql-update";

  /// Serializations classified as RDF resources.
  pub const RDF_TYPES: [&str; 4] = [TEXT_TURTLE, RDF_XML, N_TRIPLES, LD_JSON];

  /// `Accept` value for reads, limited to serializations the graph reader parses.
  pub const ACCEPT_READABLE_RDF: &str = "text/turtle, application/n-triples;q=0.9, application/ld+json;q=0.8";

  /// Strip parameters and normalise case: `Text/Turtle; charset=utf-8` -> `text/turtle`.
  pub fn essence(value: &str) -> String {
    value
      .split(';')
      .next()
      .unwrap_or_default()
      .trim()
      .to_ascii_lowercase()
  }

  pub fn is_rdf(value: &str) -> bool {
    RDF_TYPES.contains(&essence(value).as_str())
  }
}

/// Path suffix identifying a manager document.
pub const MANAGER_SUFFIX: &str = ".shapetree";

/// Query marker identifying a manager document on servers that use query addressing.
pub const MANAGER_QUERY_MARKER: &str = "ext=shapetree";

/// Fragment prefix for minted assignment URLs.
pub const ASSIGNMENT_FRAGMENT_PREFIX: &str = "ln-";
