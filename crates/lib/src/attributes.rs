//! Case-insensitive, multi-valued attribute store for headers and metadata.
//!
//! [`ResourceAttributes`] holds HTTP header values on both sides of a request
//! and the decomposed form of `Link` headers, keyed by relation type.
//!
//! # Invariants
//!
//! - Keys compare case-insensitively (they are stored lowercased).
//! - No key maps to an empty sequence of values.
//! - Empty keys or values are ignored.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// One `<target>; params` entry of a Link header. Quoted parameter values may
/// contain `,` and `;`.
static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r#"<([^>]*)>\s*((?:;\s*[^;,="]+(?:=\s*(?:"[^"]*"|[^;,]*))?)*)"#).unwrap()
});

/// One `; name[=value]` parameter, value quoted or bare.
static PARAM_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r#";\s*([^;,="\s]+)\s*(?:=\s*(?:"([^"]*)"|([^;,]*)))?"#).unwrap());

/// Ordered, case-insensitive mapping from attribute name to its values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceAttributes {
  values: BTreeMap<String, Vec<String>>,
}

impl ResourceAttributes {
  pub fn new() -> Self {
    Self::default()
  }

  /// Create a store holding a single key/value pair.
  pub fn with(key: &str, value: &str) -> Self {
    let mut attributes = Self::new();
    attributes.set(key, value);
    attributes
  }

  /// Append `value` under `key` unless that exact value is already present.
  ///
  /// A no-op when either argument is empty, so setting the same pair twice
  /// leaves a single value.
  pub fn set(&mut self, key: &str, value: &str) {
    if key.is_empty() || value.is_empty() {
      return;
    }
    let entry = self.values.entry(key.to_ascii_lowercase()).or_default();
    if !entry.iter().any(|existing| existing == value) {
      entry.push(value.to_string());
    }
  }

  /// Append `value` under `key` without de-duplication.
  ///
  /// Used for headers that legitimately repeat, such as `Link`.
  pub fn add(&mut self, key: &str, value: &str) {
    if key.is_empty() || value.is_empty() {
      return;
    }
    self
      .values
      .entry(key.to_ascii_lowercase())
      .or_default()
      .push(value.to_string());
  }

  /// Replace every value under `key` with `value`.
  pub fn replace(&mut self, key: &str, value: &str) {
    if key.is_empty() || value.is_empty() {
      return;
    }
    self.values.insert(key.to_ascii_lowercase(), vec![value.to_string()]);
  }

  pub fn remove(&mut self, key: &str) -> Option<Vec<String>> {
    self.values.remove(&key.to_ascii_lowercase())
  }

  /// The first value recorded for `key`.
  pub fn first_value(&self, key: &str) -> Option<&str> {
    self
      .values
      .get(&key.to_ascii_lowercase())
      .and_then(|values| values.first())
      .map(String::as_str)
  }

  /// All values recorded for `key`, or an empty slice.
  pub fn all_values(&self, key: &str) -> &[String] {
    self
      .values
      .get(&key.to_ascii_lowercase())
      .map(Vec::as_slice)
      .unwrap_or_default()
  }

  pub fn contains_key(&self, key: &str) -> bool {
    self.values.contains_key(&key.to_ascii_lowercase())
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  /// Iterate over `(key, values)` pairs in key order.
  pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
    self.values.iter().map(|(key, values)| (key.as_str(), values.as_slice()))
  }

  /// Copy every value from `other` into this store with `add` semantics.
  pub fn extend_from(&mut self, other: &ResourceAttributes) {
    for (key, values) in other.iter() {
      for value in values {
        self.add(key, value);
      }
    }
  }

  /// Decompose raw `Link` header values into a store keyed by relation type.
  ///
  /// Each header value may carry several comma-separated links, and a `rel`
  /// parameter may name several space-separated relations. The bracketed
  /// target becomes the value for every relation it is linked under. Links
  /// without a `rel` parameter are dropped.
  ///
  /// ```
  /// use shapetrees_lib::attributes::ResourceAttributes;
  ///
  /// let links = ResourceAttributes::parse_link_headers([
  ///   r#"<http://www.w3.org/ns/ldp#BasicContainer>; rel="type""#,
  ///   r#"<https://pod.example/data/.shapetree>; rel="managedBy""#,
  /// ]);
  /// assert_eq!(links.first_value("managedBy"), Some("https://pod.example/data/.shapetree"));
  /// ```
  pub fn parse_link_headers<I, S>(headers: I) -> ResourceAttributes
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    let mut links = ResourceAttributes::new();
    for header in headers {
      for link in LINK_RE.captures_iter(header.as_ref()) {
        let target = link[1].trim();
        let params = link.get(2).map(|m| m.as_str()).unwrap_or_default();
        for param in PARAM_RE.captures_iter(params) {
          if !param[1].eq_ignore_ascii_case("rel") {
            continue;
          }
          let relations = param.get(2).or_else(|| param.get(3)).map(|m| m.as_str()).unwrap_or_default();
          for relation in relations.split_whitespace() {
            links.add(relation, target);
          }
        }
      }
    }
    links
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn set_is_idempotent() {
    let mut attributes = ResourceAttributes::new();
    attributes.set("Slug", "notes");
    attributes.set("Slug", "notes");
    assert_eq!(attributes.all_values("slug"), ["notes".to_string()]);
  }

  #[test]
  fn add_keeps_duplicates() {
    let mut attributes = ResourceAttributes::new();
    attributes.add("Link", "<a>; rel=\"type\"");
    attributes.add("link", "<a>; rel=\"type\"");
    assert_eq!(attributes.all_values("LINK").len(), 2);
  }

  #[test]
  fn empty_keys_and_values_are_ignored() {
    let mut attributes = ResourceAttributes::new();
    attributes.set("", "value");
    attributes.set("key", "");
    attributes.add("", "value");
    attributes.add("key", "");
    assert!(attributes.is_empty());
    assert!(!attributes.contains_key("key"));
  }

  #[test]
  fn lookups_are_case_insensitive() {
    let attributes = ResourceAttributes::with("Content-Type", "text/turtle");
    assert_eq!(attributes.first_value("content-type"), Some("text/turtle"));
    assert_eq!(attributes.first_value("CONTENT-TYPE"), Some("text/turtle"));
    assert!(attributes.first_value("accept").is_none());
    assert!(attributes.all_values("accept").is_empty());
  }

  #[test]
  fn replace_and_remove() {
    let mut attributes = ResourceAttributes::new();
    attributes.add("Accept", "text/turtle");
    attributes.add("Accept", "application/ld+json");
    attributes.replace("accept", "application/n-triples");
    assert_eq!(attributes.all_values("accept"), ["application/n-triples".to_string()]);
    assert!(attributes.remove("ACCEPT").is_some());
    assert!(attributes.is_empty());
  }

  #[test]
  fn parse_single_link() {
    let links = ResourceAttributes::parse_link_headers([r#"<http://www.w3.org/ns/ldp#Container>; rel="type""#]);
    assert_eq!(links.first_value("type"), Some("http://www.w3.org/ns/ldp#Container"));
  }

  #[test]
  fn parse_comma_separated_links() {
    let links = ResourceAttributes::parse_link_headers([
      r#"<http://www.w3.org/ns/ldp#BasicContainer>; rel="type", <http://www.w3.org/ns/ldp#Resource>; rel="type""#,
    ]);
    assert_eq!(
      links.all_values("type"),
      [
        "http://www.w3.org/ns/ldp#BasicContainer".to_string(),
        "http://www.w3.org/ns/ldp#Resource".to_string()
      ]
    );
  }

  #[test]
  fn parse_multiple_relations_and_bare_rel() {
    let links = ResourceAttributes::parse_link_headers([
      r#"<https://pod.example/a.shapetree>; title="mgr"; rel="managedBy describedby""#,
      "<https://pod.example/a>; rel=manages",
    ]);
    assert_eq!(links.first_value("managedBy"), Some("https://pod.example/a.shapetree"));
    assert_eq!(links.first_value("describedby"), Some("https://pod.example/a.shapetree"));
    assert_eq!(links.first_value("manages"), Some("https://pod.example/a"));
  }

  #[test]
  fn parse_quoted_params_with_separators() {
    let links = ResourceAttributes::parse_link_headers([
      r#"<https://pod.example/x>; title="a, b; c"; rel="type", <https://pod.example/y.shapetree>; REL=managedBy"#,
    ]);
    assert_eq!(links.first_value("type"), Some("https://pod.example/x"));
    assert_eq!(links.first_value("managedBy"), Some("https://pod.example/y.shapetree"));
    assert_eq!(links.len(), 2);
  }

  #[test]
  fn parse_ignores_links_without_rel() {
    let links = ResourceAttributes::parse_link_headers([r#"<https://pod.example/x>; title="no rel""#, "garbage"]);
    assert!(links.is_empty());
  }
}
