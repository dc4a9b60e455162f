//! Graph edge type.

/// A directed edge between two node identifiers.
///
/// Both endpoints must exist in the owning graph's node set; operations that
/// remove nodes drop every touching edge rather than leave it dangling.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GraphEdge {
  /// Unique edge identifier, derived from the endpoints.
  pub id: String,
  /// Source node identifier.
  pub source: String,
  /// Target node identifier.
  pub target: String,
}

impl GraphEdge {
  /// Creates the edge `source → target`.
  #[must_use]
  pub fn between(source: impl Into<String>, target: impl Into<String>) -> Self {
    let source = source.into();
    let target = target.into();
    Self {
      id: format!("e-{source}-{target}"),
      source,
      target,
    }
  }

  /// Whether either endpoint is `node_id`.
  #[must_use]
  pub fn touches(&self, node_id: &str) -> bool {
    self.source == node_id || self.target == node_id
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn between_derives_a_stable_id() {
    let edge = GraphEdge::between("backbone-0", "backbone-1");
    assert_eq!(edge.id, "e-backbone-0-backbone-1");
    assert!(edge.touches("backbone-0"));
    assert!(edge.touches("backbone-1"));
    assert!(!edge.touches("backbone-2"));
  }
}
