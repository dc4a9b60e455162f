//! Section tags and the neck/head partition of the `head` sequence.
//!
//! The document stores two sequences, `backbone` and `head`. For display the
//! `head` sequence is split once more: everything before the first terminal
//! head stage (`Detect` and friends) is the neck, the rest is the head proper.
//! The split is presentation-only; global indices ignore it and always count
//! through `backbone ++ head`.

use std::fmt;

use crate::config::ModuleRecord;
use crate::registry::ModuleRegistry;

/// Which band of the graph a node belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Section {
  /// Feature-extraction trunk; always a linear chain.
  Backbone,
  /// Feature-fusion stage; the only section that may branch and merge.
  Neck,
  /// Terminal prediction stage.
  Head,
}

impl Section {
  /// All sections in display order.
  pub const ALL: [Section; 3] = [Section::Backbone, Section::Neck, Section::Head];

  /// Stable lowercase name, used in node and frame identifiers.
  #[must_use]
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Backbone => "backbone",
      Self::Neck => "neck",
      Self::Head => "head",
    }
  }

  /// Node identifier for the record at `index` within this section.
  #[must_use]
  pub fn node_id(self, index: usize) -> String {
    format!("{}-{}", self.as_str(), index)
  }
}

impl fmt::Display for Section {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Splits the `head` sequence at the first record whose kind the registry
/// flags as a terminal head stage.
///
/// Returns `(neck, head)` sub-slices. Without a marker everything is neck and
/// the head is empty. Must run before index resolution: section-local node ids
/// come from this split, while `from` references keep using global indices.
#[must_use]
pub fn split_head<'a>(
  records: &'a [ModuleRecord],
  registry: &ModuleRegistry,
) -> (&'a [ModuleRecord], &'a [ModuleRecord]) {
  let split = records
    .iter()
    .position(|record| registry.is_head_marker(&record.kind))
    .unwrap_or(records.len());
  records.split_at(split)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ModuleRecord;

  fn record(kind: &str) -> ModuleRecord {
    ModuleRecord::new(-1, 1, kind, Vec::new())
  }

  #[test]
  fn splits_at_first_terminal_stage() {
    let registry = ModuleRegistry::default();
    let records = vec![record("Conv"), record("Concat"), record("Detect")];
    let (neck, head) = split_head(&records, &registry);
    assert_eq!(neck.len(), 2);
    assert_eq!(head.len(), 1);
    assert_eq!(head[0].kind, "Detect");
  }

  #[test]
  fn marker_in_first_position_leaves_empty_neck() {
    let registry = ModuleRegistry::default();
    let records = vec![record("Detect"), record("Conv")];
    let (neck, head) = split_head(&records, &registry);
    assert!(neck.is_empty());
    assert_eq!(head.len(), 2, "everything from the marker on is head");
  }

  #[test]
  fn no_marker_means_everything_is_neck() {
    let registry = ModuleRegistry::default();
    let records = vec![record("Conv"), record("Concat")];
    let (neck, head) = split_head(&records, &registry);
    assert_eq!(neck.len(), 2);
    assert!(head.is_empty());
  }

  #[test]
  fn empty_sequence_splits_into_two_empty_parts() {
    let registry = ModuleRegistry::default();
    let (neck, head) = split_head(&[], &registry);
    assert!(neck.is_empty());
    assert!(head.is_empty());
  }

  #[test]
  fn section_node_ids_are_prefixed() {
    assert_eq!(Section::Backbone.node_id(0), "backbone-0");
    assert_eq!(Section::Neck.node_id(3), "neck-3");
    assert_eq!(Section::Head.to_string(), "head");
  }
}
