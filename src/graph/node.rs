//! Graph node types.

use crate::config::ArgValue;
use crate::registry::ModuleRegistry;
use crate::section::Section;

/// A 2-D position, local to the owning section frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
  /// Horizontal coordinate.
  pub x: f64,
  /// Vertical coordinate.
  pub y: f64,
}

impl Point {
  /// Creates a point.
  #[must_use]
  pub fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Module payload of a node. `label` and `description` are pure derivations
/// of `(kind, args)` and are recomputed on every edit, never stored
/// authoritatively anywhere else.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeData {
  /// Module kind; an open enumeration.
  pub kind: String,
  /// Ordered constructor arguments.
  pub args: Vec<ArgValue>,
  /// Cached display label.
  pub label: String,
  /// Cached one-line description.
  pub description: String,
}

impl NodeData {
  /// Builds node data for a kind/args pair, deriving the display fields
  /// through the registry.
  #[must_use]
  pub fn derive(kind: impl Into<String>, args: Vec<ArgValue>, registry: &ModuleRegistry) -> Self {
    let kind = kind.into();
    let label = registry.label(&kind, &args);
    let description = registry.describe(&kind, &args);
    Self {
      kind,
      args,
      label,
      description,
    }
  }
}

/// One node of the editor graph.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleNode {
  /// Unique identifier. Stable within one decode cycle only; encode assigns
  /// fresh global indices and ignores the identifier text.
  pub id: String,
  /// Section this node belongs to.
  pub section: Section,
  /// Position local to the section frame.
  pub position: Point,
  /// Module payload and derived display fields.
  pub data: NodeData,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn derive_fills_label_and_description() {
    let registry = ModuleRegistry::default();
    let data = NodeData::derive("SPPF", vec![ArgValue::Int(1024), ArgValue::Int(5)], &registry);
    assert_eq!(data.kind, "SPPF");
    assert_eq!(data.label, "SPPF (1024, 5)");
    assert_eq!(data.description, "spatial pyramid pooling, fast with args [1024, 5]");
  }
}
