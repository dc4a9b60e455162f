//! The live, mutable editor graph and its mutation contract.
//!
//! All mutations are synchronous and in-memory. They touch only the graph:
//! the config a graph was decoded from stays behind as an immutable snapshot
//! and is consulted again only on save. Moving a node changes its position and
//! nothing else; adding or removing a node refreshes the section frames so
//! they are never stale with respect to section membership.

use tracing::trace;

use crate::config::ArgValue;
use crate::graph::edge::GraphEdge;
use crate::graph::node::{ModuleNode, NodeData, Point};
use crate::layout::{self, SectionFrame};
use crate::registry::ModuleRegistry;
use crate::section::Section;

/// Error from a graph mutation.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
  /// A mutation referenced a node identifier not present in the graph.
  #[error("unknown node `{0}`")]
  UnknownNode(String),
}

/// The live node/edge set the user manipulates.
#[derive(Clone, Debug, Default)]
pub struct EditorGraph {
  nodes: Vec<ModuleNode>,
  edges: Vec<GraphEdge>,
  frames: Vec<SectionFrame>,
  next_local: u64,
}

impl EditorGraph {
  /// Builds a graph from decoded parts. Frames stay empty until a layout pass
  /// fills them.
  #[must_use]
  pub fn from_parts(nodes: Vec<ModuleNode>, edges: Vec<GraphEdge>) -> Self {
    Self {
      nodes,
      edges,
      frames: Vec::new(),
      next_local: 0,
    }
  }

  /// All nodes, in insertion order (decode order for decoded graphs).
  #[must_use]
  pub fn nodes(&self) -> &[ModuleNode] {
    &self.nodes
  }

  /// All edges.
  #[must_use]
  pub fn edges(&self) -> &[GraphEdge] {
    &self.edges
  }

  /// Section frames from the most recent layout or frame refresh. Hidden
  /// frames belong to sections with no members.
  #[must_use]
  pub fn frames(&self) -> &[SectionFrame] {
    &self.frames
  }

  /// Looks up a node by identifier.
  #[must_use]
  pub fn node(&self, id: &str) -> Option<&ModuleNode> {
    self.nodes.iter().find(|node| node.id == id)
  }

  pub(crate) fn nodes_mut(&mut self) -> &mut [ModuleNode] {
    &mut self.nodes
  }

  pub(crate) fn set_frames(&mut self, frames: Vec<SectionFrame>) {
    self.frames = frames;
  }

  /// Adds a node from a module-kind template and returns its identifier.
  ///
  /// The identifier is fresh and never collides with decode-produced ids.
  pub fn add_node(
    &mut self,
    section: Section,
    kind: &str,
    args: Vec<ArgValue>,
    position: Point,
    registry: &ModuleRegistry,
  ) -> String {
    let id = format!("{}-u{}", section.as_str(), self.next_local);
    self.next_local += 1;
    trace!(id = %id, kind, "add node");
    self.nodes.push(ModuleNode {
      id: id.clone(),
      section,
      position,
      data: NodeData::derive(kind, args, registry),
    });
    layout::refresh_frames(self);
    id
  }

  /// Removes a node together with every edge touching it.
  pub fn remove_node(&mut self, id: &str) -> Result<ModuleNode, GraphError> {
    let index = self
      .nodes
      .iter()
      .position(|node| node.id == id)
      .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
    let node = self.nodes.remove(index);
    self.edges.retain(|edge| !edge.touches(id));
    trace!(id, "remove node");
    layout::refresh_frames(self);
    Ok(node)
  }

  /// Moves a node. Position only; edges, data, and layout are untouched.
  pub fn move_node(&mut self, id: &str, position: Point) -> Result<(), GraphError> {
    let node = self
      .nodes
      .iter_mut()
      .find(|node| node.id == id)
      .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
    node.position = position;
    Ok(())
  }

  /// Connects `source → target`. Returns `false` when an identical edge
  /// already exists (the graph is left unchanged).
  pub fn connect(&mut self, source: &str, target: &str) -> Result<bool, GraphError> {
    for endpoint in [source, target] {
      if self.node(endpoint).is_none() {
        return Err(GraphError::UnknownNode(endpoint.to_string()));
      }
    }
    let duplicate = self
      .edges
      .iter()
      .any(|edge| edge.source == source && edge.target == target);
    if duplicate {
      return Ok(false);
    }
    self.edges.push(GraphEdge::between(source, target));
    Ok(true)
  }

  /// Replaces a node's module kind and arguments, re-deriving the display
  /// fields. Position and edges are untouched.
  pub fn update_module(
    &mut self,
    id: &str,
    kind: &str,
    args: Vec<ArgValue>,
    registry: &ModuleRegistry,
  ) -> Result<(), GraphError> {
    let node = self
      .nodes
      .iter_mut()
      .find(|node| node.id == id)
      .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
    node.data = NodeData::derive(kind, args, registry);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample_graph() -> EditorGraph {
    let registry = ModuleRegistry::default();
    let mut graph = EditorGraph::default();
    let a = graph.add_node(
      Section::Backbone,
      "Conv",
      vec![ArgValue::Int(64)],
      Point::new(0.0, 0.0),
      &registry,
    );
    let b = graph.add_node(
      Section::Backbone,
      "Conv",
      vec![ArgValue::Int(128)],
      Point::new(0.0, 96.0),
      &registry,
    );
    let c = graph.add_node(Section::Neck, "Concat", Vec::new(), Point::new(0.0, 0.0), &registry);
    graph.connect(&a, &b).expect("connect");
    graph.connect(&b, &c).expect("connect");
    graph.connect(&a, &c).expect("connect");
    graph
  }

  #[test]
  fn removing_a_node_drops_every_touching_edge() {
    let mut graph = sample_graph();
    let victim = graph.nodes()[1].id.clone();
    graph.remove_node(&victim).expect("remove");
    assert_eq!(graph.nodes().len(), 2);
    assert!(
      graph.edges().iter().all(|edge| !edge.touches(&victim)),
      "edges: {:?}",
      graph.edges()
    );
    // The untouched a → c edge must survive.
    assert_eq!(graph.edges().len(), 1);
  }

  #[test]
  fn every_edge_keeps_both_endpoints_after_mutations() {
    let mut graph = sample_graph();
    let victim = graph.nodes()[0].id.clone();
    graph.remove_node(&victim).expect("remove");
    for edge in graph.edges() {
      assert!(graph.node(&edge.source).is_some());
      assert!(graph.node(&edge.target).is_some());
    }
  }

  #[test]
  fn connect_rejects_unknown_endpoints_and_duplicates() {
    let mut graph = sample_graph();
    let a = graph.nodes()[0].id.clone();
    let b = graph.nodes()[1].id.clone();
    assert!(matches!(
      graph.connect(&a, "nope"),
      Err(GraphError::UnknownNode(_))
    ));
    assert_eq!(graph.connect(&a, &b).expect("connect"), false, "duplicate");
    assert_eq!(graph.edges().len(), 3);
  }

  #[test]
  fn move_changes_position_only() {
    let mut graph = sample_graph();
    let id = graph.nodes()[0].id.clone();
    let edges_before = graph.edges().to_vec();
    graph.move_node(&id, Point::new(42.0, 7.0)).expect("move");
    let node = graph.node(&id).expect("node");
    assert_eq!(node.position, Point::new(42.0, 7.0));
    assert_eq!(graph.edges(), edges_before.as_slice());
  }

  #[test]
  fn update_module_rederives_display_fields() {
    let mut graph = sample_graph();
    let registry = ModuleRegistry::default();
    let id = graph.nodes()[0].id.clone();
    let position = graph.node(&id).expect("node").position;
    graph
      .update_module(&id, "SPPF", vec![ArgValue::Int(1024), ArgValue::Int(5)], &registry)
      .expect("update");
    let node = graph.node(&id).expect("node");
    assert_eq!(node.data.kind, "SPPF");
    assert_eq!(node.data.label, "SPPF (1024, 5)");
    assert_eq!(node.position, position, "position untouched");
  }

  #[test]
  fn added_nodes_get_fresh_ids() {
    let graph = sample_graph();
    let ids: Vec<_> = graph.nodes().iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["backbone-u0", "backbone-u1", "neck-u2"]);
  }
}
