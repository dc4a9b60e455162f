//! Live editor graph for model architectures.
//!
//! The graph is the sole target of user mutation: nodes carry a section tag,
//! a free-form 2-D position, and display data derived from their module kind
//! and arguments; edges connect node identifiers. It is fully decoupled from
//! the config it was decoded from.

pub mod edge;
pub mod editor;
pub mod node;

pub use edge::GraphEdge;
pub use editor::{EditorGraph, GraphError};
pub use node::{ModuleNode, NodeData, Point};
