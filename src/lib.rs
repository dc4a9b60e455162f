//! # YoloFlow
//!
//! Graph codec and layout engine for YOLO-family model configurations.
//!
//! YoloFlow turns the compact layered-list YAML description of a network into
//! an editable node-and-edge graph and back. Records address their inputs by
//! integer index; the graph addresses them by explicit edges and free-form 2-D
//! positions. The codec preserves semantic equivalence across the two
//! representations, and the layout engine gives a freshly decoded graph a
//! stable, readable placement.
//!
//! ## Key pieces
//!
//! - **Config codec**: YAML ⇄ [`config::ModelConfig`], with unknown top-level
//!   keys preserved so real config files round-trip.
//! - **Graph builder**: one node per record, `from` references resolved into
//!   edges, the `head` sequence split into neck and head for display.
//! - **Layout engine**: chains stack vertically; the neck gets layered
//!   longest-path placement with deterministic lane ordering.
//! - **Editor state**: synchronous in-memory mutations (add, remove, move,
//!   connect, edit) over the live graph.
//! - **Document rebuilder**: canonical order from positions, dense
//!   renumbering, `from` fields rewritten from incoming edges.
//! - **Session**: load/save lifecycle over an async version store, with a
//!   stale-save guard.
//!
//! ## Quick start
//!
//! ```
//! use yoloflow::codec::build_graph;
//! use yoloflow::config::ModelConfig;
//! use yoloflow::layout;
//! use yoloflow::registry::ModuleRegistry;
//!
//! let text = r#"
//! nc: 80
//! depth_multiple: 1.0
//! width_multiple: 1.0
//! backbone:
//!   - [-1, 1, Conv, [64]]
//!   - [-1, 1, Conv, [128]]
//! head:
//!   - [[-1, 0], 1, Concat, [1]]
//!   - [-1, 1, Detect, [80]]
//! "#;
//!
//! let registry = ModuleRegistry::default();
//! let config = ModelConfig::from_yaml(text)?;
//! let mut decoded = build_graph(&config, &registry);
//! layout::apply(&mut decoded.graph, &decoded.global_index);
//!
//! assert_eq!(decoded.graph.nodes().len(), 4);
//! assert_eq!(decoded.graph.edges().len(), 4);
//! # Ok::<(), yoloflow::config::ConfigError>(())
//! ```

#![deny(missing_docs)]

/// Bidirectional transform between configs and editor graphs.
pub mod codec;
/// Model configuration types and the YAML codec.
pub mod config;
/// Live editor graph: nodes, edges, and the mutation contract.
pub mod graph;
/// Deterministic placement of decoded graphs.
pub mod layout;
/// Open module-kind registry: display metadata per kind.
pub mod registry;
/// Section tags and the neck/head partition.
pub mod section;
/// Editing session lifecycle: load, mutate, save.
pub mod session;
/// Version record store trait and in-memory implementation.
pub mod store;
