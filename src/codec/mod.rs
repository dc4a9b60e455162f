//! Bidirectional transform between model configs and editor graphs.
//!
//! [`decode`] turns a parsed config into nodes and edges, resolving integer
//! `from` references into explicit connections. [`encode`] is the inverse:
//! it re-derives a canonical node order from positions, renumbers the global
//! index space, and rewrites every record's `from` field from the incoming
//! edges. The two directions preserve semantic equivalence; the neck/head
//! presentation split is re-derived on every decode and never persisted.

pub mod decode;
pub mod encode;

pub use decode::{DecodedGraph, build_graph};
pub use encode::rebuild_config;
