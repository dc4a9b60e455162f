//! Graph builder: config → nodes and edges.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::ModelConfig;
use crate::graph::{EditorGraph, GraphEdge, ModuleNode, NodeData, Point};
use crate::registry::ModuleRegistry;
use crate::section::{Section, split_head};

/// A freshly decoded graph plus the global index map that produced it.
///
/// The map ties each node identifier back to its record's global index and is
/// consumed by the layout pass for lane ordering; it is not kept up to date
/// across user edits.
#[derive(Clone, Debug)]
pub struct DecodedGraph {
  /// The editor graph, positions not yet laid out.
  pub graph: EditorGraph,
  /// Node identifier → global record index.
  pub global_index: HashMap<String, usize>,
}

/// Builds the editor graph for a config.
///
/// One node per record, tagged with its section (`backbone`, `neck`, `head`)
/// and a section-local identifier. Every `from` reference is normalized to a
/// list and resolved against the global order (`-1` meaning the previous
/// record); references that resolve outside the document are skipped with a
/// warning rather than failing the decode. Structural rejection of documents
/// without `backbone`/`head` happens earlier, in
/// [`ModelConfig::from_yaml`](crate::config::ModelConfig::from_yaml).
#[must_use]
pub fn build_graph(config: &ModelConfig, registry: &ModuleRegistry) -> DecodedGraph {
  let (neck, tail) = split_head(&config.head, registry);
  let sectioned = config
    .backbone
    .iter()
    .map(|record| (Section::Backbone, record))
    .chain(neck.iter().map(|record| (Section::Neck, record)))
    .chain(tail.iter().map(|record| (Section::Head, record)));

  let mut nodes = Vec::with_capacity(config.module_count());
  let mut ids: Vec<String> = Vec::with_capacity(config.module_count());
  let mut global_index = HashMap::with_capacity(config.module_count());
  let mut local = 0usize;
  let mut current_section = Section::Backbone;
  for (global, (section, record)) in sectioned.enumerate() {
    if section != current_section {
      current_section = section;
      local = 0;
    }
    let id = section.node_id(local);
    local += 1;
    global_index.insert(id.clone(), global);
    nodes.push(ModuleNode {
      id: id.clone(),
      section,
      position: Point::default(),
      data: NodeData::derive(record.kind.clone(), record.args.clone(), registry),
    });
    ids.push(id);
  }

  let mut edges: Vec<GraphEdge> = Vec::new();
  for (global, record) in config.modules().enumerate() {
    let target = &ids[global];
    for &raw in record.inputs.indices() {
      let resolved = if raw == -1 { global as i64 - 1 } else { raw };
      let source = usize::try_from(resolved).ok().and_then(|index| ids.get(index));
      let Some(source) = source else {
        // The first record's `-1` legitimately resolves to nothing.
        if !(raw == -1 && global == 0) {
          warn!(global, raw, "unresolved `from` reference; dropping the edge");
        }
        continue;
      };
      if edges.iter().any(|edge| &edge.source == source && &edge.target == target) {
        debug!(source = %source, target = %target, "duplicate `from` reference");
        continue;
      }
      edges.push(GraphEdge::between(source.clone(), target.clone()));
    }
  }

  DecodedGraph {
    graph: EditorGraph::from_parts(nodes, edges),
    global_index,
  }
}
