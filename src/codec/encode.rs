//! Document rebuilder: editor graph → config.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::config::{FromField, ModelConfig, ModuleRecord};
use crate::graph::{EditorGraph, ModuleNode};
use crate::section::Section;

/// Rebuilds a config from the current graph and the loaded snapshot.
///
/// The canonical record order is recovered from positions: backbone and head
/// sort by vertical position, the neck sorts by horizontal then vertical
/// position, mirroring the layered placement. Concatenating the three gives a
/// fresh dense global index; every `from` field is rewritten from the node's
/// incoming edges mapped to the new indices, sorted ascending. Repeat counts
/// come from the first snapshot record with identical kind and arguments
/// (default 1). Scalars and unrecognized top-level keys are copied from the
/// snapshot untouched; the graph itself is never mutated.
///
/// A node with no incoming edges encodes as `from: -1`, which decode reads as
/// "previous record" for anything but the first record; the warning emitted
/// here marks that the two readings diverge.
#[must_use]
pub fn rebuild_config(graph: &EditorGraph, snapshot: &ModelConfig) -> ModelConfig {
  let mut backbone: Vec<&ModuleNode> = Vec::new();
  let mut neck: Vec<&ModuleNode> = Vec::new();
  let mut head: Vec<&ModuleNode> = Vec::new();
  for node in graph.nodes() {
    match node.section {
      Section::Backbone => backbone.push(node),
      Section::Neck => neck.push(node),
      Section::Head => head.push(node),
    }
  }
  backbone.sort_by(|a, b| by_vertical(a, b));
  neck.sort_by(|a, b| by_layered(a, b));
  head.sort_by(|a, b| by_vertical(a, b));
  let backbone_len = backbone.len();

  let canonical: Vec<&ModuleNode> = backbone
    .into_iter()
    .chain(neck.into_iter())
    .chain(head.into_iter())
    .collect();
  let new_index: HashMap<&str, usize> = canonical
    .iter()
    .enumerate()
    .map(|(index, node)| (node.id.as_str(), index))
    .collect();

  let records: Vec<ModuleRecord> = canonical
    .iter()
    .enumerate()
    .map(|(index, node)| {
      let mut sources: Vec<i64> = graph
        .edges()
        .iter()
        .filter(|edge| edge.target == node.id)
        .filter_map(|edge| new_index.get(edge.source.as_str()))
        .map(|&source| source as i64)
        .collect();
      sources.sort_unstable();
      sources.dedup();
      let inputs = match sources.len() {
        0 => {
          if index > 0 {
            warn!(
              node = %node.id,
              "no incoming edges; `from: -1` will read as \"previous record\" on decode"
            );
          }
          FromField::Single(-1)
        }
        1 => FromField::Single(sources[0]),
        _ => FromField::Many(sources),
      };
      ModuleRecord {
        inputs,
        repeat: recover_repeat(snapshot, node),
        kind: node.data.kind.clone(),
        args: node.data.args.clone(),
      }
    })
    .collect();

  let mut backbone_records = records;
  let head_records = backbone_records.split_off(backbone_len);
  ModelConfig {
    class_count: snapshot.class_count,
    depth_multiple: snapshot.depth_multiple,
    width_multiple: snapshot.width_multiple,
    backbone: backbone_records,
    head: head_records,
    extra: snapshot.extra.clone(),
  }
}

fn by_vertical(a: &ModuleNode, b: &ModuleNode) -> Ordering {
  a.position
    .y
    .total_cmp(&b.position.y)
    .then_with(|| a.position.x.total_cmp(&b.position.x))
    .then_with(|| a.id.cmp(&b.id))
}

fn by_layered(a: &ModuleNode, b: &ModuleNode) -> Ordering {
  a.position
    .x
    .total_cmp(&b.position.x)
    .then_with(|| a.position.y.total_cmp(&b.position.y))
    .then_with(|| a.id.cmp(&b.id))
}

/// Best-effort repeat recovery: the first snapshot record with identical kind
/// and arguments wins; nodes with no match fall back to 1.
fn recover_repeat(snapshot: &ModelConfig, node: &ModuleNode) -> u32 {
  match snapshot
    .modules()
    .find(|record| record.kind == node.data.kind && record.args == node.data.args)
  {
    Some(record) => record.repeat,
    None => {
      debug!(node = %node.id, kind = %node.data.kind, "no matching record; repeat defaults to 1");
      1
    }
  }
}
