//! Deterministic placement of decoded graphs.
//!
//! Backbone and head are strictly linear chains and stack vertically, one row
//! per node. The neck is the only section that may branch and merge, so it
//! gets a layered pass: each node's **level** is the longest path, in edge
//! count, from a node with no neck-internal predecessor; levels run left to
//! right, and nodes sharing a level are ordered into **lanes** by the minimum
//! global index among their inputs, which keeps topologically related nodes
//! adjacent. Section frames are sized to their members plus padding and stack
//! left to right.
//!
//! The whole pass is a pure function of the node/edge set and the decode-time
//! global index map: running it twice without intervening edits yields
//! identical coordinates.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::graph::{EditorGraph, Point};
use crate::section::Section;

/// Nominal node width used for frame sizing.
pub const NODE_WIDTH: f64 = 160.0;
/// Nominal node height used for frame sizing.
pub const NODE_HEIGHT: f64 = 48.0;
/// Vertical distance between consecutive rows and lanes.
pub const ROW_STEP: f64 = 96.0;
/// Horizontal distance between consecutive neck levels.
pub const LEVEL_STEP: f64 = 220.0;
/// Padding between a frame border and its members, on all sides.
pub const FRAME_PADDING: f64 = 32.0;
/// Horizontal gap between adjacent section frames.
pub const FRAME_GUTTER: f64 = 64.0;

/// Presentation-only bounding container of one section.
///
/// Frames own no nodes; they are recomputed by every layout pass and by every
/// change to a section's membership. A frame with no members is hidden.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionFrame {
  /// The section this frame groups.
  pub section: Section,
  /// Top-left corner on the canvas.
  pub origin: Point,
  /// Frame width.
  pub width: f64,
  /// Frame height.
  pub height: f64,
  /// Whether the frame has no members and should not be rendered.
  pub hidden: bool,
}

/// Runs the full layout pass: chain placement for backbone and head, layered
/// placement for the neck, then a frame refresh.
///
/// `global_index` is the decode-time map from node identifier to global
/// record index; it drives lane ordering inside the neck.
pub fn apply(graph: &mut EditorGraph, global_index: &HashMap<String, usize>) {
  trace!(nodes = graph.nodes().len(), edges = graph.edges().len(), "layout pass");
  place_chain(graph, Section::Backbone);
  place_neck(graph, global_index);
  place_chain(graph, Section::Head);
  refresh_frames(graph);
}

/// Recomputes the section frames from current node positions.
///
/// Members are translated so the section's local coordinates start at the
/// padding offset; frames stack left to right with a fixed gutter. Sections
/// with no members get a hidden zero-size frame.
pub fn refresh_frames(graph: &mut EditorGraph) {
  let mut frames = Vec::with_capacity(Section::ALL.len());
  let mut cursor_x = 0.0;
  for section in Section::ALL {
    let mut bounds: Option<(f64, f64, f64, f64)> = None;
    for node in graph.nodes().iter().filter(|node| node.section == section) {
      let p = node.position;
      bounds = Some(match bounds {
        None => (p.x, p.y, p.x, p.y),
        Some((min_x, min_y, max_x, max_y)) => {
          (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
        }
      });
    }
    let Some((min_x, min_y, max_x, max_y)) = bounds else {
      frames.push(SectionFrame {
        section,
        origin: Point::new(cursor_x, 0.0),
        width: 0.0,
        height: 0.0,
        hidden: true,
      });
      continue;
    };
    let dx = FRAME_PADDING - min_x;
    let dy = FRAME_PADDING - min_y;
    if dx != 0.0 || dy != 0.0 {
      for node in graph.nodes_mut() {
        if node.section == section {
          node.position.x += dx;
          node.position.y += dy;
        }
      }
    }
    let width = (max_x - min_x) + NODE_WIDTH + 2.0 * FRAME_PADDING;
    let height = (max_y - min_y) + NODE_HEIGHT + 2.0 * FRAME_PADDING;
    frames.push(SectionFrame {
      section,
      origin: Point::new(cursor_x, 0.0),
      width,
      height,
      hidden: false,
    });
    cursor_x += width + FRAME_GUTTER;
  }
  graph.set_frames(frames);
}

/// Places a linear-chain section: one row per node, in graph order.
fn place_chain(graph: &mut EditorGraph, section: Section) {
  let mut row = 0usize;
  for node in graph.nodes_mut() {
    if node.section != section {
      continue;
    }
    node.position = Point::new(FRAME_PADDING, FRAME_PADDING + row as f64 * ROW_STEP);
    row += 1;
  }
}

/// Places the neck with the layered algorithm: level → x, lane → y.
fn place_neck(graph: &mut EditorGraph, global_index: &HashMap<String, usize>) {
  let neck_ids: Vec<String> = graph
    .nodes()
    .iter()
    .filter(|node| node.section == Section::Neck)
    .map(|node| node.id.clone())
    .collect();
  if neck_ids.is_empty() {
    return;
  }
  let in_neck: HashSet<&str> = neck_ids.iter().map(String::as_str).collect();

  // Neck-internal predecessor lists; edges from other sections count as
  // level-0 inputs and are left out here.
  let mut preds: HashMap<String, Vec<String>> = HashMap::new();
  let mut min_incoming: HashMap<String, usize> = HashMap::new();
  for edge in graph.edges() {
    if !in_neck.contains(edge.target.as_str()) {
      continue;
    }
    if in_neck.contains(edge.source.as_str()) {
      preds
        .entry(edge.target.clone())
        .or_default()
        .push(edge.source.clone());
    }
    if let Some(&source_global) = global_index.get(edge.source.as_str()) {
      min_incoming
        .entry(edge.target.clone())
        .and_modify(|min| *min = (*min).min(source_global))
        .or_insert(source_global);
    }
  }

  let levels = longest_levels(&neck_ids, &preds);

  let mut bands: BTreeMap<usize, Vec<(usize, String)>> = BTreeMap::new();
  for id in &neck_ids {
    let level = levels.get(id).copied().unwrap_or(0);
    let lane_key = min_incoming
      .get(id)
      .copied()
      .or_else(|| global_index.get(id).copied())
      .unwrap_or(usize::MAX);
    bands.entry(level).or_default().push((lane_key, id.clone()));
  }

  let mut positions: HashMap<String, Point> = HashMap::new();
  for (level, mut members) in bands {
    members.sort();
    for (lane, (_, id)) in members.into_iter().enumerate() {
      positions.insert(
        id,
        Point::new(
          FRAME_PADDING + level as f64 * LEVEL_STEP,
          FRAME_PADDING + lane as f64 * ROW_STEP,
        ),
      );
    }
  }
  for node in graph.nodes_mut() {
    if let Some(position) = positions.get(&node.id) {
      node.position = *position;
    }
  }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
  Visiting,
  Done,
}

/// Longest-path level per node, iteratively with a memo table and an
/// in-progress marker set.
///
/// A predecessor revisited on the current path counts as level 0; the walk
/// terminates on every input, cyclic or not.
fn longest_levels(
  order: &[String],
  preds: &HashMap<String, Vec<String>>,
) -> HashMap<String, usize> {
  let mut levels: HashMap<String, usize> = HashMap::new();
  let mut marks: HashMap<&str, Mark> = HashMap::new();
  for start in order {
    if marks.get(start.as_str()) == Some(&Mark::Done) {
      continue;
    }
    let mut stack: Vec<&str> = vec![start.as_str()];
    while let Some(&id) = stack.last() {
      if marks.get(id) == Some(&Mark::Done) {
        stack.pop();
        continue;
      }
      marks.insert(id, Mark::Visiting);
      let mut ready = true;
      let mut level = 0usize;
      for pred in preds.get(id).map(Vec::as_slice).unwrap_or(&[]) {
        match marks.get(pred.as_str()) {
          Some(Mark::Done) => level = level.max(levels[pred.as_str()] + 1),
          Some(Mark::Visiting) => {
            debug!(node = id, pred = pred.as_str(), "cycle in level computation");
            level = level.max(1);
          }
          None => {
            stack.push(pred.as_str());
            ready = false;
          }
        }
      }
      if ready {
        levels.insert(id.to_string(), level);
        marks.insert(id, Mark::Done);
        stack.pop();
      }
    }
  }
  levels
}
