//! End-to-end codec tests over a complete YOLOv5-P5 configuration:
//! decode → layout → encode → decode, with zero graph edits.

use yoloflow::codec::{build_graph, rebuild_config};
use yoloflow::config::{FromField, ModelConfig};
use yoloflow::graph::EditorGraph;
use yoloflow::layout;
use yoloflow::registry::ModuleRegistry;
use yoloflow::section::Section;

const YOLOV5: &str = r#"
nc: 80
depth_multiple: 0.33
width_multiple: 0.50
anchors:
  - [10, 13, 16, 30, 33, 23]
  - [30, 61, 62, 45, 59, 119]
  - [116, 90, 156, 198, 373, 326]

backbone:
  [[-1, 1, Conv, [64, 6, 2, 2]],
   [-1, 1, Conv, [128, 3, 2]],
   [-1, 3, C3, [128]],
   [-1, 1, Conv, [256, 3, 2]],
   [-1, 6, C3, [256]],
   [-1, 1, Conv, [512, 3, 2]],
   [-1, 9, C3, [512]],
   [-1, 1, Conv, [1024, 3, 2]],
   [-1, 3, C3, [1024]],
   [-1, 1, SPPF, [1024, 5]]]

head:
  [[-1, 1, Conv, [512, 1, 1]],
   [-1, 1, nn.Upsample, [None, 2, nearest]],
   [[-1, 6], 1, Concat, [1]],
   [-1, 3, C3, [512, False]],
   [-1, 1, Conv, [256, 1, 1]],
   [-1, 1, nn.Upsample, [None, 2, nearest]],
   [[-1, 4], 1, Concat, [1]],
   [-1, 3, C3, [256, False]],
   [-1, 1, Conv, [256, 3, 2]],
   [[-1, 14], 1, Concat, [1]],
   [-1, 3, C3, [512, False]],
   [-1, 1, Conv, [512, 3, 2]],
   [[-1, 10], 1, Concat, [1]],
   [-1, 3, C3, [1024, False]],
   [[17, 20, 23], 1, Detect, [nc, anchors]]]
"#;

fn edge_pairs(graph: &EditorGraph) -> Vec<(String, String)> {
  let mut pairs: Vec<_> = graph
    .edges()
    .iter()
    .map(|edge| (edge.source.clone(), edge.target.clone()))
    .collect();
  pairs.sort();
  pairs
}

#[test]
fn decodes_the_full_model_into_three_sections() {
  let registry = ModuleRegistry::default();
  let config = ModelConfig::from_yaml(YOLOV5).expect("parse");
  let decoded = build_graph(&config, &registry);
  let graph = &decoded.graph;

  assert_eq!(graph.nodes().len(), 25);
  let count = |section: Section| {
    graph
      .nodes()
      .iter()
      .filter(|node| node.section == section)
      .count()
  };
  assert_eq!(count(Section::Backbone), 10);
  assert_eq!(count(Section::Neck), 14, "everything before Detect is neck");
  assert_eq!(count(Section::Head), 1);
  assert_eq!(graph.edges().len(), 30);

  // The P4 concat merges the upsample path with backbone level 6.
  let incoming: Vec<_> = graph
    .edges()
    .iter()
    .filter(|edge| edge.target == "neck-2")
    .map(|edge| edge.source.as_str())
    .collect();
  assert_eq!(incoming, vec!["neck-1", "backbone-6"]);

  // Detect fans in from the three pyramid outputs.
  let detect_in: Vec<_> = graph
    .edges()
    .iter()
    .filter(|edge| edge.target == "head-0")
    .map(|edge| edge.source.as_str())
    .collect();
  assert_eq!(detect_in, vec!["neck-7", "neck-10", "neck-13"]);
}

#[test]
fn layout_orders_the_neck_by_level_and_is_idempotent() {
  let _ = tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).try_init();
  let registry = ModuleRegistry::default();
  let config = ModelConfig::from_yaml(YOLOV5).expect("parse");
  let mut decoded = build_graph(&config, &registry);
  layout::apply(&mut decoded.graph, &decoded.global_index);

  // The neck is a chain with skip joins; levels follow document order.
  for local in 0..13 {
    let x = |id: &str| decoded.graph.node(id).expect("node").position.x;
    let here = format!("neck-{local}");
    let next = format!("neck-{}", local + 1);
    assert!(
      x(&here) < x(&next),
      "{here} must sit left of {next} ({} vs {})",
      x(&here),
      x(&next)
    );
  }

  let snapshot: Vec<_> = decoded
    .graph
    .nodes()
    .iter()
    .map(|node| (node.id.clone(), node.position))
    .collect();
  let frames = decoded.graph.frames().to_vec();
  layout::apply(&mut decoded.graph, &decoded.global_index);
  let again: Vec<_> = decoded
    .graph
    .nodes()
    .iter()
    .map(|node| (node.id.clone(), node.position))
    .collect();
  assert_eq!(snapshot, again, "layout must be idempotent");
  assert_eq!(frames, decoded.graph.frames());
}

#[test]
fn unedited_reencode_reproduces_the_document() {
  let registry = ModuleRegistry::default();
  let config = ModelConfig::from_yaml(YOLOV5).expect("parse");
  let mut decoded = build_graph(&config, &registry);
  layout::apply(&mut decoded.graph, &decoded.global_index);
  let rebuilt = rebuild_config(&decoded.graph, &config);

  assert_eq!(rebuilt.class_count, config.class_count);
  assert_eq!(rebuilt.depth_multiple, config.depth_multiple);
  assert_eq!(rebuilt.width_multiple, config.width_multiple);
  assert_eq!(rebuilt.extra, config.extra, "anchors must be carried through");
  assert_eq!(rebuilt.backbone.len(), 10);
  assert_eq!(rebuilt.head.len(), 15);

  for (rebuilt_record, original) in rebuilt.modules().zip(config.modules()) {
    assert_eq!(rebuilt_record.kind, original.kind);
    assert_eq!(rebuilt_record.args, original.args);
    assert_eq!(rebuilt_record.repeat, original.repeat, "{}", original.kind);
  }

  // Multi-input records encode their sources ascending.
  assert_eq!(rebuilt.head[2].inputs, FromField::Many(vec![6, 11]));
  assert_eq!(rebuilt.head[14].inputs, FromField::Many(vec![17, 20, 23]));

  // Same resolved topology, independent of `-1` shorthand differences.
  let reparsed = build_graph(&rebuilt, &registry);
  assert_eq!(edge_pairs(&reparsed.graph), edge_pairs(&decoded.graph));
}

#[test]
fn emitted_yaml_parses_back_to_the_same_config() {
  let registry = ModuleRegistry::default();
  let config = ModelConfig::from_yaml(YOLOV5).expect("parse");
  let mut decoded = build_graph(&config, &registry);
  layout::apply(&mut decoded.graph, &decoded.global_index);
  let rebuilt = rebuild_config(&decoded.graph, &config);

  let text = rebuilt.to_yaml().expect("serialize");
  assert!(text.contains("anchors"), "emitted text: {text}");
  let reparsed = ModelConfig::from_yaml(&text).expect("reparse");
  assert_eq!(reparsed, rebuilt);
}
