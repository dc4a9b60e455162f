//! Open module-kind registry: display metadata per kind.
//!
//! Module kinds are an open string enumeration. Configs may reference kinds
//! this registry has never seen; lookup then falls back to a generic entry, so
//! the codec never depends on the catalog contents. The default catalog covers
//! the common Ultralytics building blocks and can be extended at runtime with
//! [`ModuleRegistry::register`].

use std::collections::HashMap;

use crate::config::ArgValue;

/// Coarse grouping of module kinds, used for styling and for the head split.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ModuleCategory {
  /// Convolution-style layers.
  Conv,
  /// Repeatable feature blocks (bottlenecks, CSP stages).
  Block,
  /// Pooling layers.
  Pool,
  /// Resolution-raising layers.
  Upsample,
  /// Layers joining several inputs.
  Join,
  /// Terminal prediction stages; the first one starts the head section.
  Head,
  /// Anything the catalog does not know.
  Custom,
}

/// Catalog entry for one module kind.
#[derive(Clone, Debug)]
pub struct ModuleInfo {
  /// Styling/grouping category.
  pub category: ModuleCategory,
  /// One-line human description.
  pub summary: String,
}

impl ModuleInfo {
  fn new(category: ModuleCategory, summary: &str) -> Self {
    Self {
      category,
      summary: summary.to_string(),
    }
  }
}

/// Lookup table from module kind to display metadata.
#[derive(Clone, Debug)]
pub struct ModuleRegistry {
  entries: HashMap<String, ModuleInfo>,
  fallback: ModuleInfo,
}

impl Default for ModuleRegistry {
  fn default() -> Self {
    let mut registry = Self::empty();
    for (kind, category, summary) in [
      ("Conv", ModuleCategory::Conv, "standard convolution with batch norm and SiLU"),
      ("DWConv", ModuleCategory::Conv, "depthwise convolution"),
      ("Focus", ModuleCategory::Conv, "width/height to channel focus slice"),
      ("Bottleneck", ModuleCategory::Block, "standard bottleneck"),
      ("BottleneckCSP", ModuleCategory::Block, "cross-stage-partial bottleneck"),
      ("C3", ModuleCategory::Block, "CSP bottleneck with three convolutions"),
      ("C2f", ModuleCategory::Block, "faster CSP bottleneck with two convolutions"),
      ("SPP", ModuleCategory::Pool, "spatial pyramid pooling"),
      ("SPPF", ModuleCategory::Pool, "spatial pyramid pooling, fast"),
      ("nn.Upsample", ModuleCategory::Upsample, "upsampling layer"),
      ("Upsample", ModuleCategory::Upsample, "upsampling layer"),
      ("Concat", ModuleCategory::Join, "channel-wise concatenation"),
      ("Shortcut", ModuleCategory::Join, "element-wise shortcut add"),
      ("Detect", ModuleCategory::Head, "detection head"),
      ("Segment", ModuleCategory::Head, "segmentation head"),
      ("Pose", ModuleCategory::Head, "pose estimation head"),
      ("OBB", ModuleCategory::Head, "oriented bounding box head"),
      ("Classify", ModuleCategory::Head, "classification head"),
    ] {
      registry.register(kind, category, summary);
    }
    registry
  }
}

impl ModuleRegistry {
  /// Creates a registry with no catalog entries; every kind resolves to the
  /// generic fallback.
  #[must_use]
  pub fn empty() -> Self {
    Self {
      entries: HashMap::new(),
      fallback: ModuleInfo::new(ModuleCategory::Custom, "custom module"),
    }
  }

  /// Adds or replaces a catalog entry.
  pub fn register(
    &mut self,
    kind: impl Into<String>,
    category: ModuleCategory,
    summary: impl Into<String>,
  ) {
    self.entries.insert(
      kind.into(),
      ModuleInfo {
        category,
        summary: summary.into(),
      },
    );
  }

  /// Looks up a kind, falling back to the generic entry for unknown kinds.
  #[must_use]
  pub fn info(&self, kind: &str) -> &ModuleInfo {
    self.entries.get(kind).unwrap_or(&self.fallback)
  }

  /// Whether this kind starts the terminal head section.
  #[must_use]
  pub fn is_head_marker(&self, kind: &str) -> bool {
    self.info(kind).category == ModuleCategory::Head
  }

  /// Display label for a node: the kind, with its arguments when present.
  #[must_use]
  pub fn label(&self, kind: &str, args: &[ArgValue]) -> String {
    if args.is_empty() {
      kind.to_string()
    } else {
      format!("{} ({})", kind, join_args(args))
    }
  }

  /// One-line description for a node, derived from the catalog summary and
  /// the arguments.
  #[must_use]
  pub fn describe(&self, kind: &str, args: &[ArgValue]) -> String {
    let info = self.info(kind);
    if args.is_empty() {
      info.summary.clone()
    } else {
      format!("{} with args [{}]", info.summary, join_args(args))
    }
  }
}

fn join_args(args: &[ArgValue]) -> String {
  args
    .iter()
    .map(ToString::to_string)
    .collect::<Vec<_>>()
    .join(", ")
}
