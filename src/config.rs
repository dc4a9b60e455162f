//! Model configuration: the layered-list description of a network.
//!
//! A config is the parsed form of the YAML text stored in a version record:
//! global scalars (`nc`, `depth_multiple`, `width_multiple`) plus two ordered
//! module-record sequences, `backbone` and `head`. A record addresses its
//! input(s) by global index, the 0-based position in `backbone ++ head`;
//! `-1` means "the record immediately preceding this one".
//!
//! Core types stay independent of the YAML shape; DTOs at the bottom of this
//! module convert at the boundary, so the on-disk 4-tuple form
//! `[from, repeat, module, args]` never leaks into the rest of the crate.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Error when reading or writing config text.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The text is not a YAML document of the expected shape.
  #[error("yaml error: {0}")]
  Yaml(#[from] serde_yaml::Error),
  /// A required top-level sequence (`backbone` or `head`) is missing.
  #[error("malformed document: missing `{0}` sequence")]
  MissingSection(&'static str),
}

/// Input reference(s) of a module record: a single global index or an ordered
/// list of them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FromField {
  /// One input, `-1` for "previous record".
  Single(i64),
  /// Several inputs in document order.
  Many(Vec<i64>),
}

impl FromField {
  /// Raw indices in document order; a scalar is exposed as a singleton slice.
  #[must_use]
  pub fn indices(&self) -> &[i64] {
    match self {
      Self::Single(index) => std::slice::from_ref(index),
      Self::Many(indices) => indices,
    }
  }
}

/// One scalar argument of a module record. Argument order is significant and
/// opaque to the codec; values pass through decode/encode untouched.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
  /// Boolean flag, e.g. the `shortcut` switch of a C3 block.
  Bool(bool),
  /// Integer argument (channel counts, kernel sizes, strides).
  Int(i64),
  /// Floating-point argument.
  Float(f64),
  /// Plain string argument (`nearest`, `nc`, `anchors`, ...).
  Str(String),
  /// Explicit YAML null.
  Null,
}

impl fmt::Display for ArgValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Bool(value) => write!(f, "{}", value),
      Self::Int(value) => write!(f, "{}", value),
      Self::Float(value) => write!(f, "{}", value),
      Self::Str(value) => write!(f, "{}", value),
      Self::Null => write!(f, "null"),
    }
  }
}

/// One module record of the layered list.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleRecord {
  /// Input reference(s) by global index; `-1` is "previous record".
  pub inputs: FromField,
  /// Repetition count. Opaque to the graph and to layout.
  pub repeat: u32,
  /// Module kind. An open enumeration; unknown kinds are accepted.
  pub kind: String,
  /// Ordered constructor arguments, possibly empty.
  pub args: Vec<ArgValue>,
}

impl ModuleRecord {
  /// Creates a record with a single input reference.
  #[must_use]
  pub fn new(from: i64, repeat: u32, kind: impl Into<String>, args: Vec<ArgValue>) -> Self {
    Self {
      inputs: FromField::Single(from),
      repeat,
      kind: kind.into(),
      args,
    }
  }
}

/// A full parsed model configuration.
///
/// The scalar fields and `extra` are carried through encode untouched; only
/// `backbone` and `head` are regenerated from the editor graph on save.
#[derive(Clone, Debug, PartialEq)]
pub struct ModelConfig {
  /// Number of output classes (`nc`).
  pub class_count: i64,
  /// Model depth multiple (`depth_multiple`).
  pub depth_multiple: f64,
  /// Layer channel multiple (`width_multiple`).
  pub width_multiple: f64,
  /// Backbone records, in document order.
  pub backbone: Vec<ModuleRecord>,
  /// Head records, in document order. The neck/head presentation split is not
  /// stored here; it is re-derived on every decode.
  pub head: Vec<ModuleRecord>,
  /// Unrecognized top-level keys (e.g. `anchors`), preserved verbatim so that
  /// decode/encode round-trips real config files.
  pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl ModelConfig {
  /// Parses config text. Fails on unparseable YAML and on a document missing
  /// a `backbone` or `head` sequence; no partial config is returned.
  pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
    let doc: DocYaml = serde_yaml::from_str(text)?;
    let backbone = doc.backbone.ok_or(ConfigError::MissingSection("backbone"))?;
    let head = doc.head.ok_or(ConfigError::MissingSection("head"))?;
    Ok(Self {
      class_count: doc.nc,
      depth_multiple: doc.depth_multiple,
      width_multiple: doc.width_multiple,
      backbone: backbone.into_iter().map(ModuleRecord::from).collect(),
      head: head.into_iter().map(ModuleRecord::from).collect(),
      extra: doc.extra,
    })
  }

  /// Serializes the config back to YAML text.
  pub fn to_yaml(&self) -> Result<String, ConfigError> {
    let doc = DocYaml {
      nc: self.class_count,
      depth_multiple: self.depth_multiple,
      width_multiple: self.width_multiple,
      backbone: Some(self.backbone.iter().cloned().map(RecordYaml::from).collect()),
      head: Some(self.head.iter().cloned().map(RecordYaml::from).collect()),
      extra: self.extra.clone(),
    };
    Ok(serde_yaml::to_string(&doc)?)
  }

  /// Iterates all records in global order (`backbone`, then `head`).
  pub fn modules(&self) -> impl Iterator<Item = &ModuleRecord> {
    self.backbone.iter().chain(self.head.iter())
  }

  /// Total number of records across both sequences.
  #[must_use]
  pub fn module_count(&self) -> usize {
    self.backbone.len() + self.head.len()
  }
}

// YAML DTOs (stable on-disk schema; core types stay independent of it)

/// On-disk record shape: `[from, repeat, module, args]`.
#[derive(Serialize, Deserialize)]
struct RecordYaml(FromField, u32, String, Vec<ArgValue>);

impl From<RecordYaml> for ModuleRecord {
  fn from(raw: RecordYaml) -> Self {
    Self {
      inputs: raw.0,
      repeat: raw.1,
      kind: raw.2,
      args: raw.3,
    }
  }
}

impl From<ModuleRecord> for RecordYaml {
  fn from(record: ModuleRecord) -> Self {
    Self(record.inputs, record.repeat, record.kind, record.args)
  }
}

#[derive(Serialize, Deserialize)]
struct DocYaml {
  nc: i64,
  depth_multiple: f64,
  width_multiple: f64,
  backbone: Option<Vec<RecordYaml>>,
  head: Option<Vec<RecordYaml>>,
  #[serde(flatten)]
  extra: BTreeMap<String, serde_yaml::Value>,
}
