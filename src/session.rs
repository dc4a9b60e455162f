//! Editing session: load a version, mutate the graph, save it back.
//!
//! A session owns one live [`EditorGraph`] at a time. Loading a version
//! replaces the previous state wholesale; the decoded config is retained as an
//! immutable snapshot, consulted again only on save (scalar fields, repeat
//! recovery). Saving is split into a synchronous [`EditorSession::prepare_save`]
//! and an asynchronous [`EditorSession::commit_save`] so that a rebuild
//! computed from superseded state can never be written over a newer graph:
//! every load bumps a generation counter and a stale pending save is refused.

use tracing::info;

use crate::codec::{build_graph, rebuild_config};
use crate::config::{ArgValue, ConfigError, ModelConfig};
use crate::graph::{EditorGraph, GraphError, ModuleNode, Point};
use crate::layout;
use crate::registry::ModuleRegistry;
use crate::section::Section;
use crate::store::{StoreError, VersionDraft, VersionRecord, VersionStore};

/// Error from a session operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
  /// The record store failed.
  #[error("store: {0}")]
  Store(#[from] StoreError),
  /// The loaded architecture text could not be decoded.
  #[error("config: {0}")]
  Config(#[from] ConfigError),
  /// A graph mutation failed.
  #[error("graph: {0}")]
  Graph(#[from] GraphError),
  /// No version has been loaded yet.
  #[error("no version loaded")]
  NoVersionLoaded,
  /// The pending save was prepared against superseded session state.
  #[error("save prepared against a superseded session state")]
  StaleSave,
}

struct SessionState {
  version: VersionRecord,
  snapshot: ModelConfig,
  graph: EditorGraph,
}

/// A rebuild captured by [`EditorSession::prepare_save`], waiting to be
/// written through the store.
#[derive(Clone, Debug)]
pub struct PendingSave {
  generation: u64,
  version_id: u64,
  architecture: String,
}

impl PendingSave {
  /// The encoded architecture text that would be written.
  #[must_use]
  pub fn architecture(&self) -> &str {
    &self.architecture
  }
}

/// One editing session over a version store.
pub struct EditorSession<S> {
  store: S,
  registry: ModuleRegistry,
  state: Option<SessionState>,
  generation: u64,
}

impl<S> EditorSession<S> {
  /// Creates a session with the default module catalog.
  #[must_use]
  pub fn new(store: S) -> Self {
    Self::with_registry(store, ModuleRegistry::default())
  }

  /// Creates a session with a caller-provided module catalog.
  #[must_use]
  pub fn with_registry(store: S, registry: ModuleRegistry) -> Self {
    Self {
      store,
      registry,
      state: None,
      generation: 0,
    }
  }

  /// The module catalog used for decoding and for node templates.
  #[must_use]
  pub fn registry(&self) -> &ModuleRegistry {
    &self.registry
  }

  /// The live graph, if a version is loaded.
  #[must_use]
  pub fn graph(&self) -> Option<&EditorGraph> {
    self.state.as_ref().map(|state| &state.graph)
  }

  /// The record the current graph was loaded from.
  #[must_use]
  pub fn version(&self) -> Option<&VersionRecord> {
    self.state.as_ref().map(|state| &state.version)
  }

  /// The immutable config snapshot backing the current graph.
  #[must_use]
  pub fn snapshot(&self) -> Option<&ModelConfig> {
    self.state.as_ref().map(|state| &state.snapshot)
  }

  /// Adds a node from a module-kind template. See [`EditorGraph::add_node`].
  pub fn add_node(
    &mut self,
    section: Section,
    kind: &str,
    args: Vec<ArgValue>,
    position: Point,
  ) -> Result<String, SessionError> {
    let state = self.state.as_mut().ok_or(SessionError::NoVersionLoaded)?;
    Ok(state.graph.add_node(section, kind, args, position, &self.registry))
  }

  /// Removes a node and every touching edge.
  pub fn remove_node(&mut self, id: &str) -> Result<ModuleNode, SessionError> {
    let state = self.state.as_mut().ok_or(SessionError::NoVersionLoaded)?;
    Ok(state.graph.remove_node(id)?)
  }

  /// Moves a node; position only.
  pub fn move_node(&mut self, id: &str, position: Point) -> Result<(), SessionError> {
    let state = self.state.as_mut().ok_or(SessionError::NoVersionLoaded)?;
    Ok(state.graph.move_node(id, position)?)
  }

  /// Connects two nodes; `false` when the edge already exists.
  pub fn connect(&mut self, source: &str, target: &str) -> Result<bool, SessionError> {
    let state = self.state.as_mut().ok_or(SessionError::NoVersionLoaded)?;
    Ok(state.graph.connect(source, target)?)
  }

  /// Replaces a node's module kind and arguments.
  pub fn update_module(
    &mut self,
    id: &str,
    kind: &str,
    args: Vec<ArgValue>,
  ) -> Result<(), SessionError> {
    let state = self.state.as_mut().ok_or(SessionError::NoVersionLoaded)?;
    Ok(state.graph.update_module(id, kind, args, &self.registry)?)
  }
}

impl<S: VersionStore> EditorSession<S> {
  /// Loads a version: fetch, decode, lay out, replace the previous state.
  ///
  /// On any failure the previous state is left untouched.
  pub async fn load(&mut self, id: u64) -> Result<(), SessionError> {
    let version = self.store.get(id).await?;
    let snapshot = ModelConfig::from_yaml(&version.architecture)?;
    let mut decoded = build_graph(&snapshot, &self.registry);
    layout::apply(&mut decoded.graph, &decoded.global_index);
    info!(
      version = version.id,
      nodes = decoded.graph.nodes().len(),
      edges = decoded.graph.edges().len(),
      "loaded version"
    );
    self.generation += 1;
    self.state = Some(SessionState {
      version,
      snapshot,
      graph: decoded.graph,
    });
    Ok(())
  }

  /// Rebuilds the config from the live graph and captures it for writing.
  ///
  /// Synchronous and side-effect free; the graph is not touched.
  pub fn prepare_save(&self) -> Result<PendingSave, SessionError> {
    let state = self.state.as_ref().ok_or(SessionError::NoVersionLoaded)?;
    let rebuilt = rebuild_config(&state.graph, &state.snapshot);
    Ok(PendingSave {
      generation: self.generation,
      version_id: state.version.id,
      architecture: rebuilt.to_yaml()?,
    })
  }

  /// Writes a pending save through the store.
  ///
  /// Refuses a pending save prepared before the most recent load: a rebuild
  /// of superseded state must never overwrite a newer graph.
  pub async fn commit_save(&mut self, pending: PendingSave) -> Result<VersionRecord, SessionError> {
    if pending.generation != self.generation {
      return Err(SessionError::StaleSave);
    }
    let state = self.state.as_ref().ok_or(SessionError::NoVersionLoaded)?;
    let draft = VersionDraft {
      name: state.version.name.clone(),
      description: state.version.description.clone(),
      architecture: pending.architecture,
    };
    let updated = self.store.update(pending.version_id, draft).await?;
    info!(version = updated.id, "saved version");
    if let Some(state) = self.state.as_mut() {
      state.version = updated.clone();
    }
    Ok(updated)
  }

  /// Prepares and immediately commits a save.
  pub async fn save(&mut self) -> Result<VersionRecord, SessionError> {
    let pending = self.prepare_save()?;
    self.commit_save(pending).await
  }
}
