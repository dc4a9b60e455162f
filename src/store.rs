//! Version record store: the external collaborator holding architecture text.
//!
//! The editor core treats the `architecture` field as an opaque blob; only the
//! codec interprets it. Real deployments back this trait with a REST client;
//! [`MemoryVersionStore`] is the in-process implementation used by tests and
//! by embedders that do not need a remote backend.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Error from a store operation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  /// No record with the given identifier.
  #[error("version {0} not found")]
  NotFound(u64),
  /// A record with the same name already exists.
  #[error("version name `{0}` already exists")]
  Conflict(String),
  /// Transport or backend failure outside the core's control.
  #[error("backend error: {0}")]
  Backend(String),
}

/// A stored architecture version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionRecord {
  /// Store-assigned identifier.
  pub id: u64,
  /// Display name, unique per store.
  pub name: String,
  /// Optional free-form description.
  pub description: Option<String>,
  /// Architecture text, opaque to the store.
  pub architecture: String,
}

/// Payload for creating or updating a record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VersionDraft {
  /// Display name.
  pub name: String,
  /// Optional free-form description.
  pub description: Option<String>,
  /// Architecture text.
  pub architecture: String,
}

/// Asynchronous CRUD surface over version records.
#[async_trait]
pub trait VersionStore: Send + Sync {
  /// Lists all records.
  async fn list(&self) -> Result<Vec<VersionRecord>, StoreError>;
  /// Fetches one record by identifier.
  async fn get(&self, id: u64) -> Result<VersionRecord, StoreError>;
  /// Creates a record and returns it with its assigned identifier.
  async fn create(&self, draft: VersionDraft) -> Result<VersionRecord, StoreError>;
  /// Replaces an existing record.
  async fn update(&self, id: u64, draft: VersionDraft) -> Result<VersionRecord, StoreError>;
  /// Deletes a record.
  async fn delete(&self, id: u64) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
struct MemoryInner {
  next_id: u64,
  records: BTreeMap<u64, VersionRecord>,
}

/// In-memory [`VersionStore`] with dense identifier allocation.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
  inner: Mutex<MemoryInner>,
}

impl MemoryVersionStore {
  /// Creates an empty store.
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
  async fn list(&self) -> Result<Vec<VersionRecord>, StoreError> {
    let inner = self.inner.lock().await;
    Ok(inner.records.values().cloned().collect())
  }

  async fn get(&self, id: u64) -> Result<VersionRecord, StoreError> {
    let inner = self.inner.lock().await;
    inner.records.get(&id).cloned().ok_or(StoreError::NotFound(id))
  }

  async fn create(&self, draft: VersionDraft) -> Result<VersionRecord, StoreError> {
    let mut inner = self.inner.lock().await;
    if inner.records.values().any(|record| record.name == draft.name) {
      return Err(StoreError::Conflict(draft.name));
    }
    inner.next_id += 1;
    let record = VersionRecord {
      id: inner.next_id,
      name: draft.name,
      description: draft.description,
      architecture: draft.architecture,
    };
    inner.records.insert(record.id, record.clone());
    Ok(record)
  }

  async fn update(&self, id: u64, draft: VersionDraft) -> Result<VersionRecord, StoreError> {
    let mut inner = self.inner.lock().await;
    if !inner.records.contains_key(&id) {
      return Err(StoreError::NotFound(id));
    }
    let record = VersionRecord {
      id,
      name: draft.name,
      description: draft.description,
      architecture: draft.architecture,
    };
    inner.records.insert(id, record.clone());
    Ok(record)
  }

  async fn delete(&self, id: u64) -> Result<(), StoreError> {
    let mut inner = self.inner.lock().await;
    inner
      .records
      .remove(&id)
      .map(|_| ())
      .ok_or(StoreError::NotFound(id))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn draft(name: &str) -> VersionDraft {
    VersionDraft {
      name: name.to_string(),
      description: None,
      architecture: "nc: 80\n".to_string(),
    }
  }

  #[tokio::test]
  async fn create_get_update_delete_round_trip() {
    let store = MemoryVersionStore::new();
    let created = store.create(draft("v5")).await.expect("create");
    assert_eq!(created.id, 1);
    assert_eq!(store.list().await.expect("list").len(), 1);

    let fetched = store.get(created.id).await.expect("get");
    assert_eq!(fetched, created);

    let mut updated_draft = draft("v5");
    updated_draft.architecture = "nc: 20\n".to_string();
    let updated = store.update(created.id, updated_draft).await.expect("update");
    assert_eq!(updated.architecture, "nc: 20\n");

    store.delete(created.id).await.expect("delete");
    assert!(matches!(
      store.get(created.id).await,
      Err(StoreError::NotFound(_))
    ));
  }

  #[tokio::test]
  async fn duplicate_names_conflict() {
    let store = MemoryVersionStore::new();
    store.create(draft("v5")).await.expect("create");
    assert!(matches!(
      store.create(draft("v5")).await,
      Err(StoreError::Conflict(_))
    ));
  }

  #[tokio::test]
  async fn updating_a_missing_record_is_not_found() {
    let store = MemoryVersionStore::new();
    assert!(matches!(
      store.update(7, draft("v8")).await,
      Err(StoreError::NotFound(7))
    ));
  }

  #[test]
  fn record_wire_shape_is_stable() {
    let record = VersionRecord {
      id: 3,
      name: "YOLOv5-test".to_string(),
      description: Some("seed".to_string()),
      architecture: "nc: 80\n".to_string(),
    };
    let value = serde_json::to_value(&record).expect("serialize");
    assert_eq!(
      value,
      serde_json::json!({
        "id": 3,
        "name": "YOLOv5-test",
        "description": "seed",
        "architecture": "nc: 80\n",
      })
    );
  }
}
