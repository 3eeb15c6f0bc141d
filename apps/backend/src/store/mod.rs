//! Port to the external indexed-document store that owns todo records.

pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A todo record as the store holds it. The service never keeps one in
/// memory beyond a single request cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoRecord {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub created_at: i64,
    /// Set once at creation from the resolved identity; the sole
    /// authorization anchor for later mutations.
    pub created_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial update: only fields present in the request are touched in the
/// stored record (merge semantics, never a full replace).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl TodoPatch {
    pub fn is_empty(&self) -> bool {
        self.completed.is_none() && self.title.is_none()
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document '{0}' not found")]
    NotFound(String),
    #[error("store call timed out")]
    Timeout,
    #[error("store returned status {status}: {body}")]
    Rejected { status: u16, body: String },
    #[error("store call failed: {0}")]
    Transport(String),
    #[error("invalid store response: {0}")]
    Decode(String),
}

impl StoreError {
    /// Status code forwarded to callers when a store failure is echoed back.
    pub fn forwarded_status(&self) -> u16 {
        match self {
            StoreError::NotFound(_) => 404,
            StoreError::Rejected { status, .. } => *status,
            StoreError::Timeout => 504,
            StoreError::Transport(_) | StoreError::Decode(_) => 502,
        }
    }
}

/// Operations consumed from the store, addressed by a fixed document type
/// configured on the implementation.
#[async_trait]
pub trait TodoStore: Send + Sync {
    async fn index(&self, id: &str, record: &TodoRecord) -> Result<(), StoreError>;
    async fn get(&self, id: &str) -> Result<TodoRecord, StoreError>;
    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError>;
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}
