//! Mutation orchestration: the per-request pipeline between the gates and
//! the store.
//!
//! Each flow is linear. Identity resolution runs first; update and delete
//! additionally verify ownership before touching the store. Any failure
//! short-circuits into a typed `MutationError` for the route layer to map.

use thiserror::Error;
use tracing::{error, info};

use crate::identity::{IdentityError, IdentityProvider};
use crate::services::ownership::{verify_created_by, OwnershipCheck};
use crate::store::{StoreError, TodoPatch, TodoRecord, TodoStore};

/// Fields accepted for a new record. `completed` always starts false and
/// `createdBy` comes from the resolved identity, never from the caller.
#[derive(Debug, Clone)]
pub struct NewTodo {
    pub id: String,
    pub title: String,
    pub created_at: i64,
}

/// Fields a caller may change on an existing record.
#[derive(Debug, Clone)]
pub struct TodoChanges {
    pub id: String,
    pub completed: Option<bool>,
    pub title: Option<String>,
}

#[derive(Debug, Error)]
pub enum MutationError {
    #[error("identity resolution failed: {0}")]
    Identity(#[from] IdentityError),
    #[error("ownership not confirmed")]
    Ownership(OwnershipCheck),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create a todo owned by the caller.
pub async fn create_todo(
    identity: &dyn IdentityProvider,
    store: &dyn TodoStore,
    token: &str,
    new_todo: NewTodo,
) -> Result<(), MutationError> {
    let profile = resolve_identity(identity, token).await?;

    let record = TodoRecord {
        id: new_todo.id.clone(),
        title: new_todo.title,
        completed: false,
        created_at: new_todo.created_at,
        created_by: profile.email,
        name: profile.display_name,
        avatar: profile.avatar_url,
    };

    store.index(&new_todo.id, &record).await?;
    info!(todo_id = %new_todo.id, "todo created");
    Ok(())
}

/// Patch a todo after confirming the caller created it.
pub async fn update_todo(
    identity: &dyn IdentityProvider,
    store: &dyn TodoStore,
    token: &str,
    changes: TodoChanges,
) -> Result<(), MutationError> {
    let profile = resolve_identity(identity, token).await?;

    let check = verify_created_by(store, &profile, &changes.id).await;
    if !check.is_confirmed() {
        return Err(MutationError::Ownership(check));
    }

    let patch = build_patch(&changes);
    store.update(&changes.id, &patch).await?;
    info!(todo_id = %changes.id, "todo updated");
    Ok(())
}

/// Delete a todo after confirming the caller created it.
pub async fn delete_todo(
    identity: &dyn IdentityProvider,
    store: &dyn TodoStore,
    token: &str,
    todo_id: &str,
) -> Result<(), MutationError> {
    let profile = resolve_identity(identity, token).await?;

    let check = verify_created_by(store, &profile, todo_id).await;
    if !check.is_confirmed() {
        return Err(MutationError::Ownership(check));
    }

    store.delete(todo_id).await?;
    info!(todo_id = %todo_id, "todo deleted");
    Ok(())
}

async fn resolve_identity(
    identity: &dyn IdentityProvider,
    token: &str,
) -> Result<crate::identity::UserProfile, MutationError> {
    identity.resolve(token).await.map_err(|e| {
        error!(error = %e, "identity resolution failed");
        MutationError::Identity(e)
    })
}

/// Only fields explicitly present in the request end up in the patch.
/// An empty title counts as absent and never overwrites the stored one.
fn build_patch(changes: &TodoChanges) -> TodoPatch {
    TodoPatch {
        completed: changes.completed,
        title: changes
            .title
            .clone()
            .filter(|title| !title.is_empty()),
    }
}
