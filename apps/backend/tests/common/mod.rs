//! Shared fixtures for integration tests: fake collaborators and state
//! builders. Each test file assembles its own App, mirroring production
//! wiring (RequestTrace plus the gate pair around the todo routes).

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use backend::auth::jwks::{JwkSet, JwksFetcher, KeyError};
use backend::config::auth::AuthConfig;
use backend::identity::{IdentityError, IdentityProvider, UserProfile};
use backend::infra::state::build_state;
use backend::state::app_state::AppState;
use backend::store::{StoreError, TodoPatch, TodoRecord, TodoStore};
use backend_test_support::keys::{mint_token, test_claims, TEST_JWKS_JSON};

/// JWKS fetcher serving the fixed test document.
pub struct StaticJwks;

#[async_trait]
impl JwksFetcher for StaticJwks {
    async fn fetch(&self) -> Result<JwkSet, KeyError> {
        Ok(serde_json::from_str(TEST_JWKS_JSON).expect("test JWKS document should parse"))
    }
}

/// JWKS fetcher standing in for an unreachable key-set endpoint.
pub struct UnreachableJwks;

#[async_trait]
impl JwksFetcher for UnreachableJwks {
    async fn fetch(&self) -> Result<JwkSet, KeyError> {
        Err(KeyError::Timeout)
    }
}

/// Identity provider resolving from a fixed token -> profile table, with a
/// call counter so tests can assert the gates short-circuit before it runs.
#[derive(Default)]
pub struct FakeIdentity {
    profiles: Mutex<HashMap<String, UserProfile>>,
    calls: AtomicUsize,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, token: &str, email: &str, nickname: &str) -> Self {
        self.profiles.lock().unwrap().insert(
            token.to_string(),
            UserProfile {
                email: email.to_string(),
                display_name: Some(nickname.to_string()),
                avatar_url: Some(format!("https://cdn.test/{nickname}.png")),
            },
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn resolve(&self, token: &str) -> Result<UserProfile, IdentityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.profiles
            .lock()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(IdentityError::Rejected(401))
    }
}

/// In-memory store with an operation log and failure switches.
#[derive(Default)]
pub struct InMemoryTodoStore {
    records: Mutex<HashMap<String, TodoRecord>>,
    ops: Mutex<Vec<&'static str>>,
    unavailable: Mutex<bool>,
    reject_writes: Mutex<Option<(u16, String)>>,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self, record: TodoRecord) {
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record);
    }

    pub fn record(&self, id: &str) -> Option<TodoRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }

    /// Every store call, reads included.
    pub fn ops(&self) -> Vec<&'static str> {
        self.ops.lock().unwrap().clone()
    }

    /// Write-side calls only.
    pub fn mutation_count(&self) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| matches!(**op, "index" | "update" | "delete"))
            .count()
    }

    pub fn set_unavailable(&self) {
        *self.unavailable.lock().unwrap() = true;
    }

    pub fn reject_writes_with(&self, status: u16, body: &str) {
        *self.reject_writes.lock().unwrap() = Some((status, body.to_string()));
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if *self.unavailable.lock().unwrap() {
            return Err(StoreError::Transport("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        if let Some((status, body)) = self.reject_writes.lock().unwrap().clone() {
            return Err(StoreError::Rejected { status, body });
        }
        Ok(())
    }
}

#[async_trait]
impl TodoStore for InMemoryTodoStore {
    async fn index(&self, id: &str, record: &TodoRecord) -> Result<(), StoreError> {
        self.ops.lock().unwrap().push("index");
        self.check_available()?;
        self.check_writable()?;
        self.records
            .lock()
            .unwrap()
            .insert(id.to_string(), record.clone());
        Ok(())
    }

    async fn get(&self, id: &str) -> Result<TodoRecord, StoreError> {
        self.ops.lock().unwrap().push("get");
        self.check_available()?;
        self.records
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError> {
        self.ops.lock().unwrap().push("update");
        self.check_available()?;
        self.check_writable()?;
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if let Some(completed) = patch.completed {
            record.completed = completed;
        }
        if let Some(title) = &patch.title {
            record.title = title.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.ops.lock().unwrap().push("delete");
        self.check_available()?;
        self.check_writable()?;
        self.records
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }
}

/// App state over the standard fakes.
pub fn state_with(store: Arc<InMemoryTodoStore>, identity: Arc<FakeIdentity>) -> AppState {
    build_state()
        .with_auth(AuthConfig::for_tests())
        .with_jwks_fetcher(Arc::new(StaticJwks))
        .with_identity_provider(identity)
        .with_store(store)
        .build()
        .expect("state with injected fakes should build")
}

/// App state whose key-set endpoint is unreachable.
pub fn state_with_unreachable_jwks(
    store: Arc<InMemoryTodoStore>,
    identity: Arc<FakeIdentity>,
) -> AppState {
    build_state()
        .with_auth(AuthConfig::for_tests())
        .with_jwks_fetcher(Arc::new(UnreachableJwks))
        .with_identity_provider(identity)
        .with_store(store)
        .build()
        .expect("state with injected fakes should build")
}

/// Mint a valid bearer token for the test issuer/audience.
pub fn valid_token(sub: &str, scope: &str) -> String {
    let auth = AuthConfig::for_tests();
    mint_token(&test_claims(&auth.issuer, &auth.audience, sub, scope))
}

pub fn seeded_record(id: &str, title: &str, created_by: &str) -> TodoRecord {
    TodoRecord {
        id: id.to_string(),
        title: title.to_string(),
        completed: false,
        created_at: 1000,
        created_by: created_by.to_string(),
        name: Some("alice".to_string()),
        avatar: None,
    }
}
