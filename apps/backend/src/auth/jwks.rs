//! Signing-key resolution against a remote JWKS endpoint.
//!
//! The resolver keeps a process-wide `kid -> key` cache. A cache hit costs
//! nothing; a miss triggers a refresh that replaces the cache wholesale,
//! subject to a fetch budget per rolling minute so key rotation (or a flood
//! of tokens with bogus kids) cannot hammer the key-set endpoint. Refresh is
//! idempotent, so concurrent requests share the cache without coordination
//! beyond the locks here.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum KeyError {
    #[error("no signing key matches kid '{0}'")]
    UnknownKid(String),
    #[error("key set fetch budget exhausted")]
    RateLimited,
    #[error("key set fetch timed out")]
    Timeout,
    #[error("key set fetch failed: {0}")]
    Fetch(String),
}

/// One RSA public key from the provider's key set.
#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    pub kty: String,
    pub kid: String,
    /// Modulus, base64url
    pub n: String,
    /// Exponent, base64url
    pub e: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwkSet {
    pub keys: Vec<Jwk>,
}

/// Source of the provider's key set. Injectable so tests can serve a fixed
/// document instead of hitting the network.
#[async_trait]
pub trait JwksFetcher: Send + Sync {
    async fn fetch(&self) -> Result<JwkSet, KeyError>;
}

pub struct HttpJwksFetcher {
    client: reqwest::Client,
    url: String,
}

impl HttpJwksFetcher {
    pub fn new(url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build JWKS client: {e}")))?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    async fn fetch(&self) -> Result<JwkSet, KeyError> {
        let response = self.client.get(&self.url).send().await.map_err(|e| {
            if e.is_timeout() {
                KeyError::Timeout
            } else {
                KeyError::Fetch(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KeyError::Fetch(format!(
                "key set endpoint returned {status}"
            )));
        }

        response
            .json::<JwkSet>()
            .await
            .map_err(|e| KeyError::Fetch(format!("invalid key set document: {e}")))
    }
}

/// Process-wide signing-key cache with a rolling-minute refresh budget.
pub struct KeyResolver {
    fetcher: Arc<dyn JwksFetcher>,
    keys: RwLock<HashMap<String, Jwk>>,
    fetch_log: Mutex<Vec<Instant>>,
    budget_per_minute: u32,
}

impl KeyResolver {
    pub fn new(fetcher: Arc<dyn JwksFetcher>, budget_per_minute: u32) -> Self {
        Self {
            fetcher,
            keys: RwLock::new(HashMap::new()),
            fetch_log: Mutex::new(Vec::new()),
            budget_per_minute,
        }
    }

    /// Resolve a key id to an RSA key, refreshing the cache on a miss.
    pub async fn resolve(&self, kid: &str) -> Result<Jwk, KeyError> {
        if let Some(jwk) = self.keys.read().get(kid).cloned() {
            return Ok(jwk);
        }

        self.acquire_fetch_slot()?;
        debug!(kid = %kid, "key cache miss, refreshing key set");

        let set = self.fetcher.fetch().await?;
        let fresh: HashMap<String, Jwk> = set
            .keys
            .into_iter()
            .filter(|key| key.kty == "RSA")
            .map(|key| (key.kid.clone(), key))
            .collect();

        let mut keys = self.keys.write();
        *keys = fresh;

        keys.get(kid).cloned().ok_or_else(|| {
            warn!(kid = %kid, "kid absent from refreshed key set");
            KeyError::UnknownKid(kid.to_string())
        })
    }

    /// Record a fetch attempt against the rolling-minute budget, or refuse.
    fn acquire_fetch_slot(&self) -> Result<(), KeyError> {
        let now = Instant::now();
        let mut log = self.fetch_log.lock();
        log.retain(|at| now.duration_since(*at) < Duration::from_secs(60));
        if log.len() as u32 >= self.budget_per_minute {
            warn!("JWKS fetch budget exhausted for the trailing minute");
            return Err(KeyError::RateLimited);
        }
        log.push(now);
        Ok(())
    }
}
