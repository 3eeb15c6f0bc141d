//! Identity resolution against the provider's userinfo endpoint.
//!
//! The gate has already proven the token valid; this round-trip asks the
//! provider to re-derive the caller's profile from the same credential. That
//! keeps the service stateless and avoids trusting locally-decoded claims
//! for profile fields the token is not guaranteed to carry.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use crate::error::AppError;

/// Profile resolved once per request; never cached across requests.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub email: String,
    #[serde(rename = "nickname")]
    pub display_name: Option<String>,
    #[serde(rename = "picture")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider call timed out")]
    Timeout,
    #[error("identity provider call failed: {0}")]
    Transport(String),
    #[error("identity provider returned status {0}")]
    Rejected(u16),
    #[error("invalid profile document: {0}")]
    Decode(String),
}

/// Exchange of a bearer credential for the caller's profile.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<UserProfile, IdentityError>;
}

pub struct HttpIdentityProvider {
    client: reqwest::Client,
    userinfo_url: String,
}

impl HttpIdentityProvider {
    pub fn new(userinfo_url: String, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build identity client: {e}")))?;
        Ok(Self {
            client,
            userinfo_url,
        })
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn resolve(&self, token: &str) -> Result<UserProfile, IdentityError> {
        let response = self
            .client
            .get(&self.userinfo_url)
            .bearer_auth(token)
            .header("accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    IdentityError::Timeout
                } else {
                    IdentityError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "userinfo call rejected");
            return Err(IdentityError::Rejected(status.as_u16()));
        }

        response
            .json::<UserProfile>()
            .await
            .map_err(|e| IdentityError::Decode(e.to_string()))
    }
}
