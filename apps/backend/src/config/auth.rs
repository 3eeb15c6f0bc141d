//! Token-verification and identity-provider configuration.
//!
//! All values come from the environment. The issuer and audience are
//! mandatory; everything else has a default derived from them or from the
//! provider's conventions (JWKS under `.well-known`, userinfo next to the
//! issuer root).

use std::env;
use std::time::Duration;

use jsonwebtoken::Algorithm;

use crate::error::AppError;

/// Default budget for JWKS endpoint fetches per rolling minute.
const DEFAULT_JWKS_REQUESTS_PER_MINUTE: u32 = 5;

/// Default timeout applied to every outbound call (JWKS, userinfo, store).
const DEFAULT_OUTBOUND_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Expected `iss` claim, e.g. `https://tenant.auth0.com/`
    pub issuer: String,
    /// Expected `aud` claim
    pub audience: String,
    /// JWKS document URL
    pub jwks_url: String,
    /// Userinfo (profile) endpoint URL
    pub userinfo_url: String,
    /// Signing algorithms accepted for bearer tokens. Asymmetric only.
    pub algorithms: Vec<Algorithm>,
    /// Scope required for every mutating operation
    pub write_scope: String,
    /// JWKS fetch budget per rolling minute
    pub jwks_requests_per_minute: u32,
    /// Timeout for outbound HTTP calls
    pub outbound_timeout: Duration,
}

impl AuthConfig {
    /// Load from the environment. `AUTH_ISSUER` and `AUTH_AUDIENCE` are
    /// required; missing values fail fast with a config error.
    pub fn from_env() -> Result<Self, AppError> {
        let issuer = require_var("AUTH_ISSUER")?;
        let audience = require_var("AUTH_AUDIENCE")?;

        let issuer_root = issuer.trim_end_matches('/');
        let jwks_url = env::var("AUTH_JWKS_URL")
            .unwrap_or_else(|_| format!("{issuer_root}/.well-known/jwks.json"));
        let userinfo_url =
            env::var("AUTH_USERINFO_URL").unwrap_or_else(|_| format!("{issuer_root}/userinfo"));

        let write_scope =
            env::var("AUTH_WRITE_SCOPE").unwrap_or_else(|_| "write:todos".to_string());

        let jwks_requests_per_minute = parse_var(
            "AUTH_JWKS_REQUESTS_PER_MINUTE",
            DEFAULT_JWKS_REQUESTS_PER_MINUTE,
        )?;
        let outbound_timeout = Duration::from_secs(parse_var(
            "OUTBOUND_TIMEOUT_SECS",
            DEFAULT_OUTBOUND_TIMEOUT_SECS,
        )?);

        Ok(Self {
            issuer,
            audience,
            jwks_url,
            userinfo_url,
            algorithms: vec![Algorithm::RS256],
            write_scope,
            jwks_requests_per_minute,
            outbound_timeout,
        })
    }

    /// Config for tests: fixed issuer/audience, no environment access.
    pub fn for_tests() -> Self {
        Self {
            issuer: "https://issuer.test/".to_string(),
            audience: "https://todos.test".to_string(),
            jwks_url: "https://issuer.test/.well-known/jwks.json".to_string(),
            userinfo_url: "https://issuer.test/userinfo".to_string(),
            algorithms: vec![Algorithm::RS256],
            write_scope: "write:todos".to_string(),
            jwks_requests_per_minute: DEFAULT_JWKS_REQUESTS_PER_MINUTE,
            outbound_timeout: Duration::from_secs(DEFAULT_OUTBOUND_TIMEOUT_SECS),
        }
    }
}

fn require_var(name: &'static str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!("{name} must be set"))),
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map_err(|_| AppError::config(format!("{name} is not a valid value: {raw}"))),
        Err(_) => Ok(default),
    }
}
