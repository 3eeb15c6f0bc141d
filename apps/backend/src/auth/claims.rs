//! Provider-issued access-token claims.

use serde::{Deserialize, Deserializer, Serialize};

/// Claims decoded from a bearer token issued by the identity provider.
///
/// `scope` arrives either as a JSON array of permission strings or as the
/// OAuth2 space-delimited string form; both deserialize to a list. Claims
/// live in request extensions for the duration of one request and are never
/// persisted.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AccessClaims {
    /// Subject (stable provider user id)
    pub sub: String,
    /// Expiry (seconds since epoch); checked during verification
    pub exp: i64,
    #[serde(default, deserialize_with = "deserialize_scope")]
    pub scope: Vec<String>,
}

fn deserialize_scope<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ScopeClaim {
        List(Vec<String>),
        Delimited(String),
    }

    match ScopeClaim::deserialize(deserializer)? {
        ScopeClaim::List(scopes) => Ok(scopes),
        ScopeClaim::Delimited(raw) => Ok(raw.split_whitespace().map(str::to_string).collect()),
    }
}
