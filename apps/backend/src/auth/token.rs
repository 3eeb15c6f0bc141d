//! Bearer-token verification against the provider's rotating key set.

use jsonwebtoken::{decode, decode_header, DecodingKey, Validation};

use crate::auth::claims::AccessClaims;
use crate::auth::jwks::{KeyError, KeyResolver};
use crate::config::auth::AuthConfig;
use crate::error::AppError;

/// Verify a raw bearer credential and return its claims.
///
/// Validation requires, in order: a decodable header whose algorithm is on
/// the configured allow-list, a signing key matching the header `kid`, and a
/// signature/`exp`/`iss`/`aud` check against the configured expectations.
/// Any failure maps to an unauthenticated error; a key set that cannot be
/// consulted at all maps to `KEY_SET_UNAVAILABLE` instead.
pub async fn verify_bearer_token(
    token: &str,
    keys: &KeyResolver,
    config: &AuthConfig,
) -> Result<AccessClaims, AppError> {
    let header = decode_header(token).map_err(|_| AppError::unauthorized_invalid_jwt())?;

    if !config.algorithms.contains(&header.alg) {
        return Err(AppError::unauthorized_invalid_jwt());
    }

    let kid = header.kid.ok_or_else(AppError::unauthorized_invalid_jwt)?;

    let jwk = keys.resolve(&kid).await.map_err(|e| match e {
        KeyError::UnknownKid(_) => AppError::unauthorized_unknown_key(),
        KeyError::RateLimited | KeyError::Timeout | KeyError::Fetch(_) => {
            AppError::key_set_unavailable(e.to_string())
        }
    })?;

    let decoding_key = DecodingKey::from_rsa_components(&jwk.n, &jwk.e)
        .map_err(|e| AppError::key_set_unavailable(format!("unusable signing key: {e}")))?;

    // Default Validation already checks exp; pin algorithm to the one the
    // header declared (already vetted against the allow-list above).
    let mut validation = Validation::new(header.alg);
    validation.set_audience(&[&config.audience]);
    validation.set_issuer(&[&config.issuer]);

    decode::<AccessClaims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::unauthorized_expired_jwt()
            }
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AppError::unauthorized_invalid_jwt()
            }
            _ => AppError::unauthorized_invalid_jwt(),
        })
}
