//! Permission-scope check over decoded claims.

use crate::auth::claims::AccessClaims;

/// True when the claims grant the named permission.
///
/// Applies to mutating operations only; there is no read surface behind this
/// gate.
pub fn has_scope(claims: &AccessClaims, required: &str) -> bool {
    claims.scope.iter().any(|scope| scope == required)
}
