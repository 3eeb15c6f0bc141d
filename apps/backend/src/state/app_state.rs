use std::sync::Arc;

use crate::auth::jwks::KeyResolver;
use crate::config::auth::AuthConfig;
use crate::identity::IdentityProvider;
use crate::store::TodoStore;

/// Application state containing shared resources.
///
/// Every external collaborator is held behind a trait object so the
/// authorization pipeline can be exercised against fakes; the key resolver
/// is the only piece with cross-request mutable state (its key cache).
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthConfig,
    pub keys: Arc<KeyResolver>,
    pub identity: Arc<dyn IdentityProvider>,
    pub store: Arc<dyn TodoStore>,
}

impl AppState {
    pub fn new(
        auth: AuthConfig,
        keys: Arc<KeyResolver>,
        identity: Arc<dyn IdentityProvider>,
        store: Arc<dyn TodoStore>,
    ) -> Self {
        Self {
            auth,
            keys,
            identity,
            store,
        }
    }
}
