use std::sync::Arc;

use crate::auth::jwks::{HttpJwksFetcher, JwksFetcher, KeyResolver};
use crate::config::auth::AuthConfig;
use crate::config::store::StoreConfig;
use crate::error::AppError;
use crate::identity::{HttpIdentityProvider, IdentityProvider};
use crate::state::app_state::AppState;
use crate::store::http::HttpTodoStore;
use crate::store::TodoStore;

/// Builder for creating AppState instances (used in both tests and main).
///
/// Defaults to the HTTP collaborators derived from the auth/store configs;
/// tests inject fakes through the `with_*` methods before calling `build`.
pub struct StateBuilder {
    auth: Option<AuthConfig>,
    jwks: Option<Arc<dyn JwksFetcher>>,
    identity: Option<Arc<dyn IdentityProvider>>,
    store: Option<Arc<dyn TodoStore>>,
}

impl StateBuilder {
    pub fn new() -> Self {
        Self {
            auth: None,
            jwks: None,
            identity: None,
            store: None,
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = Some(auth);
        self
    }

    pub fn with_jwks_fetcher(mut self, jwks: Arc<dyn JwksFetcher>) -> Self {
        self.jwks = Some(jwks);
        self
    }

    pub fn with_identity_provider(mut self, identity: Arc<dyn IdentityProvider>) -> Self {
        self.identity = Some(identity);
        self
    }

    pub fn with_store(mut self, store: Arc<dyn TodoStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn build(self) -> Result<AppState, AppError> {
        let auth = match self.auth {
            Some(auth) => auth,
            None => AuthConfig::from_env()?,
        };

        let jwks: Arc<dyn JwksFetcher> = match self.jwks {
            Some(jwks) => jwks,
            None => Arc::new(HttpJwksFetcher::new(
                auth.jwks_url.clone(),
                auth.outbound_timeout,
            )?),
        };
        let keys = Arc::new(KeyResolver::new(jwks, auth.jwks_requests_per_minute));

        let identity: Arc<dyn IdentityProvider> = match self.identity {
            Some(identity) => identity,
            None => Arc::new(HttpIdentityProvider::new(
                auth.userinfo_url.clone(),
                auth.outbound_timeout,
            )?),
        };

        let store: Arc<dyn TodoStore> = match self.store {
            Some(store) => store,
            None => {
                let store_config = StoreConfig::from_env()?;
                Arc::new(HttpTodoStore::new(&store_config, auth.outbound_timeout)?)
            }
        };

        Ok(AppState::new(auth, keys, identity, store))
    }
}

impl Default for StateBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn build_state() -> StateBuilder {
    StateBuilder::new()
}
