#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod error;
pub mod extractors;
pub mod identity;
pub mod infra;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod trace_ctx;

// Re-exports for public API
pub use auth::claims::AccessClaims;
pub use auth::jwks::{JwksFetcher, KeyResolver};
pub use auth::token::verify_bearer_token;
pub use config::auth::AuthConfig;
pub use config::store::StoreConfig;
pub use error::AppError;
pub use extractors::auth_token::AuthToken;
pub use identity::{IdentityProvider, UserProfile};
pub use infra::state::build_state;
pub use middleware::cors::cors_middleware;
pub use middleware::jwt_gate::JwtGate;
pub use middleware::request_trace::RequestTrace;
pub use middleware::scope_gate::ScopeGate;
pub use middleware::structured_logger::StructuredLogger;
pub use middleware::trace_span::TraceSpan;
pub use state::app_state::AppState;
pub use store::{StoreError, TodoPatch, TodoRecord, TodoStore};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    backend_test_support::test_logging::init();
}
