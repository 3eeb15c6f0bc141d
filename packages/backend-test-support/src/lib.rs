//! Backend test support utilities
//!
//! This crate provides fixtures and assertion helpers for backend testing:
//! RSA signing keys with a matching JWKS document, bearer-token minting, and
//! response-contract assertions. It deliberately does not depend on the
//! backend crate.

pub mod keys;
pub mod problem_details;
pub mod status_message;
pub mod test_logging;
