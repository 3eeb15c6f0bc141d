pub mod claims;
pub mod jwks;
pub mod scope;
pub mod token;
