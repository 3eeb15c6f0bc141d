//! Document-store connection configuration.

use std::env;

use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Base URL of the store cluster, e.g. `https://scalr.api.appbase.io`
    pub url: String,
    /// App (index) namespace
    pub app: String,
    /// `user:password` credentials for basic auth
    pub credentials: String,
    /// Document type name under which todo records are indexed
    pub doc_type: String,
}

impl StoreConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let url = require_var("STORE_URL")?;
        let app = require_var("STORE_APP")?;
        let credentials = require_var("STORE_CREDENTIALS")?;
        if !credentials.contains(':') {
            return Err(AppError::config(
                "STORE_CREDENTIALS must be in user:password form".to_string(),
            ));
        }
        let doc_type = env::var("STORE_DOC_TYPE").unwrap_or_else(|_| "todo".to_string());

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            app,
            credentials,
            doc_type,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, AppError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(AppError::config(format!("{name} must be set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clear_store_env() {
        for name in ["STORE_URL", "STORE_APP", "STORE_CREDENTIALS", "STORE_DOC_TYPE"] {
            std::env::remove_var(name);
        }
    }

    #[test]
    #[serial_test::serial]
    fn loads_and_trims_trailing_slash() {
        clear_store_env();
        std::env::set_var("STORE_URL", "https://scalr.api.appbase.io/");
        std::env::set_var("STORE_APP", "todos");
        std::env::set_var("STORE_CREDENTIALS", "user:secret");

        let config = StoreConfig::from_env().unwrap();
        assert_eq!(config.url, "https://scalr.api.appbase.io");
        assert_eq!(config.doc_type, "todo");

        clear_store_env();
    }

    #[test]
    #[serial_test::serial]
    fn rejects_credentials_without_separator() {
        clear_store_env();
        std::env::set_var("STORE_URL", "https://scalr.api.appbase.io");
        std::env::set_var("STORE_APP", "todos");
        std::env::set_var("STORE_CREDENTIALS", "just-a-key");

        let result = StoreConfig::from_env();
        assert!(matches!(result, Err(AppError::Config { .. })));

        clear_store_env();
    }
}
