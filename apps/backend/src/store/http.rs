//! HTTP store client speaking the Elasticsearch document REST dialect:
//! `{url}/{app}/{doc_type}/{id}` for index/get/delete and
//! `{url}/{app}/{doc_type}/{id}/_update` for partial updates.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::{StoreError, TodoPatch, TodoRecord, TodoStore};
use crate::config::store::StoreConfig;
use crate::error::AppError;

pub struct HttpTodoStore {
    client: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

/// Envelope the store wraps read responses in.
#[derive(Deserialize)]
struct GetResponse {
    #[serde(rename = "_source")]
    source: TodoRecord,
}

impl HttpTodoStore {
    pub fn new(config: &StoreConfig, timeout: Duration) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::config(format!("failed to build store client: {e}")))?;

        let (username, password) = config
            .credentials
            .split_once(':')
            .ok_or_else(|| {
                AppError::config("store credentials must be in user:password form".to_string())
            })?;

        Ok(Self {
            client,
            base_url: format!("{}/{}/{}", config.url, config.app, config.doc_type),
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    fn doc_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    fn request(&self, method: reqwest::Method, url: String) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .basic_auth(&self.username, Some(&self.password))
            .header("accept", "application/json")
    }

    async fn expect_success(
        response: Result<reqwest::Response, reqwest::Error>,
        id: &str,
    ) -> Result<reqwest::Response, StoreError> {
        let response = response.map_err(|e| {
            if e.is_timeout() {
                StoreError::Timeout
            } else {
                StoreError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(id.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl TodoStore for HttpTodoStore {
    async fn index(&self, id: &str, record: &TodoRecord) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::PUT, self.doc_url(id))
            .json(record)
            .send()
            .await;

        Self::expect_success(response, id).await.map(|_| ())
    }

    async fn get(&self, id: &str) -> Result<TodoRecord, StoreError> {
        let response = self
            .request(reqwest::Method::GET, self.doc_url(id))
            .send()
            .await;

        let response = Self::expect_success(response, id).await?;
        response
            .json::<GetResponse>()
            .await
            .map(|wrapper| wrapper.source)
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn update(&self, id: &str, patch: &TodoPatch) -> Result<(), StoreError> {
        let response = self
            .request(
                reqwest::Method::POST,
                format!("{}/_update", self.doc_url(id)),
            )
            .json(&json!({ "doc": patch }))
            .send()
            .await;

        Self::expect_success(response, id).await.map(|_| ())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .request(reqwest::Method::DELETE, self.doc_url(id))
            .send()
            .await;

        Self::expect_success(response, id).await.map(|_| ())
    }
}
