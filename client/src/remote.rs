//! Remote store access.
//!
//! The remote persists each collection as a whole JSON document: a GET
//! returns the full record array, a POST replaces it. [`Remote`] is
//! the seam between the sync stages and the wire; substituting a
//! per-record protocol (upsert/delete endpoints with server-side
//! version checks) would only require a new implementation here.

use crate::error::{Result, SyncError};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

/// Whole-document access to one remote collection at a time.
#[async_trait]
pub trait Remote: Send + Sync {
    /// Fetch the full current record array for a collection.
    async fn fetch(&self, collection: &str) -> Result<Vec<Value>>;

    /// Replace the full record array for a collection.
    async fn replace(&self, collection: &str, records: Vec<Value>) -> Result<()>;
}

#[async_trait]
impl<T: Remote + ?Sized> Remote for std::sync::Arc<T> {
    async fn fetch(&self, collection: &str) -> Result<Vec<Value>> {
        (**self).fetch(collection).await
    }

    async fn replace(&self, collection: &str, records: Vec<Value>) -> Result<()> {
        (**self).replace(collection, records).await
    }
}

/// HTTP implementation of [`Remote`].
#[derive(Debug, Clone)]
pub struct HttpRemote {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpRemote {
    /// Create a client for the given endpoint. The endpoint must carry
    /// an explicit http:// or https:// scheme; a trailing slash is
    /// trimmed.
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = normalize_endpoint(endpoint.into())?;
        Ok(Self {
            endpoint,
            client: reqwest::Client::builder().build()?,
        })
    }

    /// The normalized endpoint this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Remote for HttpRemote {
    async fn fetch(&self, collection: &str) -> Result<Vec<Value>> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("collection", collection)])
            .header("Accept", "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api(parse_api_error(status, &body)));
        }

        let records = response.json::<Vec<Value>>().await?;
        Ok(records)
    }

    async fn replace(&self, collection: &str, records: Vec<Value>) -> Result<()> {
        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("collection", collection)])
            .json(&records)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Api(parse_api_error(status, &body)));
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<String>,
    message: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

fn normalize_endpoint(raw: String) -> Result<String> {
    let endpoint = raw.trim();
    if endpoint.is_empty() {
        return Err(SyncError::Config("endpoint must not be empty".to_string()));
    }
    if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
        Ok(endpoint.trim_end_matches('/').to_string())
    } else {
        Err(SyncError::Config(
            "endpoint must include http:// or https://".to_string(),
        ))
    }
}
