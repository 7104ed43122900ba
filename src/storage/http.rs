//! HTTP client for the remote preference tier
//!
//! Talks to the REST backend:
//!
//! - `GET  {base}/api/user-sort-preferences/{tableName}` → `StoredPreference`,
//!   or an empty body, `null`, `{}` or `404` when nothing is stored
//! - `POST {base}/api/user-sort-preferences` with a `SavePreferenceRequest`;
//!   the response body is not read
//!
//! No timeout is imposed unless one is configured.

use crate::core::{
    PreferenceError, PreferenceResult, RemotePreferences, SavePreferenceRequest, SortConfig,
    StoredPreference,
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use std::time::Duration;

/// Path of the preference collection, relative to the API base URL
pub const PREFERENCES_PATH: &str = "api/user-sort-preferences";

/// reqwest-backed implementation of [`RemotePreferences`]
#[derive(Clone)]
pub struct HttpPreferences {
    client: Client,
    base_url: Url,
}

impl HttpPreferences {
    /// Create a client for the backend at `base_url` (e.g. `http://localhost:3000`)
    pub fn new(base_url: &str) -> PreferenceResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a client with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> PreferenceResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Self::with_client(client, base_url)
    }

    /// Reuse an existing reqwest client (shared connection pool, auth headers...)
    pub fn with_client(client: Client, base_url: &str) -> PreferenceResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| PreferenceError::InvalidConfig(format!("invalid base url: {}", e)))?;
        if base_url.cannot_be_a_base() {
            return Err(PreferenceError::InvalidConfig(format!(
                "base url '{}' cannot hold a path",
                base_url
            )));
        }
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    fn collection_url(&self) -> PreferenceResult<Url> {
        self.base_url
            .join(PREFERENCES_PATH)
            .map_err(|e| PreferenceError::InvalidConfig(e.to_string()))
    }

    /// URL of one table's preference; the table name is percent-encoded
    fn table_url(&self, table_name: &str) -> PreferenceResult<Url> {
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|_| PreferenceError::InvalidConfig("base url cannot hold a path".into()))?
            .push(table_name);
        Ok(url)
    }
}

async fn status_error(response: reqwest::Response) -> PreferenceError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    PreferenceError::Status { status, message }
}

/// Interpret a GET body; anything without a usable `sortField` is "no preference"
fn parse_fetch_body(body: &str) -> PreferenceResult<Option<SortConfig>> {
    let body = body.trim();
    if body.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value = serde_json::from_str(body)?;
    let has_field = value
        .get("sortField")
        .and_then(|f| f.as_str())
        .is_some_and(|f| !f.is_empty());
    if !has_field {
        return Ok(None);
    }
    let stored: StoredPreference = serde_json::from_value(value)?;
    Ok(Some(stored.try_into()?))
}

#[async_trait]
impl RemotePreferences for HttpPreferences {
    async fn fetch(&self, table_name: &str) -> PreferenceResult<Option<SortConfig>> {
        let url = self.table_url(table_name)?;
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND | StatusCode::NO_CONTENT => Ok(None),
            status if status.is_success() => {
                let body = response.text().await?;
                parse_fetch_body(&body)
            }
            _ => Err(status_error(response).await),
        }
    }

    async fn save(&self, table_name: &str, config: &SortConfig) -> PreferenceResult<()> {
        let url = self.collection_url()?;
        let response = self
            .client
            .post(url)
            .json(&SavePreferenceRequest::new(table_name, config))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(status_error(response).await)
        }
    }
}
