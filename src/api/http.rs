//! reqwest-backed [`PostsApi`] implementation.

use std::time::Duration;

use reqwest::RequestBuilder;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use super::PostsApi;
use super::types::{ApiError, CreatedPost, NewPost, PostUpdate, RemotePost};
use crate::config::{BlogConfig, HttpTimeouts};

const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// HTTP client for a jsonplaceholder-style `/posts` collection.
pub struct HttpPostsApi {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPostsApi {
    /// Build a client rooted at `base_url` (trailing slashes are dropped).
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the reqwest client cannot be built.
    pub fn new(base_url: &str, timeouts: HttpTimeouts) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    /// Build a client from the endpoint and timeouts in `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::HttpClientBuild`] if the reqwest client cannot be built.
    pub fn from_config(config: &BlogConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_base_url, config.timeouts)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn collection_url(&self) -> String {
        format!("{}/posts", self.base_url)
    }

    pub(crate) fn item_url(&self, id: u64) -> String {
        format!("{}/posts/{id}", self.base_url)
    }

    fn with_json_body(request: RequestBuilder, body: &impl Serialize) -> Result<RequestBuilder, ApiError> {
        let encoded = serde_json::to_string(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        Ok(request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(encoded))
    }

    /// Send `request` and return the body text of a success response.
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::Request(e.to_string()))?;
        if !status.is_success() {
            return Err(ApiError::Status { status: status.as_u16(), body: text });
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl PostsApi for HttpPostsApi {
    async fn list_posts(&self) -> Result<Vec<RemotePost>, ApiError> {
        let text = self.send(self.http.get(self.collection_url())).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost, ApiError> {
        let request = Self::with_json_body(self.http.post(self.collection_url()), post)?;
        let text = self.send(request).await?;
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn update_post(&self, update: &PostUpdate) -> Result<(), ApiError> {
        let request = Self::with_json_body(self.http.put(self.item_url(update.id)), update)?;
        self.send(request).await?;
        Ok(())
    }

    async fn delete_post(&self, id: u64) -> Result<(), ApiError> {
        self.send(self.http.delete(self.item_url(id))).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "http_test.rs"]
mod tests;
