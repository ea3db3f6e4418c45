//! Collection endpoint wire types and errors.

use serde::{Deserialize, Serialize};

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by collection endpoint calls.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or the response body not read.
    #[error("request failed: {0}")]
    Request(String),

    /// The endpoint returned a non-success HTTP status.
    #[error("unexpected response status {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// RESPONSES
// =============================================================================

/// An item of `GET /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemotePost {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
    pub body: String,
}

/// Echo of `POST /posts`. Every field is optional; the endpoint is a mock
/// and only the fields it sends back are trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatedPost {
    /// Server-assigned id. Never used as the local id.
    pub id: Option<u64>,
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub body: Option<String>,
}

// =============================================================================
// REQUESTS
// =============================================================================

/// Body of `POST /posts`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    pub title: String,
    pub body: String,
    pub user_id: u64,
}

/// Body of `PUT /posts/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostUpdate {
    pub id: u64,
    pub title: String,
    pub body: String,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
