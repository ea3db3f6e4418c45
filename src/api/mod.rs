//! Collection endpoint access.
//!
//! DESIGN
//! ======
//! The content store talks to the endpoint only through [`PostsApi`], so
//! tests swap in a scripted implementation and the CLI plugs in
//! [`HttpPostsApi`]. Four calls mirror the four routes the front-end uses:
//! `GET /posts`, `POST /posts`, `PUT /posts/:id`, `DELETE /posts/:id`.

pub mod http;
pub mod types;

pub use http::HttpPostsApi;
pub use types::{ApiError, CreatedPost, NewPost, PostUpdate, RemotePost};

/// Remote post collection.
#[async_trait::async_trait]
pub trait PostsApi: Send + Sync {
    /// Fetch the full remote collection.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport, status or decode failure.
    async fn list_posts(&self) -> Result<Vec<RemotePost>, ApiError>;

    /// Submit a new post and return the endpoint's echo.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport, status or decode failure.
    async fn create_post(&self, post: &NewPost) -> Result<CreatedPost, ApiError>;

    /// Replace title and body of post `update.id`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or status failure.
    async fn update_post(&self, update: &PostUpdate) -> Result<(), ApiError>;

    /// Delete post `id`. The response body is ignored.
    ///
    /// # Errors
    ///
    /// Returns an [`ApiError`] on transport or status failure.
    async fn delete_post(&self, id: u64) -> Result<(), ApiError>;
}
