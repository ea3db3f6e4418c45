//! Content store: the post collection and its request lifecycle.
//!
//! DESIGN
//! ======
//! Every operation follows the same shape: mark `loading` and clear the
//! previous error, call the endpoint, then either apply the result to the
//! local collection or record an operation-specific error message. Mutating
//! operations additionally return the failure to the caller, so a UI can
//! react to the `Result` without watching `error`.
//!
//! CONCURRENCY
//! ===========
//! Operations are not serialized. Two overlapping calls each set
//! `loading = true` on entry and `loading = false` on completion, so the
//! flags reflect whichever call finished last. Subscribers observe each
//! intermediate state.

use std::sync::Arc;

use chrono::TimeDelta;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::api::{ApiError, NewPost, PostUpdate, PostsApi};
use crate::clock::Clock;
use crate::config::{BlogConfig, DEFAULT_FETCH_LIMIT};
use crate::types::Post;

/// Fetched posts are back-dated by a random amount up to this many days.
pub const CREATED_AT_WINDOW_DAYS: i64 = 30;

/// Observable state of the content collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostsState {
    /// Fetch order, newest-created first.
    pub posts: Vec<Post>,
    /// True while a request is outstanding.
    pub loading: bool,
    pub error: Option<String>,
}

/// Content store failures. `Display` is the message stored in
/// [`PostsState::error`].
#[derive(Debug, thiserror::Error)]
pub enum PostsError {
    #[error("Failed to fetch posts")]
    Fetch(#[source] ApiError),
    #[error("Failed to create post")]
    Create(#[source] ApiError),
    #[error("Failed to update post")]
    Update(#[source] ApiError),
    #[error("Failed to delete post")]
    Delete(#[source] ApiError),
}

impl PostsError {
    /// The endpoint failure behind this error.
    #[must_use]
    pub fn api_error(&self) -> &ApiError {
        match self {
            Self::Fetch(e) | Self::Create(e) | Self::Update(e) | Self::Delete(e) => e,
        }
    }
}

/// Handle to the post collection. Clones share the same state.
#[derive(Clone)]
pub struct PostsStore {
    state: Arc<watch::Sender<PostsState>>,
    api: Arc<dyn PostsApi>,
    clock: Arc<dyn Clock>,
    fetch_limit: usize,
}

impl PostsStore {
    #[must_use]
    pub fn new(api: Arc<dyn PostsApi>, clock: Arc<dyn Clock>) -> Self {
        let (state, _) = watch::channel(PostsState::default());
        Self { state: Arc::new(state), api, clock, fetch_limit: DEFAULT_FETCH_LIMIT }
    }

    /// Create a store using the fetch limit from `config`.
    #[must_use]
    pub fn from_config(config: &BlogConfig, api: Arc<dyn PostsApi>, clock: Arc<dyn Clock>) -> Self {
        Self::new(api, clock).with_fetch_limit(config.fetch_limit)
    }

    /// Keep at most `limit` posts from each fetch.
    #[must_use]
    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = limit;
        self
    }

    /// Snapshot of the whole state.
    #[must_use]
    pub fn state(&self) -> PostsState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn posts(&self) -> Vec<Post> {
        self.state.borrow().posts.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.state.borrow().error.clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PostsState> {
        self.state.subscribe()
    }

    /// Replace the collection with the first page of the remote one.
    ///
    /// Failures only land in [`PostsState::error`]; the previous
    /// collection is kept.
    pub async fn fetch_posts(&self) {
        self.begin();
        match self.api.list_posts().await {
            Ok(remote) => {
                let now = self.clock.now();
                let window = TimeDelta::days(CREATED_AT_WINDOW_DAYS);
                let posts: Vec<Post> = remote
                    .into_iter()
                    .take(self.fetch_limit)
                    .map(|p| Post {
                        id: p.id,
                        user_id: p.user_id,
                        title: p.title,
                        body: p.body,
                        created_at: now - self.clock.random_offset(window),
                        updated_at: now,
                    })
                    .collect();
                let count = posts.len();
                self.state.send_modify(|s| {
                    s.posts = posts;
                    s.loading = false;
                });
                info!(count, "posts fetched");
            }
            Err(e) => {
                self.fail(PostsError::Fetch(e));
            }
        }
    }

    /// Submit a post and prepend it locally.
    ///
    /// The local id comes from the clock (bumped past any id already in the
    /// collection); the endpoint's id is discarded.
    ///
    /// # Errors
    ///
    /// Returns [`PostsError::Create`] when the endpoint call fails.
    pub async fn create_post(&self, title: &str, body: &str, user_id: u64) -> Result<Post, PostsError> {
        self.begin();
        let request = NewPost { title: title.to_owned(), body: body.to_owned(), user_id };
        let echo = match self.api.create_post(&request).await {
            Ok(echo) => echo,
            Err(e) => return Err(self.fail(PostsError::Create(e))),
        };

        let now = self.clock.now();
        let id = unique_local_id(&self.state.borrow().posts, self.clock.now_millis());
        let post = Post {
            id,
            user_id: echo.user_id.unwrap_or(request.user_id),
            title: echo.title.unwrap_or(request.title),
            body: echo.body.unwrap_or(request.body),
            created_at: now,
            updated_at: now,
        };
        self.state.send_modify(|s| {
            s.posts.insert(0, post.clone());
            s.loading = false;
        });
        info!(id, remote_id = ?echo.id, "post created");
        Ok(post)
    }

    /// Update title and body of post `id`.
    ///
    /// The endpoint is called even when `id` is not in the local
    /// collection; in that case nothing changes locally.
    ///
    /// # Errors
    ///
    /// Returns [`PostsError::Update`] when the endpoint call fails.
    pub async fn update_post(&self, id: u64, title: &str, body: &str) -> Result<(), PostsError> {
        self.begin();
        let request = PostUpdate { id, title: title.to_owned(), body: body.to_owned() };
        if let Err(e) = self.api.update_post(&request).await {
            return Err(self.fail(PostsError::Update(e)));
        }

        let now = self.clock.now();
        let mut found = false;
        self.state.send_modify(|s| {
            if let Some(post) = s.posts.iter_mut().find(|p| p.id == id) {
                post.title = request.title;
                post.body = request.body;
                post.updated_at = now;
                found = true;
            }
            s.loading = false;
        });
        if found {
            info!(id, "post updated");
        } else {
            debug!(id, "updated post not in local collection");
        }
        Ok(())
    }

    /// Delete post `id` and drop it from the collection.
    ///
    /// # Errors
    ///
    /// Returns [`PostsError::Delete`] when the endpoint call fails.
    pub async fn delete_post(&self, id: u64) -> Result<(), PostsError> {
        self.begin();
        if let Err(e) = self.api.delete_post(id).await {
            return Err(self.fail(PostsError::Delete(e)));
        }

        self.state.send_modify(|s| {
            s.posts.retain(|p| p.id != id);
            s.loading = false;
        });
        info!(id, "post deleted");
        Ok(())
    }

    /// The post with `id`, or `None` when the collection has no such post.
    #[must_use]
    pub fn get_post_by_id(&self, id: u64) -> Option<Post> {
        self.state.borrow().posts.iter().find(|p| p.id == id).cloned()
    }

    fn begin(&self) {
        self.state.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });
    }

    fn fail(&self, err: PostsError) -> PostsError {
        warn!(error = %err.api_error(), "{err}");
        let message = err.to_string();
        self.state.send_modify(|s| {
            s.error = Some(message);
            s.loading = false;
        });
        err
    }
}

/// `candidate`, or the next id above it not already taken in `posts`.
fn unique_local_id(posts: &[Post], candidate: u64) -> u64 {
    let mut id = candidate;
    while posts.iter().any(|p| p.id == id) {
        id = id.saturating_add(1);
    }
    id
}

#[cfg(test)]
#[path = "posts_test.rs"]
mod tests;
