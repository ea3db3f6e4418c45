//! # blogspace
//!
//! Client-side state layer for the BlogSpace blogging front-end: a session
//! store for (simulated) authentication and a content store that mirrors a
//! remote `/posts` collection in memory.
//!
//! Both stores are plain values built with a constructor and injected
//! collaborators ([`api::PostsApi`], [`storage::SessionStorage`],
//! [`clock::Clock`]), so every test gets its own isolated instance.

pub mod api;
pub mod clock;
pub mod config;
pub mod posts;
pub mod session;
pub mod storage;
pub mod types;

pub use posts::{PostsError, PostsState, PostsStore};
pub use session::SessionStore;
pub use types::{AuthOutcome, Post, Session, User};
