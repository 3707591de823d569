pub mod board;
pub mod client;
pub mod config;
pub mod error;
pub mod post;
pub mod repository;

// Re-export main types for convenience
pub use board::{MissingField, PostBoard, Submission};
pub use client::PostsClient;
pub use config::Config;
pub use error::ApiError;
pub use post::{DraftPost, Post, PostId};
pub use repository::PostRepository;
pub use reqwest::StatusCode;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;
