use async_trait::async_trait;

use crate::error::ApiError;
use crate::post::{DraftPost, Post, PostId};

/// Remote collection of posts.
///
/// `PostBoard` only ever talks to the backend through this trait, so front
/// ends and tests can swap the transport.
///
/// Writes only report success or failure; the board re-fetches the list
/// afterwards, so the response bodies of create and update are not needed.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError>;
    async fn create_post(&self, draft: &DraftPost) -> Result<(), ApiError>;
    async fn update_post(&self, id: PostId, draft: &DraftPost) -> Result<(), ApiError>;
    async fn delete_post(&self, id: PostId) -> Result<(), ApiError>;
}
