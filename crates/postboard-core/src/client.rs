use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

use crate::error::ApiError;
use crate::post::{DraftPost, Post, PostId};
use crate::repository::PostRepository;

/// HTTP client for the `/posts/` collection of a blog API.
#[derive(Clone)]
pub struct PostsClient {
    client: Client,
    base_url: String,
}

impl PostsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/posts/", self.base_url)
    }

    fn item_url(&self, id: PostId) -> String {
        format!("{}/posts/{}", self.base_url, id)
    }
}

/// Turn a non-2xx response into `ApiError::Status`, otherwise return the body.
async fn read_body(response: Response) -> Result<String, ApiError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        return Err(ApiError::from_status(status, &text));
    }

    Ok(text)
}

#[async_trait]
impl PostRepository for PostsClient {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        let url = self.collection_url();
        debug!(%url, "listing posts");

        let response = self.client.get(&url).send().await?;
        let body = read_body(response).await?;

        let posts: Vec<Post> = serde_json::from_str(&body)?;
        Ok(posts)
    }

    async fn create_post(&self, draft: &DraftPost) -> Result<(), ApiError> {
        let url = self.collection_url();
        debug!(%url, title = %draft.title, "creating post");

        // Any 2xx counts; the created post shows up in the next list fetch
        let response = self.client.post(&url).json(draft).send().await?;
        read_body(response).await?;
        Ok(())
    }

    async fn update_post(&self, id: PostId, draft: &DraftPost) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!(%url, title = %draft.title, "updating post");

        let response = self.client.put(&url).json(draft).send().await?;
        read_body(response).await?;
        Ok(())
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ApiError> {
        let url = self.item_url(id);
        debug!(%url, "deleting post");

        let response = self.client.delete(&url).send().await?;
        read_body(response).await?;
        Ok(())
    }
}
