//! UI-agnostic board state
//!
//! `PostBoard` holds the four pieces of client state (posts, draft title,
//! draft content, error message) and the rules for how network results
//! change them. Front ends either drive it sequentially with `load`,
//! `submit` and `delete`, or run requests themselves and feed results back
//! through the `begin_*`/`apply_*` pairs.
//!
//! The draft doubles as the edit buffer: after `begin_edit` a submission
//! updates that post instead of creating a new one.

use tracing::{info, warn};

use crate::error::ApiError;
use crate::post::{DraftPost, Post, PostId};
use crate::repository::PostRepository;

pub const FETCH_ERROR: &str = "Failed to fetch posts";
pub const CREATE_ERROR: &str = "Failed to create post";
pub const UPDATE_ERROR: &str = "Failed to update post";
pub const DELETE_ERROR: &str = "Failed to delete post";
pub const EMPTY_PLACEHOLDER: &str = "No posts yet.";

/// Required draft field that was left empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Title,
    Content,
}

impl MissingField {
    pub fn label(&self) -> &'static str {
        match self {
            MissingField::Title => "title",
            MissingField::Content => "content",
        }
    }
}

/// Request produced by a successful `begin_submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(DraftPost),
    Update(PostId, DraftPost),
}

#[derive(Debug, Default)]
pub struct PostBoard {
    posts: Vec<Post>,
    draft: DraftPost,
    editing: Option<PostId>,
    error: Option<String>,
    pending: usize,
}

impl PostBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn draft(&self) -> &DraftPost {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut DraftPost {
        &mut self.draft
    }

    /// Post whose contents are loaded in the draft, if any
    pub fn editing(&self) -> Option<PostId> {
        self.editing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of requests started but not yet applied
    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn set_title(&mut self, title: &str) {
        self.draft.title = title.to_string();
    }

    pub fn set_content(&mut self, content: &str) {
        self.draft.content = content.to_string();
    }

    /// Load a post into the draft so the next submission updates it
    pub fn begin_edit(&mut self, post: &Post) {
        self.editing = Some(post.id);
        self.draft = DraftPost::new(&post.title, &post.content);
    }

    /// Drop the loaded post and start a fresh draft
    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.draft.clear();
    }

    // Split API: the caller runs the request and reports back

    pub fn begin_fetch(&mut self) {
        self.pending += 1;
    }

    /// User-requested re-fetch; clears the previous error like a submission does
    pub fn begin_refresh(&mut self) {
        self.error = None;
        self.begin_fetch();
    }

    pub fn apply_list(&mut self, result: Result<Vec<Post>, ApiError>) {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(posts) => {
                info!(count = posts.len(), "loaded posts");
                self.posts = posts;
            }
            Err(e) => {
                warn!(error = %e, "error fetching posts");
                self.error = Some(FETCH_ERROR.to_string());
            }
        }
    }

    /// Start a submission.
    ///
    /// Empty fields block the submission without touching the error
    /// message. Otherwise the error is cleared and the request to send is
    /// returned.
    pub fn begin_submit(&mut self) -> Result<Submission, MissingField> {
        if self.draft.title.is_empty() {
            return Err(MissingField::Title);
        }
        if self.draft.content.is_empty() {
            return Err(MissingField::Content);
        }

        self.error = None;
        self.pending += 1;
        let draft = self.draft.clone();
        Ok(match self.editing {
            Some(id) => Submission::Update(id, draft),
            None => Submission::Create(draft),
        })
    }

    /// Apply a create result. Returns true when the list must be re-fetched.
    pub fn apply_create(&mut self, result: Result<(), ApiError>) -> bool {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(()) => {
                info!("created post");
                self.draft.clear();
                true
            }
            Err(e) => {
                warn!(error = %e, "error creating post");
                self.error = Some(e.detail().unwrap_or(CREATE_ERROR).to_string());
                false
            }
        }
    }

    /// Apply an update result. Returns true when the list must be re-fetched.
    pub fn apply_update(&mut self, result: Result<(), ApiError>) -> bool {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(()) => {
                info!(id = ?self.editing, "updated post");
                self.cancel_edit();
                true
            }
            Err(e) => {
                warn!(error = %e, "error updating post");
                self.error = Some(e.detail().unwrap_or(UPDATE_ERROR).to_string());
                false
            }
        }
    }

    pub fn begin_delete(&mut self) {
        self.error = None;
        self.pending += 1;
    }

    /// Apply a delete result. Returns true when the list must be re-fetched.
    pub fn apply_delete(&mut self, result: Result<(), ApiError>) -> bool {
        self.pending = self.pending.saturating_sub(1);
        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "error deleting post");
                self.error = Some(e.detail().unwrap_or(DELETE_ERROR).to_string());
                false
            }
        }
    }

    // Sequential driver

    /// Fetch the post list once.
    pub async fn load(&mut self, repo: &dyn PostRepository) {
        self.begin_fetch();
        let result = repo.list_posts().await;
        self.apply_list(result);
    }

    /// Fetch the post list again on request.
    pub async fn refresh(&mut self, repo: &dyn PostRepository) {
        self.begin_refresh();
        let result = repo.list_posts().await;
        self.apply_list(result);
    }

    /// Submit the current draft, re-fetching the list on success.
    pub async fn submit(&mut self, repo: &dyn PostRepository) -> Result<(), MissingField> {
        let refetch = match self.begin_submit()? {
            Submission::Create(draft) => {
                let result = repo.create_post(&draft).await;
                self.apply_create(result)
            }
            Submission::Update(id, draft) => {
                let result = repo.update_post(id, &draft).await;
                self.apply_update(result)
            }
        };
        if refetch {
            self.load(repo).await;
        }
        Ok(())
    }

    /// Delete a post, re-fetching the list on success.
    pub async fn delete(&mut self, repo: &dyn PostRepository, id: PostId) {
        self.begin_delete();
        let result = repo.delete_post(id).await;
        if self.apply_delete(result) {
            self.load(repo).await;
        }
    }
}
