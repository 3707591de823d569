//! Post records as exchanged with the blog API
//!
//! These types are shared by every front end and don't depend on any UI
//! framework.

use serde::{Deserialize, Serialize};

/// Server-assigned post identifier
pub type PostId = i64;

/// A post as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
}

/// The user's in-progress, unsaved post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPost {
    pub title: String,
    pub content: String,
}

impl DraftPost {
    pub fn new(title: &str, content: &str) -> Self {
        Self {
            title: title.to_string(),
            content: content.to_string(),
        }
    }

    pub fn clear(&mut self) {
        self.title.clear();
        self.content.clear();
    }
}
