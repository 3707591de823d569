//! In-memory `PostRepository` for tests, here and in front-end crates.
//!
//! Enabled for this crate's own tests and, for other crates, through the
//! `test-util` feature.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::ApiError;
use crate::post::{DraftPost, Post, PostId};
use crate::repository::PostRepository;

pub fn post(id: PostId, title: &str) -> Post {
    Post {
        id,
        title: title.to_string(),
        content: format!("{} body", title),
    }
}

pub fn status_error(code: u16, body: &str) -> ApiError {
    let status = StatusCode::from_u16(code).expect("valid status code");
    ApiError::from_status(status, body)
}

/// One request seen by `FakeRepo`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List,
    Create(DraftPost),
    Update(PostId, DraftPost),
    Delete(PostId),
}

/// Repository that replays queued results and records every call.
///
/// An empty queue answers with a 500 instead of panicking: the front end
/// runs requests on spawned tasks, where a panic would leave the test
/// waiting for a result that never comes. Stray calls show up in `calls()`.
#[derive(Default)]
pub struct FakeRepo {
    calls: Mutex<Vec<Call>>,
    lists: Mutex<VecDeque<Result<Vec<Post>, ApiError>>>,
    creates: Mutex<VecDeque<Result<(), ApiError>>>,
    updates: Mutex<VecDeque<Result<(), ApiError>>>,
    deletes: Mutex<VecDeque<Result<(), ApiError>>>,
}

impl FakeRepo {
    pub fn with_list(self, result: Result<Vec<Post>, ApiError>) -> Self {
        self.lists.lock().unwrap().push_back(result);
        self
    }

    pub fn with_create(self, result: Result<(), ApiError>) -> Self {
        self.creates.lock().unwrap().push_back(result);
        self
    }

    pub fn with_update(self, result: Result<(), ApiError>) -> Self {
        self.updates.lock().unwrap().push_back(result);
        self
    }

    pub fn with_delete(self, result: Result<(), ApiError>) -> Self {
        self.deletes.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn list_calls(&self) -> usize {
        self.calls().iter().filter(|c| **c == Call::List).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn next<T>(queue: &Mutex<VecDeque<Result<T, ApiError>>>) -> Result<T, ApiError> {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| Err(status_error(500, "unexpected call")))
}

#[async_trait]
impl PostRepository for FakeRepo {
    async fn list_posts(&self) -> Result<Vec<Post>, ApiError> {
        self.record(Call::List);
        next(&self.lists)
    }

    async fn create_post(&self, draft: &DraftPost) -> Result<(), ApiError> {
        self.record(Call::Create(draft.clone()));
        next(&self.creates)
    }

    async fn update_post(&self, id: PostId, draft: &DraftPost) -> Result<(), ApiError> {
        self.record(Call::Update(id, draft.clone()));
        next(&self.updates)
    }

    async fn delete_post(&self, id: PostId) -> Result<(), ApiError> {
        self.record(Call::Delete(id));
        next(&self.deletes)
    }
}
