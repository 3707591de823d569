use std::sync::Arc;

use postboard_core::{MissingField, Post, PostBoard, PostRepository, Submission};
use ratatui::widgets::ListState;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::tui::{ApiEvent, AppEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

/// Form field that receives keystrokes while editing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Content,
}

impl From<MissingField> for FormField {
    fn from(field: MissingField) -> Self {
        match field {
            MissingField::Title => FormField::Title,
            MissingField::Content => FormField::Content,
        }
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub field: FormField,

    // Form cursors (character positions)
    pub title_cursor: usize,
    pub content_cursor: usize,

    // Shown when a submission is blocked by an empty field
    pub notice: Option<String>,

    pub board: PostBoard,
    pub posts_state: ListState,

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    pub base_url: String,
    repo: Arc<dyn PostRepository>,
    events: UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(
        repo: Arc<dyn PostRepository>,
        base_url: &str,
        events: UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            field: FormField::Title,

            title_cursor: 0,
            content_cursor: 0,

            notice: None,

            board: PostBoard::new(),
            posts_state: ListState::default(),

            animation_frame: 0,

            base_url: base_url.to_string(),
            repo,
            events,
        }
    }

    /// Initial load, called once before the event loop starts
    pub fn mount(&mut self) {
        self.spawn_fetch();
    }

    pub fn refresh(&mut self) {
        self.board.begin_refresh();
        self.spawn_list();
    }

    fn spawn_fetch(&mut self) {
        self.board.begin_fetch();
        self.spawn_list();
    }

    fn spawn_list(&self) {
        let repo = Arc::clone(&self.repo);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = repo.list_posts().await;
            let _ = tx.send(AppEvent::Api(ApiEvent::Listed(result)));
        });
    }

    pub fn submit(&mut self) {
        let submission = match self.board.begin_submit() {
            Ok(submission) => submission,
            Err(missing) => {
                self.notice = Some(format!("Please fill out the {} field.", missing.label()));
                self.field = missing.into();
                self.input_mode = InputMode::Editing;
                return;
            }
        };

        self.notice = None;
        debug!(?submission, "submitting post");

        let repo = Arc::clone(&self.repo);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let event = match submission {
                Submission::Create(draft) => ApiEvent::Created(repo.create_post(&draft).await),
                Submission::Update(id, draft) => ApiEvent::Updated(repo.update_post(id, &draft).await),
            };
            let _ = tx.send(AppEvent::Api(event));
        });
    }

    /// Load the selected post into the form for editing
    pub fn edit_selected(&mut self) {
        let Some(post) = self.selected_post().cloned() else {
            return;
        };

        self.board.begin_edit(&post);
        self.title_cursor = post.title.chars().count();
        self.content_cursor = post.content.chars().count();
        self.field = FormField::Title;
        self.input_mode = InputMode::Editing;
        self.notice = None;
    }

    /// Leave edit mode with an empty form
    pub fn new_post(&mut self) {
        self.board.cancel_edit();
        self.reset_form();
        self.input_mode = InputMode::Editing;
        self.notice = None;
    }

    fn reset_form(&mut self) {
        self.title_cursor = 0;
        self.content_cursor = 0;
        self.field = FormField::Title;
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_post().map(|p| p.id) else {
            return;
        };

        self.board.begin_delete();
        let repo = Arc::clone(&self.repo);
        let tx = self.events.clone();
        tokio::spawn(async move {
            let result = repo.delete_post(id).await;
            let _ = tx.send(AppEvent::Api(ApiEvent::Deleted(result)));
        });
    }

    /// Fold a finished request into the board, chaining a re-fetch where needed
    pub fn apply_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Listed(result) => {
                self.board.apply_list(result);
                self.clamp_selection();
            }
            ApiEvent::Created(result) => {
                if self.board.apply_create(result) {
                    self.reset_form();
                    self.spawn_fetch();
                }
            }
            ApiEvent::Updated(result) => {
                if self.board.apply_update(result) {
                    self.reset_form();
                    self.spawn_fetch();
                }
            }
            ApiEvent::Deleted(result) => {
                if self.board.apply_delete(result) {
                    self.spawn_fetch();
                }
            }
        }
    }

    // Post list navigation

    pub fn selected_post(&self) -> Option<&Post> {
        self.posts_state
            .selected()
            .and_then(|i| self.board.posts().get(i))
    }

    pub fn nav_down(&mut self) {
        let len = self.board.posts().len();
        if len == 0 {
            return;
        }
        let i = match self.posts_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.posts_state.select(Some(i));
    }

    pub fn nav_up(&mut self) {
        if self.board.posts().is_empty() {
            return;
        }
        let i = self.posts_state.selected().unwrap_or(0).saturating_sub(1);
        self.posts_state.select(Some(i));
    }

    fn clamp_selection(&mut self) {
        let len = self.board.posts().len();
        match self.posts_state.selected() {
            _ if len == 0 => self.posts_state.select(None),
            Some(i) if i >= len => self.posts_state.select(Some(len - 1)),
            None if self.input_mode == InputMode::Normal => self.posts_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn tick_animation(&mut self) {
        if self.board.pending() > 0 {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    // Form editing

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Content,
            FormField::Content => FormField::Title,
        };
    }

    fn active_field(&mut self) -> (&mut String, &mut usize) {
        let draft = self.board.draft_mut();
        match self.field {
            FormField::Title => (&mut draft.title, &mut self.title_cursor),
            FormField::Content => (&mut draft.content, &mut self.content_cursor),
        }
    }

    pub fn insert_char(&mut self, c: char) {
        self.notice = None;
        let (text, cursor) = self.active_field();
        let byte_pos = char_to_byte_index(text, *cursor);
        text.insert(byte_pos, c);
        *cursor += 1;
    }

    pub fn backspace(&mut self) {
        let (text, cursor) = self.active_field();
        if *cursor > 0 {
            *cursor -= 1;
            let byte_pos = char_to_byte_index(text, *cursor);
            text.remove(byte_pos);
        }
    }

    pub fn delete_char(&mut self) {
        let (text, cursor) = self.active_field();
        if *cursor < text.chars().count() {
            let byte_pos = char_to_byte_index(text, *cursor);
            text.remove(byte_pos);
        }
    }

    pub fn cursor_left(&mut self) {
        let (_, cursor) = self.active_field();
        *cursor = cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let (text, cursor) = self.active_field();
        *cursor = (*cursor + 1).min(text.chars().count());
    }

    pub fn cursor_home(&mut self) {
        let (_, cursor) = self.active_field();
        *cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        let (text, cursor) = self.active_field();
        *cursor = text.chars().count();
    }
}
