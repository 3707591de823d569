use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use crate::app::{App, FormField, InputMode};
use crate::tui::AppEvent;

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(_, _) => {}
        AppEvent::Tick => app.tick_animation(),
        AppEvent::Api(result) => app.apply_api_event(result),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Post list navigation
        KeyCode::Char('j') | KeyCode::Down => app.nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.nav_up(),

        KeyCode::Char('d') => app.delete_selected(),
        KeyCode::Char('e') => app.edit_selected(),
        KeyCode::Char('n') => app.new_post(),
        KeyCode::Char('r') => app.refresh(),

        // Back to the form
        KeyCode::Char('i') | KeyCode::Tab | KeyCode::Enter => {
            app.input_mode = InputMode::Editing;
        }

        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.submit();
        return;
    }

    match key.code {
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            if app.posts_state.selected().is_none() {
                app.nav_down();
            }
        }
        KeyCode::Tab | KeyCode::BackTab => app.next_field(),
        KeyCode::Enter => match app.field {
            FormField::Title => app.field = FormField::Content,
            FormField::Content => app.submit(),
        },
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_char(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.insert_char(c);
        }
        _ => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollDown => app.nav_down(),
        MouseEventKind::ScrollUp => app.nav_up(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_core::testing::{post, FakeRepo};
    use crate::tui::ApiEvent;
    use postboard_core::DraftPost;
    use std::sync::Arc;
    use tokio::sync::mpsc::unbounded_channel;

    fn key(code: KeyCode) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> AppEvent {
        AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn new_app(repo: Arc<FakeRepo>) -> App {
        let (tx, _rx) = unbounded_channel();
        App::new(repo, "http://test", tx)
    }

    #[test]
    fn test_typing_fills_form() {
        let mut app = new_app(Arc::new(FakeRepo::default()));

        for c in "Title".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, key(KeyCode::Enter)).unwrap();
        for c in "Body".chars() {
            handle_event(&mut app, key(KeyCode::Char(c))).unwrap();
        }
        handle_event(&mut app, key(KeyCode::Backspace)).unwrap();

        assert_eq!(app.board.draft(), &DraftPost::new("Title", "Bod"));
        assert_eq!(app.field, FormField::Content);
    }

    #[test]
    fn test_q_types_while_editing() {
        let mut app = new_app(Arc::new(FakeRepo::default()));

        handle_event(&mut app, key(KeyCode::Char('q'))).unwrap();

        assert!(!app.should_quit);
        assert_eq!(app.board.draft().title, "q");
    }

    #[test]
    fn test_esc_then_q_quits() {
        let mut app = new_app(Arc::new(FakeRepo::default()));

        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.input_mode, InputMode::Normal);
        handle_event(&mut app, key(KeyCode::Char('q'))).unwrap();

        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_from_editing() {
        let mut app = new_app(Arc::new(FakeRepo::default()));

        handle_event(&mut app, ctrl('c')).unwrap();

        assert!(app.should_quit);
        assert_eq!(app.board.draft().title, "");
    }

    #[test]
    fn test_ctrl_s_with_empty_form_sends_nothing() {
        let repo = Arc::new(FakeRepo::default());
        let mut app = new_app(repo.clone());

        handle_event(&mut app, ctrl('s')).unwrap();

        assert!(repo.calls().is_empty());
        assert_eq!(app.board.pending(), 0);
        assert_eq!(app.field, FormField::Title);
        assert!(app.notice.is_some());
    }

    #[test]
    fn test_normal_mode_navigation() {
        let mut app = new_app(Arc::new(FakeRepo::default()));
        handle_event(
            &mut app,
            AppEvent::Api(ApiEvent::Listed(Ok(vec![post(1, "a"), post(2, "b"), post(3, "c")]))),
        )
        .unwrap();

        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert_eq!(app.posts_state.selected(), Some(0));

        handle_event(&mut app, key(KeyCode::Char('j'))).unwrap();
        handle_event(&mut app, key(KeyCode::Down)).unwrap();
        handle_event(&mut app, key(KeyCode::Down)).unwrap();
        assert_eq!(app.selected_post().map(|p| p.id), Some(3));

        handle_event(&mut app, key(KeyCode::Char('k'))).unwrap();
        assert_eq!(app.selected_post().map(|p| p.id), Some(2));

        handle_event(&mut app, key(KeyCode::Char('i'))).unwrap();
        assert_eq!(app.input_mode, InputMode::Editing);
    }

    #[test]
    fn test_e_loads_selected_post() {
        let mut app = new_app(Arc::new(FakeRepo::default()));
        handle_event(
            &mut app,
            AppEvent::Api(ApiEvent::Listed(Ok(vec![post(1, "a"), post(2, "b")]))),
        )
        .unwrap();
        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        handle_event(&mut app, key(KeyCode::Char('j'))).unwrap();

        handle_event(&mut app, key(KeyCode::Char('e'))).unwrap();

        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.board.editing(), Some(2));
        assert_eq!(app.board.draft(), &DraftPost::new("b", "b body"));

        handle_event(&mut app, key(KeyCode::Esc)).unwrap();
        handle_event(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.board.editing(), None);
        assert_eq!(app.board.draft(), &DraftPost::default());
    }
}
