use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use postboard_core::board::EMPTY_PLACEHOLDER;
use crate::app::{App, FormField, InputMode};

const HIGHLIGHT_SYMBOL: &str = "> ";

/// Greedy word wrap to `width` columns, splitting words longer than a line
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if current_len > 0 && current_len + 1 + word_len > width {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }

            if word_len > width {
                // Hard-split words that can never fit
                for c in word.chars() {
                    if current_len == width {
                        lines.push(std::mem::take(&mut current));
                        current_len = 0;
                    }
                    current.push(c);
                    current_len += 1;
                }
                continue;
            }

            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current.push_str(word);
            current_len += word_len;
        }

        lines.push(current);
    }

    lines
}

/// Rows of exactly `width` characters, keeping every space, so character
/// index `i` sits at row `i / width`, column `i % width`
fn char_wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width).map(|row| row.iter().collect()).collect()
}

/// First visible position of a window of `size` that still contains `cursor`
fn scroll_offset(cursor: usize, size: usize) -> usize {
    cursor.saturating_sub(size.saturating_sub(1))
}

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    let [title_area, content_area, status_area, posts_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(5),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(body_area);

    render_form(app, frame, title_area, content_area);
    render_status(app, frame, status_area);
    render_posts(app, frame, posts_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" PostBoard ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.base_url.clone(), Style::default().fg(Color::White)),
        Span::raw(" "),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn field_block(app: &App, field: FormField, title: String) -> Block<'static> {
    let focused = app.input_mode == InputMode::Editing && app.field == field;
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Yellow } else { Color::DarkGray }))
        .title(title)
}

fn render_form(app: &App, frame: &mut Frame, title_area: Rect, content_area: Rect) {
    let draft = app.board.draft();
    let editing = app.input_mode == InputMode::Editing;

    let (title_label, content_label) = match app.board.editing() {
        Some(id) => (format!(" Title (editing #{}) ", id), " Content ".to_string()),
        None => (" Title ".to_string(), " Content ".to_string()),
    };

    // Title scrolls horizontally to keep the cursor in view
    let title_block = field_block(app, FormField::Title, title_label);
    let title_inner = title_block.inner(title_area);
    let title_offset = if editing && app.field == FormField::Title {
        scroll_offset(app.title_cursor, title_inner.width as usize)
    } else {
        0
    };
    let visible_title: String = draft.title.chars().skip(title_offset).collect();
    let title = Paragraph::new(visible_title)
        .style(Style::default().fg(Color::Cyan))
        .block(title_block);
    frame.render_widget(title, title_area);

    // Content wraps by character so the cursor maps straight onto the rows
    let content_block = field_block(app, FormField::Content, content_label);
    let content_inner = content_block.inner(content_area);
    let width = content_inner.width.max(1) as usize;
    let cursor_row = app.content_cursor / width;
    let first_row = if editing && app.field == FormField::Content {
        scroll_offset(cursor_row, content_inner.height as usize)
    } else {
        0
    };
    let content_lines: Vec<Line> = char_wrap(&draft.content, width)
        .into_iter()
        .skip(first_row)
        .map(Line::from)
        .collect();
    let content = Paragraph::new(content_lines)
        .style(Style::default().fg(Color::Cyan))
        .block(content_block);
    frame.render_widget(content, content_area);

    // Show cursor when editing
    if editing {
        match app.field {
            FormField::Title => {
                let x = (app.title_cursor - title_offset) as u16;
                frame.set_cursor_position((title_inner.x + x, title_inner.y));
            }
            FormField::Content => {
                let row = (cursor_row - first_row) as u16;
                let col = (app.content_cursor % width) as u16;
                frame.set_cursor_position((content_inner.x + col, content_inner.y + row));
            }
        }
    }
}

fn render_status(app: &App, frame: &mut Frame, area: Rect) {
    // Error takes priority over the empty-field notice
    let line = if let Some(error) = app.board.error() {
        Line::from(Span::styled(format!(" {}", error), Style::default().fg(Color::Red).bold()))
    } else if let Some(notice) = &app.notice {
        Line::from(Span::styled(format!(" {}", notice), Style::default().fg(Color::Yellow)))
    } else {
        Line::default()
    };

    frame.render_widget(Paragraph::new(line), area);
}

fn render_posts(app: &mut App, frame: &mut Frame, area: Rect) {
    let focused = app.input_mode == InputMode::Normal;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { Color::Cyan } else { Color::DarkGray }))
        .title(format!(" Posts ({}) ", app.board.posts().len()));

    if app.board.posts().is_empty() {
        let placeholder = Paragraph::new(EMPTY_PLACEHOLDER)
            .style(Style::default().fg(Color::DarkGray))
            .block(block)
            .wrap(Wrap { trim: true });
        frame.render_widget(placeholder, area);
        return;
    }

    let text_width = block
        .inner(area)
        .width
        .saturating_sub(HIGHLIGHT_SYMBOL.len() as u16) as usize;

    let items: Vec<ListItem> = app
        .board
        .posts()
        .iter()
        .map(|post| {
            let mut lines = vec![Line::from(Span::styled(
                post.title.clone(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))];
            lines.extend(wrap_text(&post.content, text_width).into_iter().map(Line::from));
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol(HIGHLIGHT_SYMBOL);

    frame.render_stateful_widget(list, area, &mut app.posts_state);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };

    let mode_text = match app.input_mode {
        InputMode::Normal => " POSTS ",
        InputMode::Editing => " EDIT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut hints = match app.input_mode {
        InputMode::Normal => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" nav ", label_style),
            Span::styled(" e ", key_style),
            Span::styled(" edit ", label_style),
            Span::styled(" n ", key_style),
            Span::styled(" new ", label_style),
            Span::styled(" d ", key_style),
            Span::styled(" delete ", label_style),
            Span::styled(" r ", key_style),
            Span::styled(" refresh ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" write ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
        InputMode::Editing => vec![
            Span::styled(" Tab ", key_style),
            Span::styled(" field ", label_style),
            Span::styled(" Ctrl+S ", key_style),
            Span::styled(" post ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" posts ", label_style),
        ],
    };

    if app.board.pending() > 0 {
        let dots = ".".repeat(app.animation_frame as usize + 1);
        hints.push(Span::styled(
            format!(" Working{:<3}", dots),
            Style::default().bg(Color::Black).fg(Color::Cyan),
        ));
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_core::testing::{post, status_error, FakeRepo};
    use crate::tui::ApiEvent;
    use ratatui::{backend::TestBackend, buffer::Buffer, Terminal};
    use std::sync::Arc;
    use tokio::sync::mpsc::unbounded_channel;

    fn new_app() -> App {
        let (tx, _rx) = unbounded_channel();
        App::new(Arc::new(FakeRepo::default()), "http://blog.test", tx)
    }

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("one two three", 7), vec!["one two", "three"]);
        assert_eq!(wrap_text("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap_text("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_text("", 10), vec![""]);
    }

    #[test]
    fn test_char_wrap_keeps_spaces() {
        assert_eq!(char_wrap("ab  cd e", 3), vec!["ab ", " cd", " e"]);
        assert!(char_wrap("", 3).is_empty());
        assert_eq!(scroll_offset(2, 5), 0);
        assert_eq!(scroll_offset(9, 5), 5);
    }

    #[test]
    fn test_content_cursor_follows_wrapped_text() {
        let mut app = new_app();
        app.next_field();
        for _ in 0..11 {
            for c in "abcde ".chars() {
                app.insert_char(c);
            }
        }
        app.backspace();

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        // 65 characters in a 58-wide box: the second row holds "e abcde"
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (8, 6));
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(7, 6)].symbol(), "e");
        assert_eq!(buffer[(8, 6)].symbol(), " ");
        assert_eq!(buffer[(1, 6)].symbol(), "e");
        assert_eq!(buffer[(2, 6)].symbol(), " ");
    }

    #[test]
    fn test_content_scrolls_to_cursor_row() {
        let mut app = new_app();
        app.next_field();
        // Five full rows in a three-row box
        for _ in 0..(58 * 5) {
            app.insert_char('x');
        }
        app.insert_char('z');

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (2, 7));
        assert_eq!(terminal.backend().buffer()[(1, 7)].symbol(), "z");
    }

    #[test]
    fn test_long_title_scrolls() {
        let mut app = new_app();
        for _ in 0..7 {
            for c in "0123456789".chars() {
                app.insert_char(c);
            }
        }

        let mut terminal = Terminal::new(TestBackend::new(60, 30)).unwrap();
        terminal.draw(|frame| render(&mut app, frame)).unwrap();

        // The end of the title stays visible next to the cursor
        let cursor = terminal.get_cursor_position().unwrap();
        assert_eq!((cursor.x, cursor.y), (58, 2));
        let buffer = terminal.backend().buffer();
        assert_eq!(buffer[(57, 2)].symbol(), "9");
        assert_eq!(buffer[(56, 2)].symbol(), "8");
    }

    #[test]
    fn test_edit_mode_label() {
        let mut app = new_app();
        app.apply_api_event(ApiEvent::Listed(Ok(vec![post(12, "Old")])));
        app.nav_down();
        app.edit_selected();

        let screen = draw(&mut app);

        assert!(screen.contains("Title (editing #12)"));
        assert!(screen.contains("Old body"));
    }

    #[test]
    fn test_empty_board_shows_placeholder() {
        let mut app = new_app();
        app.apply_api_event(ApiEvent::Listed(Ok(vec![])));

        let screen = draw(&mut app);

        assert!(screen.contains("No posts yet."));
        assert!(screen.contains("Posts (0)"));
    }

    #[test]
    fn test_posts_render_in_order() {
        let mut app = new_app();
        app.apply_api_event(ApiEvent::Listed(Ok(vec![
            post(2, "Zebra"),
            post(1, "Aardvark"),
        ])));

        let screen = draw(&mut app);

        assert!(!screen.contains("No posts yet."));
        let zebra = screen.find("Zebra").unwrap();
        let aardvark = screen.find("Aardvark").unwrap();
        assert!(zebra < aardvark);
        assert!(screen.contains("Zebra body"));
        assert!(screen.contains("Posts (2)"));
    }

    #[test]
    fn test_error_line() {
        let mut app = new_app();
        app.apply_api_event(ApiEvent::Listed(Err(status_error(500, ""))));

        let screen = draw(&mut app);

        assert!(screen.contains("Failed to fetch posts"));
    }

    #[test]
    fn test_form_shows_draft() {
        let mut app = new_app();
        app.board.set_title("Draft title");
        app.board.set_content("Draft content");

        let screen = draw(&mut app);

        assert!(screen.contains("Draft title"));
        assert!(screen.contains("Draft content"));
        assert!(screen.contains("http://blog.test"));
    }
}
