use arboard::Clipboard;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use tracing::warn;

use crate::app::App;
use crate::tui::AppEvent;

const WHEEL_LINES: u16 = 3;

pub fn handle_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Paste(text) => app.widget.paste(&text),
        AppEvent::Resize(_, _) => {}
        AppEvent::Widget(event) => app.widget.handle_event(event),
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('c') if ctrl => app.quit(),
        KeyCode::Esc => app.quit(),
        KeyCode::Char('v') if ctrl => paste_from_clipboard(app),

        // Shift+Enter is a literal newline. Alt+Enter too, for terminals
        // that never report shift on Enter.
        KeyCode::Enter
            if key
                .modifiers
                .intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) =>
        {
            app.widget.composer_mut().insert_newline();
        }
        KeyCode::Enter => {
            app.widget.submit();
        }

        KeyCode::PageUp => {
            let lines = app.page_size();
            app.scroll_transcript_up(lines);
        }
        KeyCode::PageDown => {
            let lines = app.page_size();
            app.scroll_transcript_down(lines);
        }

        KeyCode::Backspace => app.widget.composer_mut().backspace(),
        KeyCode::Delete => app.widget.composer_mut().delete(),
        KeyCode::Left => app.widget.composer_mut().move_left(),
        KeyCode::Right => app.widget.composer_mut().move_right(),
        KeyCode::Home => app.widget.composer_mut().move_home(),
        KeyCode::End => app.widget.composer_mut().move_end(),
        KeyCode::Char(c) if !ctrl => app.widget.composer_mut().insert_char(c),
        _ => {}
    }
}

/// Ctrl+V reads the clipboard's plain-text flavour only.
fn paste_from_clipboard(app: &mut App) {
    match Clipboard::new().and_then(|mut clipboard| clipboard.get_text()) {
        Ok(text) => app.widget.paste(&text),
        Err(e) => warn!(error = %e, "could not read clipboard"),
    }
}

/// Check if a point is within a rectangle
fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let x = mouse.column;
    let y = mouse.row;

    let in_transcript = app.transcript_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);
    let on_send = app.send_area.map(|r| point_in_rect(x, y, r)).unwrap_or(false);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) if on_send => {
            app.click_send();
        }
        MouseEventKind::ScrollUp if in_transcript => app.scroll_transcript_up(WHEEL_LINES),
        MouseEventKind::ScrollDown if in_transcript => app.scroll_transcript_down(WHEEL_LINES),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chatbox_core::{
        ChatBackend, ChatResponse, ChatRole, ChatWidget, ClientError, Locale, MessageBody,
        WidgetEvent,
    };
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    struct EchoBackend {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn send(&self, message: &str) -> Result<ChatResponse, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ChatResponse::reply(&format!("echo: {}", message)))
        }
    }

    fn test_app() -> (App, Arc<EchoBackend>, UnboundedReceiver<WidgetEvent>) {
        let backend = Arc::new(EchoBackend {
            calls: AtomicUsize::new(0),
        });
        let (tx, rx) = mpsc::unbounded_channel();
        let widget = ChatWidget::new(backend.clone(), tx, Locale::En);
        let mut app = App::new(widget, "http://localhost:5001/chat");
        app.send_area = Some(Rect::new(70, 20, 10, 3));
        app.transcript_area = Some(Rect::new(0, 1, 80, 18));
        (app, backend, rx)
    }

    fn key(code: KeyCode, modifiers: KeyModifiers) -> AppEvent {
        AppEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_event(app, key(KeyCode::Char(c), KeyModifiers::NONE));
        }
    }

    fn click(column: u16, row: u16) -> AppEvent {
        AppEvent::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    async fn drain_until_complete(app: &mut App, rx: &mut UnboundedReceiver<WidgetEvent>) {
        while let Some(event) = rx.recv().await {
            let done = matches!(event, WidgetEvent::Completed { .. });
            handle_event(app, AppEvent::Widget(event));
            if done {
                break;
            }
        }
    }

    #[tokio::test]
    async fn test_enter_submits() {
        let (mut app, backend, mut rx) = test_app();
        type_text(&mut app, "hello");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.widget.transcript().len(), 2);
        assert!(app.widget.composer().is_empty());

        drain_until_complete(&mut app, &mut rx).await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        let last = app.widget.transcript().messages().last().unwrap();
        assert_eq!(last.role, ChatRole::Bot);
        assert_eq!(last.body, MessageBody::Markdown("echo: hello".into()));
    }

    #[tokio::test]
    async fn test_shift_enter_inserts_newline() {
        let (mut app, _backend, _rx) = test_app();
        type_text(&mut app, "line one");
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::SHIFT));
        type_text(&mut app, "two");

        assert!(app.widget.transcript().is_empty());
        assert_eq!(app.widget.composer().text(), "line one\ntwo");
    }

    #[tokio::test]
    async fn test_send_button_click_submits() {
        let (mut app, _backend, _rx) = test_app();
        type_text(&mut app, "clicked");
        handle_event(&mut app, click(72, 21));

        assert_eq!(app.widget.transcript().len(), 2);
        assert!(!app.widget.is_send_enabled());
    }

    #[tokio::test]
    async fn test_click_outside_button_does_nothing() {
        let (mut app, _backend, _rx) = test_app();
        type_text(&mut app, "stay");
        handle_event(&mut app, click(10, 21));

        assert!(app.widget.transcript().is_empty());
        assert_eq!(app.widget.composer().text(), "stay");
    }

    #[tokio::test]
    async fn test_disabled_button_ignores_clicks() {
        let (mut app, backend, mut rx) = test_app();
        type_text(&mut app, "first");
        handle_event(&mut app, click(72, 21));
        type_text(&mut app, "second");
        handle_event(&mut app, click(72, 21));
        handle_event(&mut app, key(KeyCode::Enter, KeyModifiers::NONE));

        assert_eq!(app.widget.transcript().len(), 2);
        assert_eq!(app.widget.composer().text(), "second");

        drain_until_complete(&mut app, &mut rx).await;
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        assert!(app.widget.is_send_enabled());
    }

    #[tokio::test]
    async fn test_bracketed_paste_is_plain_text() {
        let (mut app, _backend, _rx) = test_app();
        handle_event(
            &mut app,
            AppEvent::Paste("\x1b[32mgreen\x1b[0m\r\ntext".to_string()),
        );
        assert_eq!(app.widget.composer().text(), "green\ntext");
    }

    #[tokio::test]
    async fn test_quit_keys() {
        let (mut app, _backend, _rx) = test_app();
        handle_event(&mut app, key(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);

        let (mut app, _backend, _rx) = test_app();
        handle_event(&mut app, key(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_page_up_unpins_transcript() {
        let (mut app, _backend, _rx) = test_app();
        app.widget.transcript_mut().resolve_scroll(30);
        handle_event(&mut app, key(KeyCode::PageUp, KeyModifiers::NONE));
        assert!(!app.widget.transcript().is_pinned());

        handle_event(&mut app, key(KeyCode::PageDown, KeyModifiers::NONE));
        assert!(app.widget.transcript().is_pinned());
    }
}
