use chatbox_core::{Alignment as Side, ChatMessage, ChatRole, Locale, MessageBody};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::app::App;
use crate::markdown;

const MIN_COMPOSER_HEIGHT: u16 = 3;
const MAX_COMPOSER_HEIGHT: u16 = 8;
const SEND_BUTTON_WIDTH: u16 = 10;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    let composer_lines = u16::try_from(app.widget.composer().line_count()).unwrap_or(u16::MAX);
    let composer_height = composer_lines
        .saturating_add(2)
        .clamp(MIN_COMPOSER_HEIGHT, MAX_COMPOSER_HEIGHT);

    // Main layout: header, transcript, composer, footer
    let [header_area, transcript_area, composer_row, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(composer_height),
        Constraint::Length(1),
    ])
    .areas(area);

    let [composer_area, send_area] = Layout::horizontal([
        Constraint::Min(0),
        Constraint::Length(SEND_BUTTON_WIDTH),
    ])
    .areas(composer_row);

    // Store areas for mouse hit-testing
    app.transcript_area = Some(transcript_area);
    app.send_area = Some(send_area);

    render_header(app, frame, header_area);
    render_transcript(app, frame, transcript_area);
    render_composer(app, frame, composer_area);
    render_send_button(app, frame, send_area);
    render_footer(frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let status = if app.widget.is_processing() {
        Span::styled(" waiting for reply ", Style::default().fg(Color::Yellow))
    } else {
        Span::raw("")
    };

    let title = Line::from(vec![
        Span::styled(" chatbox ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(app.endpoint.clone(), Style::default().fg(Color::Gray)),
        status,
        Span::styled(
            format!(" v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

/// Lines for one message: role label, body, blank separator.
fn message_lines(message: &ChatMessage, locale: Locale) -> Vec<Line<'static>> {
    let (label, label_style) = match message.role {
        ChatRole::User => (
            locale.user_label(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        ChatRole::Bot => (
            locale.bot_label(),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
    };
    let alignment = match message.alignment() {
        Side::Start => Alignment::Left,
        Side::End => Alignment::Right,
    };

    let mut lines = vec![Line::from(Span::styled(format!("{}:", label), label_style))];

    match &message.body {
        // Plain text is never interpreted, only stripped of control bytes
        MessageBody::Plain(text) => {
            for line in text.split('\n') {
                lines.push(Line::from(strip_controls(line)));
            }
        }
        MessageBody::Markdown(text) => lines.extend(markdown::render(text)),
    }
    lines.push(Line::default());

    lines
        .into_iter()
        .map(|line| line.alignment(alignment))
        .collect()
}

fn strip_controls(line: &str) -> String {
    line.chars()
        .map(|c| if c == '\t' { ' ' } else { c })
        .filter(|c| !c.is_control())
        .collect()
}

/// Rows `lines` occupy once word-wrapped to `width` columns, counted with the
/// same wrapping the transcript is drawn with.
fn wrapped_height(lines: &[Line<'static>], width: u16) -> u16 {
    let rows = Paragraph::new(Text::from(lines.to_vec()))
        .wrap(Wrap { trim: false })
        .line_count(width.max(1));
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_transcript(app: &mut App, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    let locale = app.widget.locale();

    if app.widget.transcript().is_empty() {
        let hint = Paragraph::new(Text::from(Span::styled(
            locale.empty_transcript_hint(),
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let lines: Vec<Line<'static>> = app
        .widget
        .transcript()
        .messages()
        .iter()
        .flat_map(|message| message_lines(message, locale))
        .collect();

    let max_scroll = wrapped_height(&lines, inner.width).saturating_sub(inner.height);
    let scroll = app.widget.transcript_mut().resolve_scroll(max_scroll);

    let transcript = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(transcript, area);
}

fn render_composer(app: &App, frame: &mut Frame, area: Rect) {
    let composer = app.widget.composer();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Message (Enter to send, Shift+Enter for newline) ");
    let inner = block.inner(area);

    // Keep the cursor line visible
    let (cursor_line, _) = composer.cursor_line_col();
    let cursor_line = cursor_line as u16;
    let scroll = cursor_line.saturating_sub(inner.height.saturating_sub(1));

    let lines: Vec<Line> = composer
        .text()
        .split('\n')
        .map(|l| Line::from(strip_controls(l)))
        .collect();

    let input = Paragraph::new(Text::from(lines))
        .style(Style::default().fg(Color::Cyan))
        .block(block)
        .scroll((scroll, 0));

    frame.render_widget(input, area);

    let cursor_x = Span::raw(strip_controls(composer.current_line_prefix())).width() as u16;
    if inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position((
            inner.x + cursor_x.min(inner.width - 1),
            inner.y + cursor_line - scroll,
        ));
    }
}

fn render_send_button(app: &App, frame: &mut Frame, area: Rect) {
    let enabled = app.widget.is_send_enabled();
    let style = if enabled {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(if enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        });

    let button = Paragraph::new(Line::from(Span::styled(
        app.widget.locale().send_label(),
        style,
    )))
    .alignment(Alignment::Center)
    .block(block);

    frame.render_widget(button, area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let hints = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" send  "),
        Span::styled("Shift+Enter", Style::default().fg(Color::Cyan)),
        Span::raw(" newline  "),
        Span::styled("Ctrl+V", Style::default().fg(Color::Cyan)),
        Span::raw(" paste  "),
        Span::styled("PgUp/PgDn", Style::default().fg(Color::Cyan)),
        Span::raw(" scroll  "),
        Span::styled("Esc", Style::default().fg(Color::Cyan)),
        Span::raw(" quit"),
    ]);
    frame.render_widget(Paragraph::new(hints), area);
}
