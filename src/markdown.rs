//! Markdown to styled ratatui lines, for bot messages.
//!
//! Raw HTML in the source is shown as text, never interpreted.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const CODE: Style = Style::new().fg(Color::Yellow);
const LINK: Style = Style::new().fg(Color::Blue).add_modifier(Modifier::UNDERLINED);
const MUTED: Style = Style::new().fg(Color::DarkGray);
const QUOTE_BAR: Style = Style::new().fg(Color::Green);

pub fn render(markdown: &str) -> Vec<Line<'static>> {
    let parser = Parser::new_ext(
        markdown,
        Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS,
    );

    let mut state = RenderState::default();
    for event in parser {
        state.handle_event(event);
    }
    state.finish()
}

#[derive(Default)]
struct RenderState {
    lines: Vec<Line<'static>>,
    spans: Vec<Span<'static>>,
    styles: Vec<Style>,
    /// One entry per open list; `Some(n)` is the next ordered number.
    lists: Vec<Option<u64>>,
    quote_depth: usize,
    in_code_block: bool,
    link_url: Option<String>,
}

impl RenderState {
    fn handle_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if self.in_code_block {
                    self.code_text(&text);
                } else {
                    self.push(text.into_string(), self.style());
                }
            }
            Event::Code(code) => self.push(code.into_string(), CODE),
            Event::Html(html) | Event::InlineHtml(html) => {
                for (i, part) in html.split('\n').enumerate() {
                    if i > 0 {
                        self.flush();
                    }
                    self.push(part.to_string(), self.style());
                }
            }
            Event::SoftBreak => self.push(" ".to_string(), self.style()),
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.blank_line();
                self.lines.push(Line::from(Span::styled("─".repeat(24), MUTED)));
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push(marker.to_string(), MUTED);
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            Tag::Heading { level, .. } => {
                self.blank_line();
                let style = heading_style(level);
                self.push(format!("{} ", "#".repeat(heading_depth(level))), style);
                self.styles.push(style);
            }
            Tag::BlockQuote(_) => {
                self.blank_line();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.blank_line();
                self.in_code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        self.lines.push(Line::from(Span::styled(lang.to_string(), MUTED)));
                    }
                }
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.blank_line();
                } else {
                    self.flush();
                }
                self.lists.push(start);
            }
            Tag::Item => {
                self.flush();
                let indent = "  ".repeat(self.lists.len().saturating_sub(1));
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let bullet = format!("{}. ", n);
                        *n += 1;
                        bullet
                    }
                    _ => "• ".to_string(),
                };
                self.push(format!("{}{}", indent, bullet), MUTED);
            }
            Tag::Emphasis => self.styles.push(self.style().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.styles.push(self.style().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => self
                .styles
                .push(self.style().add_modifier(Modifier::CROSSED_OUT)),
            Tag::Link { dest_url, .. } => {
                self.styles.push(self.style().patch(LINK));
                self.link_url = Some(dest_url.into_string());
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.flush(),
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.flush();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            TagEnd::CodeBlock => {
                self.in_code_block = false;
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
            }
            TagEnd::Item => self.flush(),
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                if let Some(url) = self.link_url.take() {
                    let shown = self.spans.last().map(|s| s.content == url).unwrap_or(false);
                    if !shown {
                        self.push(format!(" ({})", url), MUTED);
                    }
                }
            }
            _ => {}
        }
    }

    fn style(&self) -> Style {
        self.styles.last().copied().unwrap_or_default()
    }

    fn push(&mut self, text: String, style: Style) {
        if !text.is_empty() {
            self.spans.push(Span::styled(text, style));
        }
    }

    fn code_text(&mut self, text: &str) {
        for line in text.lines() {
            self.spans.push(Span::styled(format!("  {}", line), CODE));
            self.flush();
        }
    }

    fn flush(&mut self) {
        if self.spans.is_empty() {
            return;
        }
        let mut spans = Vec::with_capacity(self.spans.len() + 1);
        if self.quote_depth > 0 {
            spans.push(Span::styled("│ ".repeat(self.quote_depth), QUOTE_BAR));
        }
        spans.append(&mut self.spans);
        self.lines.push(Line::from(spans));
    }

    /// Separate blocks with one empty line, never at the top.
    fn blank_line(&mut self) {
        self.flush();
        if self.lines.last().map(|l| l.width() > 0).unwrap_or(false) {
            self.lines.push(Line::default());
        }
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().map(|l| l.width() == 0).unwrap_or(false) {
            self.lines.pop();
        }
        self.lines
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    let style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    match level {
        HeadingLevel::H1 => style.add_modifier(Modifier::UNDERLINED),
        _ => style,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn texts(markdown: &str) -> Vec<String> {
        render(markdown).iter().map(text_of).collect()
    }

    #[test]
    fn test_plain_paragraphs() {
        assert_eq!(texts("first\n\nsecond"), vec!["first", "", "second"]);
    }

    #[test]
    fn test_soft_break_joins_lines() {
        assert_eq!(texts("one\ntwo"), vec!["one two"]);
    }

    #[test]
    fn test_bold_and_italic_styles() {
        let lines = render("a **b** *c*");
        let spans = &lines[0].spans;
        assert_eq!(spans[0].content, "a ");
        assert_eq!(spans[1].content, "b");
        assert!(spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(spans[3].content, "c");
        assert!(spans[3].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_heading_keeps_hash_prefix() {
        let lines = render("## Quota\nbody");
        assert_eq!(text_of(&lines[0]), "## Quota");
        assert!(lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(text_of(&lines[2]), "body");
    }

    #[test]
    fn test_lists() {
        assert_eq!(texts("- a\n- b"), vec!["• a", "• b"]);
        assert_eq!(texts("3. x\n4. y"), vec!["3. x", "4. y"]);
        assert_eq!(texts("- a\n  - b"), vec!["• a", "  • b"]);
    }

    #[test]
    fn test_code_block_lines() {
        let lines = texts("```sql\nSELECT 1;\nSELECT 2;\n```");
        assert_eq!(lines, vec!["sql", "  SELECT 1;", "  SELECT 2;"]);
    }

    #[test]
    fn test_link_shows_url() {
        assert_eq!(
            texts("see [site](https://example.com)"),
            vec!["see site (https://example.com)"]
        );
        assert_eq!(
            texts("<https://example.com>"),
            vec!["https://example.com"]
        );
    }

    #[test]
    fn test_blockquote_prefix() {
        assert_eq!(texts("> quoted"), vec!["│ quoted"]);
    }

    #[test]
    fn test_html_is_literal() {
        assert_eq!(texts("a <b>bold</b>"), vec!["a <b>bold</b>"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(render("").is_empty());
    }
}
