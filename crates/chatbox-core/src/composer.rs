use regex::Regex;
use std::sync::OnceLock;

/// Convert a character index to a byte index for UTF-8 safe string operations
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

fn escape_sequence() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // CSI, OSC (BEL or ST terminated), then any other two-byte escape
        Regex::new(r"\x1b\[[0-?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b[@-Z\\-_]")
            .expect("static regex")
    })
}

/// Reduce pasted content to plain text.
///
/// Terminal escape sequences (colours, hyperlinks, titles) are dropped, line
/// endings become `\n`, and control characters other than newline and tab are
/// removed.
pub fn sanitize_paste(raw: &str) -> String {
    let stripped = escape_sequence().replace_all(raw, "");
    stripped
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

/// The editable input buffer. The cursor is a character index.
#[derive(Debug, Default, Clone)]
pub struct Composer {
    text: String,
    cursor: usize,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Literal newline; the host maps Shift+Enter here.
    pub fn insert_newline(&mut self) {
        self.insert_char('\n');
    }

    pub fn insert_str(&mut self, s: &str) {
        let byte_pos = char_to_byte_index(&self.text, self.cursor);
        self.text.insert_str(byte_pos, s);
        self.cursor += s.chars().count();
    }

    /// Insert clipboard content as plain text only.
    pub fn paste(&mut self, raw: &str) {
        let plain = sanitize_paste(raw);
        self.insert_str(&plain);
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let byte_pos = char_to_byte_index(&self.text, self.cursor);
            self.text.remove(byte_pos);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    /// Row and column of the cursor, both counted in characters.
    pub fn cursor_line_col(&self) -> (usize, usize) {
        let before = &self.text[..char_to_byte_index(&self.text, self.cursor)];
        let line = before.matches('\n').count();
        let col = before
            .rsplit('\n')
            .next()
            .map(|l| l.chars().count())
            .unwrap_or(0);
        (line, col)
    }

    /// Text before the cursor on the cursor's line.
    pub fn current_line_prefix(&self) -> &str {
        let before = &self.text[..char_to_byte_index(&self.text, self.cursor)];
        before.rsplit('\n').next().unwrap_or("")
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_edit_multibyte() {
        let mut composer = Composer::new();
        for c in "你好!".chars() {
            composer.insert_char(c);
        }
        composer.move_left();
        composer.backspace();
        assert_eq!(composer.text(), "你!");
        assert_eq!(composer.cursor(), 1);

        composer.move_home();
        composer.delete();
        assert_eq!(composer.text(), "!");
    }

    #[test]
    fn test_cursor_bounds() {
        let mut composer = Composer::new();
        composer.move_left();
        composer.backspace();
        composer.delete();
        assert_eq!(composer.cursor(), 0);

        composer.insert_str("ab");
        composer.move_right();
        assert_eq!(composer.cursor(), 2);
    }

    #[test]
    fn test_newline_and_cursor_position() {
        let mut composer = Composer::new();
        composer.insert_str("first");
        composer.insert_newline();
        composer.insert_str("se");
        assert_eq!(composer.cursor_line_col(), (1, 2));
        assert_eq!(composer.current_line_prefix(), "se");
        assert_eq!(composer.line_count(), 2);
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut composer = Composer::new();
        composer.insert_str("hello");
        composer.clear();
        assert!(composer.is_empty());
        assert_eq!(composer.cursor(), 0);
    }

    #[test]
    fn test_sanitize_paste_strips_formatting() {
        let raw = "\x1b[1mbold\x1b[0m and \x1b]8;;https://example.com\x07link\x1b]8;;\x07";
        assert_eq!(sanitize_paste(raw), "bold and link");
    }

    #[test]
    fn test_sanitize_paste_normalizes_line_endings_and_controls() {
        assert_eq!(sanitize_paste("a\r\nb\rc\u{7}\td"), "a\nb\nc\td");
    }

    #[test]
    fn test_paste_inserts_at_cursor() {
        let mut composer = Composer::new();
        composer.insert_str("ad");
        composer.move_left();
        composer.paste("\x1b[31mbc\x1b[0m");
        assert_eq!(composer.text(), "abcd");
        assert_eq!(composer.cursor(), 3);
    }
}
