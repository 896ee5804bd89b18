//! UI-agnostic transcript state
//!
//! The transcript is the running list of messages plus its scroll position.
//! Hosts render it however they like; the widget only appends messages and
//! rewrites the body of the loading placeholder.

/// Handle to a message, returned when it is appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(usize);

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

/// Which side of the transcript a message hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Start,
    End,
}

impl ChatRole {
    pub fn alignment(self) -> Alignment {
        match self {
            ChatRole::User => Alignment::End,
            ChatRole::Bot => Alignment::Start,
        }
    }
}

/// How the host must treat the text of a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageBody {
    /// Shown literally; never interpreted as markup.
    Plain(String),
    /// Markdown source, rendered as rich text.
    Markdown(String),
}

impl MessageBody {
    pub fn text(&self) -> &str {
        match self {
            MessageBody::Plain(text) | MessageBody::Markdown(text) => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub role: ChatRole,
    pub body: MessageBody,
}

impl ChatMessage {
    pub fn alignment(&self) -> Alignment {
        self.role.alignment()
    }
}

#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
    scroll: u16,
    max_scroll: u16,
    pinned: bool,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            pinned: true,
            ..Self::default()
        }
    }

    /// Append a message and pin the view to the bottom.
    pub fn push(&mut self, role: ChatRole, body: MessageBody) -> MessageId {
        let id = MessageId(self.messages.len());
        self.messages.push(ChatMessage { id, role, body });
        self.scroll_to_bottom();
        id
    }

    pub fn get(&self, id: MessageId) -> Option<&ChatMessage> {
        self.messages.get(id.0)
    }

    /// Replace a message body in place. Returns false for an unknown id.
    pub fn set_body(&mut self, id: MessageId, body: MessageBody) -> bool {
        match self.messages.get_mut(id.0) {
            Some(message) => {
                message.body = body;
                true
            }
            None => false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    // Scrolling

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }

    pub fn scroll_to_bottom(&mut self) {
        self.pinned = true;
        self.scroll = self.max_scroll;
    }

    pub fn scroll_up(&mut self, lines: u16) {
        self.pinned = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = self.scroll.saturating_add(lines).min(self.max_scroll);
        if self.scroll >= self.max_scroll {
            self.pinned = true;
        }
    }

    /// Called by the renderer once it knows how far the content can scroll.
    /// Returns the offset to draw with.
    pub fn resolve_scroll(&mut self, max_scroll: u16) -> u16 {
        self.max_scroll = max_scroll;
        if self.pinned {
            self.scroll = max_scroll;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
        self.scroll
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_returns_sequential_handles() {
        let mut transcript = Transcript::new();
        let a = transcript.push(ChatRole::User, MessageBody::Plain("hi".into()));
        let b = transcript.push(ChatRole::Bot, MessageBody::Markdown("**yo**".into()));

        assert_ne!(a, b);
        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.get(a).unwrap().role, ChatRole::User);
        assert_eq!(transcript.get(b).unwrap().body.text(), "**yo**");
    }

    #[test]
    fn test_alignment_follows_role() {
        assert_eq!(ChatRole::User.alignment(), Alignment::End);
        assert_eq!(ChatRole::Bot.alignment(), Alignment::Start);
    }

    #[test]
    fn test_set_body_mutates_in_place() {
        let mut transcript = Transcript::new();
        transcript.push(ChatRole::User, MessageBody::Plain("q".into()));
        let id = transcript.push(ChatRole::Bot, MessageBody::Plain("Querying".into()));

        assert!(transcript.set_body(id, MessageBody::Markdown("answer".into())));
        assert_eq!(transcript.len(), 2);
        assert_eq!(
            transcript.get(id).unwrap().body,
            MessageBody::Markdown("answer".into())
        );
    }

    #[test]
    fn test_set_body_unknown_id() {
        let mut other = Transcript::new();
        let id = other.push(ChatRole::User, MessageBody::Plain("x".into()));

        let mut empty = Transcript::new();
        assert!(!empty.set_body(id, MessageBody::Plain("y".into())));
    }

    #[test]
    fn test_scroll_unpins_and_push_repins() {
        let mut transcript = Transcript::new();
        assert_eq!(transcript.resolve_scroll(10), 10);

        transcript.scroll_up(4);
        assert!(!transcript.is_pinned());
        assert_eq!(transcript.resolve_scroll(12), 6);

        transcript.push(ChatRole::User, MessageBody::Plain("new".into()));
        assert!(transcript.is_pinned());
        assert_eq!(transcript.resolve_scroll(15), 15);
    }

    #[test]
    fn test_scroll_down_to_end_repins() {
        let mut transcript = Transcript::new();
        transcript.resolve_scroll(8);
        transcript.scroll_up(5);
        transcript.scroll_down(2);
        assert!(!transcript.is_pinned());
        transcript.scroll_down(10);
        assert!(transcript.is_pinned());
        assert_eq!(transcript.resolve_scroll(8), 8);
    }
}
