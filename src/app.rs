use chatbox_core::ChatWidget;
use ratatui::layout::Rect;

pub struct App {
    // Core state
    pub should_quit: bool,
    pub widget: ChatWidget,
    pub endpoint: String,

    // Panel areas for mouse hit-testing (updated during render)
    pub transcript_area: Option<Rect>,
    pub send_area: Option<Rect>,
}

impl App {
    pub fn new(widget: ChatWidget, endpoint: &str) -> Self {
        Self {
            should_quit: false,
            widget,
            endpoint: endpoint.to_string(),
            transcript_area: None,
            send_area: None,
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Send button click. A disabled button does nothing.
    pub fn click_send(&mut self) -> bool {
        if !self.widget.is_send_enabled() {
            return false;
        }
        self.widget.submit()
    }

    pub fn scroll_transcript_up(&mut self, lines: u16) {
        self.widget.transcript_mut().scroll_up(lines);
    }

    pub fn scroll_transcript_down(&mut self, lines: u16) {
        self.widget.transcript_mut().scroll_down(lines);
    }

    /// Half of the transcript pane, at least one line.
    pub fn page_size(&self) -> u16 {
        self.transcript_area
            .map(|r| (r.height.saturating_sub(2) / 2).max(1))
            .unwrap_or(5)
    }
}
