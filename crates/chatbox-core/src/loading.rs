//! The cosmetic "Querying..." animation shown in the placeholder message.

use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};
use tracing::debug;

use crate::locale::Locale;
use crate::transcript::MessageId;
use crate::widget::WidgetEvent;

pub const LOADING_INTERVAL: Duration = Duration::from_millis(500);

/// Marker counts for each frame; the animation loops over all six.
const FRAMES: [usize; 6] = [1, 2, 3, 2, 1, 0];

/// Text shown before the first tick.
pub fn initial_text(locale: Locale) -> String {
    format!("{} ", locale.loading_label())
}

pub fn frame_text(locale: Locale, frame: usize) -> String {
    let markers = FRAMES[frame % FRAMES.len()];
    let mut text = locale.loading_label().to_string();
    text.extend(std::iter::repeat(locale.loading_marker()).take(markers));
    text
}

/// A running animation bound to one placeholder.
///
/// Ticks are delivered as [`WidgetEvent::LoadingTick`]. Dropping the value
/// aborts the timer task, so the animation cannot outlive the request it
/// belongs to.
#[derive(Debug)]
pub struct LoadingAnimation {
    placeholder: MessageId,
    handle: JoinHandle<()>,
}

impl LoadingAnimation {
    pub fn start(placeholder: MessageId, events: UnboundedSender<WidgetEvent>) -> Self {
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + LOADING_INTERVAL, LOADING_INTERVAL);
            let mut frame = 0;
            loop {
                interval.tick().await;
                if events
                    .send(WidgetEvent::LoadingTick { placeholder, frame })
                    .is_err()
                {
                    break;
                }
                frame = (frame + 1) % FRAMES.len();
            }
        });
        debug!(?placeholder, "loading animation started");

        Self {
            placeholder,
            handle,
        }
    }

    pub fn placeholder(&self) -> MessageId {
        self.placeholder
    }

    pub fn cancel(self) {
        // Drop does the work.
    }
}

impl Drop for LoadingAnimation {
    fn drop(&mut self) {
        self.handle.abort();
        debug!(placeholder = ?self.placeholder, "loading animation cancelled");
    }
}
