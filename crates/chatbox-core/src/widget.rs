//! The chat widget controller.
//!
//! `ChatWidget` owns the transcript, the composer and the send control, and
//! runs at most one request at a time. Work that finishes later (animation
//! ticks, request results) comes back as [`WidgetEvent`]s on the channel the
//! widget was built with; the host feeds them into [`ChatWidget::handle_event`]
//! from its event loop.

use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info, warn};

use crate::client::ChatBackend;
use crate::composer::Composer;
use crate::loading::{self, LoadingAnimation};
use crate::locale::Locale;
use crate::reply::Completion;
use crate::transcript::{ChatRole, MessageBody, MessageId, Transcript};

#[derive(Debug)]
pub enum WidgetEvent {
    LoadingTick {
        placeholder: MessageId,
        frame: usize,
    },
    Completed {
        placeholder: MessageId,
        completion: Completion,
    },
}

/// Request lifecycle. Awaiting owns the animation, so leaving the state
/// stops the timer.
#[derive(Debug)]
enum Phase {
    Idle,
    Awaiting(LoadingAnimation),
}

pub struct ChatWidget {
    backend: Arc<dyn ChatBackend>,
    events: UnboundedSender<WidgetEvent>,
    locale: Locale,
    transcript: Transcript,
    composer: Composer,
    send_enabled: bool,
    phase: Phase,
}

impl ChatWidget {
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        events: UnboundedSender<WidgetEvent>,
        locale: Locale,
    ) -> Self {
        Self {
            backend,
            events,
            locale,
            transcript: Transcript::new(),
            composer: Composer::new(),
            send_enabled: true,
            phase: Phase::Idle,
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    pub fn composer(&self) -> &Composer {
        &self.composer
    }

    pub fn composer_mut(&mut self) -> &mut Composer {
        &mut self.composer
    }

    pub fn is_send_enabled(&self) -> bool {
        self.send_enabled
    }

    pub fn is_processing(&self) -> bool {
        matches!(self.phase, Phase::Awaiting(_))
    }

    /// Placeholder of the in-flight request, if any.
    pub fn pending_placeholder(&self) -> Option<MessageId> {
        match &self.phase {
            Phase::Awaiting(animation) => Some(animation.placeholder()),
            Phase::Idle => None,
        }
    }

    /// Append a message. User text stays literal, bot text is markdown.
    pub fn add_message(&mut self, text: &str, role: ChatRole) -> MessageId {
        let body = match role {
            ChatRole::User => MessageBody::Plain(text.to_string()),
            ChatRole::Bot => MessageBody::Markdown(text.to_string()),
        };
        self.transcript.push(role, body)
    }

    pub fn paste(&mut self, raw: &str) {
        self.composer.paste(raw);
    }

    /// Send the composer contents.
    ///
    /// Does nothing while a request is in flight or when the trimmed text is
    /// empty. Returns whether a request was issued. Must run inside a tokio
    /// runtime.
    pub fn submit(&mut self) -> bool {
        if self.is_processing() {
            debug!("submit ignored: request already in flight");
            return false;
        }

        let text = self.composer.text().trim().to_string();
        if text.is_empty() {
            return false;
        }

        self.send_enabled = false;
        self.add_message(&text, ChatRole::User);
        self.composer.clear();

        let placeholder = self.transcript.push(
            ChatRole::Bot,
            MessageBody::Plain(loading::initial_text(self.locale)),
        );
        self.phase = Phase::Awaiting(LoadingAnimation::start(placeholder, self.events.clone()));

        info!(?placeholder, "submitting message");
        self.dispatch(placeholder, text);
        true
    }

    /// Spawn the request. A panic inside the backend still produces a
    /// completion, so the widget always gets back to idle.
    fn dispatch(&self, placeholder: MessageId, message: String) {
        let backend = Arc::clone(&self.backend);
        let events = self.events.clone();

        let request = tokio::spawn(async move { backend.send(&message).await });

        tokio::spawn(async move {
            let completion = match request.await {
                Ok(result) => Completion::from_result(result),
                Err(join_error) => Completion::Failed(join_error.to_string()),
            };
            if events
                .send(WidgetEvent::Completed {
                    placeholder,
                    completion,
                })
                .is_err()
            {
                debug!("widget dropped before request completed");
            }
        });
    }

    pub fn handle_event(&mut self, event: WidgetEvent) {
        match event {
            WidgetEvent::LoadingTick { placeholder, frame } => {
                self.apply_loading_tick(placeholder, frame)
            }
            WidgetEvent::Completed {
                placeholder,
                completion,
            } => self.complete(placeholder, completion),
        }
    }

    fn apply_loading_tick(&mut self, placeholder: MessageId, frame: usize) {
        // Ticks queued before cancellation arrive late; drop them.
        if self.pending_placeholder() != Some(placeholder) {
            return;
        }
        self.transcript.set_body(
            placeholder,
            MessageBody::Plain(loading::frame_text(self.locale, frame)),
        );
    }

    fn complete(&mut self, placeholder: MessageId, completion: Completion) {
        let animation = match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Awaiting(animation) if animation.placeholder() == placeholder => animation,
            other => {
                self.phase = other;
                warn!(?placeholder, "ignoring completion for a request that is not in flight");
                return;
            }
        };
        animation.cancel();

        match &completion {
            Completion::Failed(message) => error!(%message, "request failed"),
            Completion::BackendError(message) => warn!(%message, "backend reported an error"),
            Completion::UnknownFormat => warn!("unknown response format"),
            Completion::Reply(_) => info!(?placeholder, "reply received"),
        }

        let rendered = completion.render(self.locale);
        self.transcript
            .set_body(placeholder, MessageBody::Markdown(rendered));
        self.finalize();
    }

    fn finalize(&mut self) {
        self.phase = Phase::Idle;
        self.send_enabled = true;
    }
}
