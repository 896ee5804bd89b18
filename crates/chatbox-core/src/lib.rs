pub mod client;
pub mod composer;
pub mod config;
pub mod error;
pub mod loading;
pub mod locale;
pub mod protocol;
pub mod reply;
pub mod transcript;
pub mod widget;

// Re-export main types for convenience
pub use client::{ChatBackend, HttpBackend};
pub use composer::{sanitize_paste, Composer};
pub use config::{Config, DEFAULT_ENDPOINT};
pub use error::{ClientError, ConfigError};
pub use locale::Locale;
pub use protocol::{ChatRequest, ChatResponse};
pub use reply::{strip_reasoning, Completion};
pub use transcript::{Alignment, ChatMessage, ChatRole, MessageBody, MessageId, Transcript};
pub use widget::{ChatWidget, WidgetEvent};
