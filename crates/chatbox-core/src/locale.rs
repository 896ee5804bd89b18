use serde::{Deserialize, Serialize};

/// Language of every string the widget shows on its own behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Zh,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Zh => "zh",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "en" | "english" => Some(Locale::En),
            "zh" | "zh-cn" | "chinese" => Some(Locale::Zh),
            _ => None,
        }
    }

    pub fn all() -> Vec<Locale> {
        vec![Locale::En, Locale::Zh]
    }

    /// Base text of the loading placeholder.
    pub fn loading_label(&self) -> &'static str {
        match self {
            Locale::En => "Querying",
            Locale::Zh => "正在查询中",
        }
    }

    /// Marker appended to the loading label, repeated zero to three times.
    pub fn loading_marker(&self) -> char {
        match self {
            Locale::En => '.',
            Locale::Zh => '。',
        }
    }

    pub fn backend_error_label(&self) -> &'static str {
        match self {
            Locale::En => "Backend error",
            Locale::Zh => "后端错误",
        }
    }

    pub fn request_failed_label(&self) -> &'static str {
        match self {
            Locale::En => "Request failed",
            Locale::Zh => "请求失败",
        }
    }

    pub fn unknown_format(&self) -> &'static str {
        match self {
            Locale::En => "Unknown response format",
            Locale::Zh => "未知响应格式",
        }
    }

    pub fn user_label(&self) -> &'static str {
        match self {
            Locale::En => "You",
            Locale::Zh => "你",
        }
    }

    pub fn bot_label(&self) -> &'static str {
        match self {
            Locale::En => "Bot",
            Locale::Zh => "助手",
        }
    }

    pub fn send_label(&self) -> &'static str {
        match self {
            Locale::En => "Send",
            Locale::Zh => "发送",
        }
    }

    pub fn empty_transcript_hint(&self) -> &'static str {
        match self {
            Locale::En => "Type a message and press Enter to send it.",
            Locale::Zh => "输入消息后按 Enter 发送。",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_round_trips_as_str() {
        for locale in Locale::all() {
            assert_eq!(Locale::from_str(locale.as_str()), Some(locale));
        }
        assert_eq!(Locale::from_str("ZH"), Some(Locale::Zh));
        assert_eq!(Locale::from_str("fr"), None);
    }

    #[test]
    fn test_serde_uses_lowercase_codes() {
        assert_eq!(serde_json::to_string(&Locale::Zh).unwrap(), "\"zh\"");
        let parsed: Locale = serde_json::from_str("\"en\"").unwrap();
        assert_eq!(parsed, Locale::En);
    }
}
