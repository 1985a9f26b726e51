//! Incoming text classification.

/// Prefix of inline-button callback data that names a catalog style.
pub const STYLE_CALLBACK_PREFIX: &str = "style:";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Styles,
    /// A slash command the bot doesn't know
    Unknown(String),
    /// Free-text style description
    Query(String),
}

impl Command {
    /// Classify message text. Blank text yields `None`.
    ///
    /// Commands may carry a `@botname` suffix (`/help@outfit_bot`), as sent
    /// in group chats.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }

        let Some(rest) = text.strip_prefix('/') else {
            return Some(Command::Query(text.to_string()));
        };

        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();

        Some(match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "styles" => Command::Styles,
            _ => Command::Unknown(name),
        })
    }
}

/// Callback data for a style button.
pub fn style_callback_data(style: &str) -> String {
    format!("{}{}", STYLE_CALLBACK_PREFIX, style)
}

/// Style key carried by a button press, if the data is one of ours.
pub fn style_from_callback(data: &str) -> Option<&str> {
    data.strip_prefix(STYLE_CALLBACK_PREFIX)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
