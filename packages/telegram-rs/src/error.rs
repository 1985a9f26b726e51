use thiserror::Error;

pub type Result<T> = std::result::Result<T, TelegramError>;

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram request failed: {0}")]
    Network(String),

    /// `ok: false` envelope or non-2xx status.
    #[error("Telegram API error ({code}): {description}")]
    Api { code: u16, description: String },

    #[error("Failed to parse Telegram response: {0}")]
    Parse(String),
}
