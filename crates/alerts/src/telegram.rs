//! Telegram transport.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{LinkPreviewOptions, ParseMode, Recipient};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("Telegram API error: {0}")]
    Api(#[from] teloxide::RequestError),
    #[error("Invalid chat id: {0:?}")]
    InvalidChatId(String),
}

/// Delivers a single text message to a destination.
#[async_trait]
pub trait AlertTransport: Send + Sync {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), TelegramError>;
}

/// Parse a destination string into a Telegram recipient.
///
/// Numeric ids (negative for groups) are chat ids; `@name` is a channel.
pub fn parse_recipient(chat_id: &str) -> Result<Recipient, TelegramError> {
    let chat_id = chat_id.trim();
    if chat_id.len() > 1 && chat_id.starts_with('@') {
        return Ok(Recipient::ChannelUsername(chat_id.to_string()));
    }
    chat_id
        .parse::<i64>()
        .map(|id| Recipient::Id(ChatId(id)))
        .map_err(|_| TelegramError::InvalidChatId(chat_id.to_string()))
}

/// Telegram bot wrapper.
#[derive(Clone)]
pub struct TelegramBot {
    bot: Bot,
}

impl TelegramBot {
    /// Create a new bot with the given token.
    pub fn new(token: &str) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    /// Get the underlying bot for command handling.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl AlertTransport for TelegramBot {
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), TelegramError> {
        let recipient = parse_recipient(chat_id)?;
        self.bot
            .send_message(recipient, text)
            .parse_mode(ParseMode::Html)
            .link_preview_options(LinkPreviewOptions {
                is_disabled: true,
                url: None,
                prefer_small_media: false,
                prefer_large_media: false,
                show_above_text: false,
            })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_recipient() {
        assert_eq!(parse_recipient("12345").unwrap(), Recipient::Id(ChatId(12345)));
        assert_eq!(
            parse_recipient(" -1001234567890 ").unwrap(),
            Recipient::Id(ChatId(-1001234567890))
        );
        assert_eq!(
            parse_recipient("@lowcap_radar").unwrap(),
            Recipient::ChannelUsername("@lowcap_radar".to_string())
        );
    }

    #[test]
    fn test_parse_recipient_rejects_garbage() {
        assert!(matches!(parse_recipient("abc"), Err(TelegramError::InvalidChatId(_))));
        assert!(matches!(parse_recipient("@"), Err(TelegramError::InvalidChatId(_))));
        assert!(matches!(parse_recipient(""), Err(TelegramError::InvalidChatId(_))));
    }
}
