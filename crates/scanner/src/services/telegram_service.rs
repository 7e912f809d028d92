use std::env;

use async_trait::async_trait;
use common::{NotifyError, Notifier};
use teloxide::prelude::*;
use tracing::debug;

pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self {
            bot: Bot::new(token),
            chat_id: ChatId(chat_id),
        }
    }

    pub fn from_env() -> Result<Self, NotifyError> {
        let token = env::var("TELEGRAM_BOT_TOKEN")
            .map_err(|_| NotifyError::Config("TELEGRAM_BOT_TOKEN not set".to_string()))?;
        let chat_id_str = env::var("TELEGRAM_CHAT_ID")
            .map_err(|_| NotifyError::Config("TELEGRAM_CHAT_ID not set".to_string()))?;
        let chat_id = chat_id_str
            .trim()
            .parse::<i64>()
            .map_err(|_| NotifyError::Config("TELEGRAM_CHAT_ID must be a number".to_string()))?;

        Ok(Self::new(token, chat_id))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, text: &str) -> Result<(), NotifyError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map_err(|e| NotifyError::Delivery(Box::new(e)))?;

        debug!(chat_id = self.chat_id.0, "Telegram message delivered");
        Ok(())
    }
}
