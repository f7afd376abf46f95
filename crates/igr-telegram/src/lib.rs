//! Telegram adapter (teloxide).
//!
//! This crate implements the `igr-core` MessagingPort and MediaSource over the
//! Telegram Bot API.

use std::path::Path;

use async_trait::async_trait;

use teloxide::{
    net::Download,
    prelude::*,
    types::{KeyboardButton, KeyboardMarkup, ParseMode},
};

pub mod handlers;
pub mod router;

use igr_core::{
    domain::ChatId,
    errors::Error,
    messaging::{
        port::{MediaSource, MessagingPort},
        types::ReplyKeyboard,
    },
    Result,
};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    fn markup(keyboard: &ReplyKeyboard) -> KeyboardMarkup {
        let rows: Vec<Vec<KeyboardButton>> = keyboard
            .rows
            .iter()
            .map(|row| row.iter().map(KeyboardButton::new).collect())
            .collect();
        KeyboardMarkup::new(rows).resize_keyboard()
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }

    async fn send_menu(&self, chat_id: ChatId, html: &str, keyboard: &ReplyKeyboard) -> Result<()> {
        self.bot
            .send_message(Self::tg_chat(chat_id), html.to_string())
            .parse_mode(ParseMode::Html)
            .reply_markup(Self::markup(keyboard))
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

#[async_trait]
impl MediaSource for TelegramMessenger {
    async fn download(&self, file_id: &str, dest: &Path) -> Result<()> {
        let file = self
            .bot
            .get_file(teloxide::types::FileId(file_id.to_string()))
            .await
            .map_err(Self::map_err)?;

        let mut dst = tokio::fs::File::create(dest).await?;
        self.bot
            .download_file(&file.path, &mut dst)
            .await
            .map_err(|e| Error::External(format!("telegram download error: {e}")))?;
        Ok(())
    }
}
