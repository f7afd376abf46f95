use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::ChatId,
    messaging::types::ReplyKeyboard,
    Result,
};

/// Outbound side of the chat transport.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()>;

    /// Send a message that also installs the persistent menu keyboard.
    async fn send_menu(&self, chat_id: ChatId, html: &str, keyboard: &ReplyKeyboard) -> Result<()>;
}

/// Fetches an inbound attachment and persists it to a local path.
#[async_trait]
pub trait MediaSource: Send + Sync {
    async fn download(&self, file_id: &str, dest: &Path) -> Result<()>;
}
