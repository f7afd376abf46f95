use crate::domain::{ChatId, UserId};

/// Cross-messenger incoming update model.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
    Photo(PhotoMessage),
}

impl IncomingUpdate {
    pub fn chat_id(&self) -> ChatId {
        match self {
            Self::Command(c) => c.chat_id,
            Self::Text(t) => t.chat_id,
            Self::Photo(p) => p.chat_id,
        }
    }

    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Command(c) => c.user_id,
            Self::Text(t) => t.user_id,
            Self::Photo(p) => p.user_id,
        }
    }

    pub fn username(&self) -> Option<&str> {
        match self {
            Self::Command(c) => c.username.as_deref(),
            Self::Text(t) => t.username.as_deref(),
            Self::Photo(p) => p.username.as_deref(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Command {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub name: String,
    pub args: String,
}

#[derive(Clone, Debug)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug)]
pub struct PhotoMessage {
    pub chat_id: ChatId,
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    /// Transport message id, used to name the temp file.
    pub message_id: i32,
    /// Largest available size.
    pub file_id: String,
}

/// Persistent reply keyboard (rows of plain-text buttons).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReplyKeyboard {
    pub rows: Vec<Vec<String>>,
}

impl ReplyKeyboard {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }
}
