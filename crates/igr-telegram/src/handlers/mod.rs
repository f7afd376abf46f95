//! Telegram update handlers.
//!
//! Each Telegram message is converted into a core `IncomingUpdate` and handed
//! to the relay; everything after that is transport-agnostic.

use std::sync::Arc;

use teloxide::{prelude::*, types::Message};

use igr_core::{
    domain::{ChatId, UserId},
    messaging::types::{Command, IncomingUpdate, PhotoMessage, TextMessage},
    relay::Relay,
};

mod commands;

pub use commands::parse_command;

pub async fn handle_message(msg: Message, relay: Arc<Relay>) -> ResponseResult<()> {
    let Some(update) = to_incoming(&msg) else {
        tracing::debug!(chat_id = msg.chat.id.0, "skipping unsupported message");
        return Ok(());
    };
    relay.handle(update).await;
    Ok(())
}

fn to_incoming(msg: &Message) -> Option<IncomingUpdate> {
    let chat_id = ChatId(msg.chat.id.0);
    let user_id = msg.from.as_ref().map(|u| UserId(u.id.0 as i64));
    let username = msg.from.as_ref().and_then(|u| u.username.clone());

    // Largest size is last.
    if let Some(best) = msg.photo().and_then(|sizes| sizes.last()) {
        return Some(IncomingUpdate::Photo(PhotoMessage {
            chat_id,
            user_id,
            username,
            message_id: msg.id.0,
            file_id: best.file.id.0.clone(),
        }));
    }

    let text = msg.text()?;
    if text.starts_with('/') {
        let (name, args) = parse_command(text);
        return Some(IncomingUpdate::Command(Command {
            chat_id,
            user_id,
            username,
            name,
            args,
        }));
    }

    Some(IncomingUpdate::Text(TextMessage {
        chat_id,
        user_id,
        username,
        text: text.to_string(),
    }))
}
