//! Maps one incoming update plus the sender's flow state to exactly one action.
//!
//! Dispatch is pure: it never mutates the session store or talks to a port.
//! The relay executes the returned [`Action`].

use std::sync::OnceLock;

use regex::Regex;

use crate::{
    domain::DirectMessageRequest,
    errors::Error,
    messaging::types::{IncomingUpdate, ReplyKeyboard},
    session::FlowState,
    Result,
};

/// Persistent menu buttons. The label text is what the transport sends back.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuItem {
    Profile,
    Followers,
    UploadPost,
    DirectMessage,
    Reconnect,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::Profile,
        MenuItem::Followers,
        MenuItem::UploadPost,
        MenuItem::DirectMessage,
        MenuItem::Reconnect,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MenuItem::Profile => "📊 Profil ma'lumotlari",
            MenuItem::Followers => "👥 Followerlar",
            MenuItem::UploadPost => "📤 Post yuklash",
            MenuItem::DirectMessage => "📩 DM yuborish",
            MenuItem::Reconnect => "🔄 Instagramga ulanish",
        }
    }

    pub fn from_label(text: &str) -> Option<Self> {
        let text = text.trim();
        Self::ALL.into_iter().find(|item| item.label() == text)
    }
}

pub fn menu_keyboard() -> ReplyKeyboard {
    let row = |items: &[MenuItem]| items.iter().map(|i| i.label().to_string()).collect();
    ReplyKeyboard::new(vec![
        row(&[MenuItem::Profile, MenuItem::Followers]),
        row(&[MenuItem::UploadPost, MenuItem::DirectMessage]),
        row(&[MenuItem::Reconnect]),
    ])
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    ShowMenu,
    Cancel,
    Profile,
    Followers,
    StartUpload,
    DmInstructions,
    Reconnect,
    /// Persist the attachment and move on to the caption step.
    AcceptPhoto { file_id: String, message_id: i32 },
    /// Photo outside the upload flow.
    IgnorePhoto,
    PublishPost { caption: String },
    /// Text arrived while a photo is expected.
    ExpectPhoto,
    /// A command other than `/cancel` arrived while a caption is expected.
    ExpectCaption,
    SendDirectMessage(DirectMessageRequest),
    DirectMessageFormat(String),
    UnknownCommand(String),
    /// Unrecognized text with no flow active.
    Ignore,
}

pub fn dispatch(update: &IncomingUpdate, state: &FlowState) -> Action {
    match update {
        IncomingUpdate::Command(cmd) => dispatch_command(&cmd.name, &cmd.args, state),
        IncomingUpdate::Photo(photo) => {
            if state.awaiting_photo() {
                Action::AcceptPhoto {
                    file_id: photo.file_id.clone(),
                    message_id: photo.message_id,
                }
            } else {
                Action::IgnorePhoto
            }
        }
        IncomingUpdate::Text(msg) => dispatch_text(&msg.text, state),
    }
}

fn dispatch_command(name: &str, args: &str, state: &FlowState) -> Action {
    match name {
        "start" | "help" => Action::ShowMenu,
        "cancel" => Action::Cancel,
        // Direct messages only go out when no upload flow is in progress.
        "dm" if state.awaiting_photo() => Action::ExpectPhoto,
        "dm" if state.awaiting_caption() => Action::ExpectCaption,
        "dm" if args.trim().is_empty() => Action::DmInstructions,
        "dm" => direct_message_action(args),
        other => Action::UnknownCommand(other.to_string()),
    }
}

fn dispatch_text(text: &str, state: &FlowState) -> Action {
    match state {
        FlowState::AwaitingCaption { .. } => Action::PublishPost {
            caption: text.trim().to_string(),
        },
        FlowState::AwaitingPhoto => Action::ExpectPhoto,
        FlowState::Idle => {
            // Menu labels win over the `user:message` pattern.
            if let Some(item) = MenuItem::from_label(text) {
                return match item {
                    MenuItem::Profile => Action::Profile,
                    MenuItem::Followers => Action::Followers,
                    MenuItem::UploadPost => Action::StartUpload,
                    MenuItem::DirectMessage => Action::DmInstructions,
                    MenuItem::Reconnect => Action::Reconnect,
                };
            }
            if text.contains(':') {
                return direct_message_action(text);
            }
            Action::Ignore
        }
    }
}

fn direct_message_action(text: &str) -> Action {
    match parse_direct_message(text) {
        Ok(req) => Action::SendDirectMessage(req),
        Err(e) => Action::DirectMessageFormat(e.to_string()),
    }
}

fn username_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9._]{1,30}$").expect("valid username regex"))
}

/// Parse `username:message`. Splits at the first `:`; both halves are trimmed
/// and a leading `@` on the username is dropped.
pub fn parse_direct_message(text: &str) -> Result<DirectMessageRequest> {
    let Some((user, body)) = text.split_once(':') else {
        return Err(Error::DirectMessageFormat("missing ':' delimiter".to_string()));
    };

    let recipient = user.trim().trim_start_matches('@');
    let body = body.trim();

    if recipient.is_empty() {
        return Err(Error::DirectMessageFormat("empty username".to_string()));
    }
    if !username_re().is_match(recipient) {
        return Err(Error::DirectMessageFormat(format!("invalid username {recipient:?}")));
    }
    if body.is_empty() {
        return Err(Error::DirectMessageFormat("empty message".to_string()));
    }

    Ok(DirectMessageRequest {
        recipient: recipient.to_string(),
        body: body.to_string(),
    })
}
