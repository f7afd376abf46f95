use std::sync::Arc;

use crate::{
    account::{AccountClient, RemoteAccount},
    config::Config,
    dispatcher::{dispatch, menu_keyboard, Action},
    domain::{ChatId, DirectMessageRequest, UserId},
    formatting as fmt,
    media::{temp_photo_path, TempPhoto},
    messaging::{
        port::{MediaSource, MessagingPort},
        types::IncomingUpdate,
    },
    security::is_authorized,
    session::{FlowState, SessionStore},
};

/// Application service: one incoming update in, zero or more replies out.
///
/// Every failure is turned into a reply here; nothing propagates to the
/// transport loop.
pub struct Relay {
    cfg: Arc<Config>,
    account: RemoteAccount,
    sessions: SessionStore,
    messenger: Arc<dyn MessagingPort>,
    media: Arc<dyn MediaSource>,
}

impl Relay {
    pub fn new(
        cfg: Arc<Config>,
        client: Arc<dyn AccountClient>,
        messenger: Arc<dyn MessagingPort>,
        media: Arc<dyn MediaSource>,
    ) -> Self {
        Self {
            cfg,
            account: RemoteAccount::new(client),
            sessions: SessionStore::new(),
            messenger,
            media,
        }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn account(&self) -> &RemoteAccount {
        &self.account
    }

    /// Initial login at process start. Failure is non-fatal; actions retry.
    pub async fn startup_login(&self) {
        if self.account.login().await.is_err() {
            tracing::warn!("startup login failed, will retry on the next action");
        }
    }

    pub async fn handle(&self, update: IncomingUpdate) {
        let chat = update.chat_id();

        if !is_authorized(update.user_id(), self.cfg.operator_id) {
            tracing::warn!(
                user_id = ?update.user_id().map(|u| u.0),
                username = update.username().unwrap_or("unknown"),
                "unauthorized update"
            );
            self.reply(chat, fmt::UNAUTHORIZED).await;
            return;
        }
        let Some(user) = update.user_id() else {
            return;
        };

        let state = self.sessions.get(user).await;
        let action = dispatch(&update, &state);
        tracing::debug!(user_id = user.0, ?action, "dispatching");

        match action {
            Action::ShowMenu => {
                if let Err(e) = self.messenger.send_menu(chat, fmt::WELCOME, &menu_keyboard()).await {
                    tracing::warn!(error = %e, "failed to send menu");
                }
            }
            Action::Cancel => {
                release_pending(self.sessions.clear(user).await);
                self.reply(chat, fmt::CANCELLED).await;
            }
            Action::Profile => self.show_profile(chat).await,
            Action::Followers => self.show_followers(chat).await,
            Action::StartUpload => {
                release_pending(self.sessions.set(user, FlowState::AwaitingPhoto).await);
                self.reply(chat, fmt::UPLOAD_INSTRUCTIONS).await;
            }
            Action::DmInstructions => self.reply(chat, fmt::DM_INSTRUCTIONS).await,
            Action::Reconnect => self.reconnect(chat).await,
            Action::AcceptPhoto { file_id, message_id } => {
                self.accept_photo(chat, user, &file_id, message_id).await
            }
            Action::PublishPost { caption } => self.publish_post(chat, user, &caption).await,
            Action::ExpectPhoto => self.reply(chat, fmt::EXPECT_PHOTO).await,
            Action::ExpectCaption => self.reply(chat, fmt::EXPECT_CAPTION).await,
            Action::SendDirectMessage(req) => self.send_direct_message(chat, &req).await,
            Action::DirectMessageFormat(reason) => {
                self.reply(chat, &fmt::dm_format_error(&reason)).await
            }
            Action::UnknownCommand(_) => self.reply(chat, fmt::UNKNOWN_COMMAND).await,
            Action::IgnorePhoto | Action::Ignore => self.reply(chat, fmt::HINT).await,
        }
    }

    async fn show_profile(&self, chat: ChatId) {
        self.reply(chat, fmt::PROFILE_LOADING).await;
        let html = match self.account.profile().await {
            Ok(p) => fmt::format_profile(&p, self.cfg.bio_preview_len),
            Err(_) => fmt::PROFILE_FAILED.to_string(),
        };
        self.reply(chat, &html).await;
    }

    async fn show_followers(&self, chat: ChatId) {
        self.reply(chat, fmt::FOLLOWERS_LOADING).await;
        let html = match self.account.followers(self.cfg.followers_fetch_limit).await {
            Ok(list) => fmt::format_followers(&list, self.cfg.followers_display_limit),
            Err(_) => fmt::FOLLOWERS_FAILED.to_string(),
        };
        self.reply(chat, &html).await;
    }

    async fn reconnect(&self, chat: ChatId) {
        self.reply(chat, fmt::CONNECTING).await;
        let html = match self.account.login().await {
            Ok(()) => fmt::CONNECT_OK,
            Err(_) => fmt::CONNECT_FAILED,
        };
        self.reply(chat, html).await;
    }

    async fn accept_photo(&self, chat: ChatId, user: UserId, file_id: &str, message_id: i32) {
        let guard = TempPhoto::new(temp_photo_path(&self.cfg.temp_dir, user, message_id));

        if let Err(e) = self.media.download(file_id, guard.path()).await {
            tracing::error!(error = %e, user_id = user.0, "photo download failed");
            self.reply(chat, fmt::PHOTO_DOWNLOAD_FAILED).await;
            return;
        }

        // The flow may have been cancelled while the download was in flight.
        if !self.sessions.get(user).await.awaiting_photo() {
            return;
        }

        let photo = guard.keep();
        tracing::info!(user_id = user.0, path = %photo.display(), "photo stored, awaiting caption");
        release_pending(self.sessions.set(user, FlowState::AwaitingCaption { photo }).await);
        self.reply(chat, fmt::PHOTO_RECEIVED).await;
    }

    async fn publish_post(&self, chat: ChatId, user: UserId, caption: &str) {
        // Session is emptied before the upload so it ends up cleared whatever the outcome.
        let FlowState::AwaitingCaption { photo } = self.sessions.clear(user).await else {
            self.reply(chat, fmt::PHOTO_NOT_FOUND).await;
            return;
        };
        let photo = TempPhoto::new(photo);

        if let Err(e) = photo.ensure_exists() {
            tracing::warn!(error = %e, "pending photo disappeared before upload");
            self.reply(chat, fmt::PHOTO_NOT_FOUND).await;
            return;
        }

        self.reply(chat, fmt::UPLOADING).await;
        let html = match self.account.upload(photo.path(), caption).await {
            Ok(()) => {
                tracing::info!(user_id = user.0, "post uploaded");
                fmt::UPLOAD_OK
            }
            Err(_) => fmt::UPLOAD_FAILED,
        };
        drop(photo);
        self.reply(chat, html).await;
    }

    async fn send_direct_message(&self, chat: ChatId, req: &DirectMessageRequest) {
        self.reply(chat, &fmt::dm_sending(&req.recipient)).await;
        let html = match self.account.send_dm(req).await {
            Ok(()) => fmt::dm_sent(&req.recipient),
            Err(_) => fmt::dm_failed(&req.recipient),
        };
        self.reply(chat, &html).await;
    }

    async fn reply(&self, chat: ChatId, html: &str) {
        if let Err(e) = self.messenger.send_html(chat, html).await {
            tracing::warn!(chat_id = chat.0, error = %e, "failed to send reply");
        }
    }
}

/// Delete the temp file a discarded `AwaitingCaption` state still points at.
fn release_pending(prev: FlowState) {
    if let FlowState::AwaitingCaption { photo } = prev {
        tracing::info!(path = %photo.display(), "discarding pending photo");
        drop(TempPhoto::new(photo));
    }
}
