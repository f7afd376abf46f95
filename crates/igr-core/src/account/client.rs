use std::path::Path;

use async_trait::async_trait;

use crate::{
    domain::{AccountProfile, InstagramUserId},
    Result,
};

/// Social account client interface used by the relay.
///
/// Implementations own the remote session (cookies, tokens). Failures are
/// opaque at this boundary: callers only distinguish success from `Err`.
#[async_trait]
pub trait AccountClient: Send + Sync {
    async fn login(&self) -> Result<()>;

    async fn account_info(&self) -> Result<AccountProfile>;

    /// Usernames of the account's followers, at most `limit` of them.
    async fn list_followers(&self, limit: usize) -> Result<Vec<String>>;

    async fn upload_photo(&self, path: &Path, caption: &str) -> Result<()>;

    async fn user_id_from_username(&self, username: &str) -> Result<InstagramUserId>;

    async fn send_direct_message(&self, recipient: &InstagramUserId, text: &str) -> Result<()>;
}
