use std::{
    path::Path,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use crate::{
    account::client::AccountClient,
    domain::{AccountProfile, DirectMessageRequest},
    errors::Error,
    Result,
};

/// Process-wide authenticated handle to the remote account.
///
/// Every action calls `ensure_login()` first. A failed login fails only the
/// current action; the flag stays false so the next action tries again.
pub struct RemoteAccount {
    client: Arc<dyn AccountClient>,
    authenticated: AtomicBool,
}

impl RemoteAccount {
    pub fn new(client: Arc<dyn AccountClient>) -> Self {
        Self {
            client,
            authenticated: AtomicBool::new(false),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Single login attempt. Also used by the explicit reconnect action.
    pub async fn login(&self) -> Result<()> {
        match self.client.login().await {
            Ok(()) => {
                self.authenticated.store(true, Ordering::SeqCst);
                tracing::info!("instagram login succeeded");
                Ok(())
            }
            Err(e) => {
                self.authenticated.store(false, Ordering::SeqCst);
                tracing::error!(error = %e, "instagram login failed");
                Err(match e {
                    Error::Auth(_) => e,
                    other => Error::Auth(other.to_string()),
                })
            }
        }
    }

    async fn ensure_login(&self) -> Result<()> {
        if self.is_authenticated() {
            return Ok(());
        }
        self.login().await
    }

    pub async fn profile(&self) -> Result<AccountProfile> {
        self.ensure_login().await?;
        self.client
            .account_info()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "fetching profile failed"))
    }

    pub async fn followers(&self, limit: usize) -> Result<Vec<String>> {
        self.ensure_login().await?;
        let mut followers = self
            .client
            .list_followers(limit)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "fetching followers failed"))?;
        followers.truncate(limit);
        Ok(followers)
    }

    pub async fn upload(&self, path: &Path, caption: &str) -> Result<()> {
        self.ensure_login().await?;
        self.client
            .upload_photo(path, caption)
            .await
            .inspect_err(|e| tracing::error!(error = %e, path = %path.display(), "photo upload failed"))
    }

    pub async fn send_dm(&self, req: &DirectMessageRequest) -> Result<()> {
        self.ensure_login().await?;
        let result = async {
            let id = self.client.user_id_from_username(&req.recipient).await?;
            self.client.send_direct_message(&id, &req.body).await
        }
        .await;
        result.inspect_err(|e| tracing::error!(error = %e, recipient = %req.recipient, "direct message failed"))
    }
}
