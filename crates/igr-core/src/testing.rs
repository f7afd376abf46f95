//! In-memory port implementations shared by the unit tests.

use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;

use crate::{
    account::AccountClient,
    domain::{AccountProfile, ChatId, InstagramUserId},
    errors::Error,
    messaging::{
        port::{MediaSource, MessagingPort},
        types::ReplyKeyboard,
    },
    Result,
};

pub fn tmp_dir(prefix: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("igr-test-{}-{prefix}-{n}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

static COUNTER: AtomicUsize = AtomicUsize::new(0);

#[derive(Default)]
pub struct FakeAccount {
    pub fail_login: AtomicBool,
    pub fail_remote: AtomicBool,
    pub login_calls: AtomicUsize,
    pub info_calls: AtomicUsize,
    pub follower_count: usize,
    pub biography: String,
    /// (path, caption, file existed at upload time)
    pub uploads: Mutex<Vec<(PathBuf, String, bool)>>,
    pub sent_dms: Mutex<Vec<(String, String)>>,
}

impl FakeAccount {
    pub fn with_followers(n: usize) -> Self {
        Self {
            follower_count: n,
            ..Self::default()
        }
    }

    fn check_remote(&self) -> Result<()> {
        if self.fail_remote.load(Ordering::SeqCst) {
            return Err(Error::Remote("scripted failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl AccountClient for FakeAccount {
    async fn login(&self) -> Result<()> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_login.load(Ordering::SeqCst) {
            return Err(Error::Auth("bad password".to_string()));
        }
        Ok(())
    }

    async fn account_info(&self) -> Result<AccountProfile> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        self.check_remote()?;
        Ok(AccountProfile {
            username: "shop".to_string(),
            full_name: "Shop & Co".to_string(),
            follower_count: 12_345,
            following_count: 67,
            post_count: 8,
            biography: self.biography.clone(),
        })
    }

    async fn list_followers(&self, limit: usize) -> Result<Vec<String>> {
        self.check_remote()?;
        Ok((0..self.follower_count.min(limit))
            .map(|i| format!("follower_{i}"))
            .collect())
    }

    async fn upload_photo(&self, path: &Path, caption: &str) -> Result<()> {
        let existed = path.exists();
        self.uploads
            .lock()
            .unwrap()
            .push((path.to_path_buf(), caption.to_string(), existed));
        self.check_remote()
    }

    async fn user_id_from_username(&self, username: &str) -> Result<InstagramUserId> {
        self.check_remote()?;
        Ok(InstagramUserId(format!("id:{username}")))
    }

    async fn send_direct_message(&self, recipient: &InstagramUserId, text: &str) -> Result<()> {
        self.check_remote()?;
        self.sent_dms
            .lock()
            .unwrap()
            .push((recipient.0.clone(), text.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeMessenger {
    pub sent: Mutex<Vec<(ChatId, String)>>,
    pub menus: AtomicUsize,
}

impl FakeMessenger {
    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, t)| t.clone()).collect()
    }

    pub fn last(&self) -> String {
        self.texts().last().cloned().unwrap_or_default()
    }
}

#[async_trait]
impl MessagingPort for FakeMessenger {
    async fn send_html(&self, chat_id: ChatId, html: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, html.to_string()));
        Ok(())
    }

    async fn send_menu(&self, chat_id: ChatId, html: &str, _keyboard: &ReplyKeyboard) -> Result<()> {
        self.menus.fetch_add(1, Ordering::SeqCst);
        self.send_html(chat_id, html).await
    }
}

/// Writes a few bytes to the destination, or fails on demand.
#[derive(Default)]
pub struct FakeMedia {
    pub fail: AtomicBool,
}

#[async_trait]
impl MediaSource for FakeMedia {
    async fn download(&self, file_id: &str, dest: &Path) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(Error::External("download refused".to_string()));
        }
        tokio::fs::write(dest, file_id.as_bytes()).await?;
        Ok(())
    }
}
