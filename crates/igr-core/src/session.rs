use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;

use crate::domain::UserId;

/// Which step of the post-upload flow a user is in.
///
/// Awaiting a photo and awaiting a caption are variants of one enum, so they can
/// never both be set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    AwaitingPhoto,
    AwaitingCaption {
        photo: PathBuf,
    },
}

impl FlowState {
    pub fn awaiting_photo(&self) -> bool {
        matches!(self, Self::AwaitingPhoto)
    }

    pub fn awaiting_caption(&self) -> bool {
        matches!(self, Self::AwaitingCaption { .. })
    }

    pub fn pending_file(&self) -> Option<&Path> {
        match self {
            Self::AwaitingCaption { photo } => Some(photo),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }
}

/// Per-user ephemeral flow flags. Not persisted; lost on restart.
///
/// Entries only exist while a flow is in progress. Concurrent writers for the
/// same user are last-write-wins.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<UserId, FlowState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state; absent entries resolve to `Idle`.
    pub async fn get(&self, user: UserId) -> FlowState {
        self.inner.lock().await.get(&user).cloned().unwrap_or_default()
    }

    /// Replace the state and return the previous one.
    pub async fn set(&self, user: UserId, state: FlowState) -> FlowState {
        let mut map = self.inner.lock().await;
        let prev = if state.is_idle() {
            map.remove(&user)
        } else {
            map.insert(user, state)
        };
        prev.unwrap_or_default()
    }

    /// Reset to `Idle`, returning whatever was there so the caller can release
    /// a pending file.
    pub async fn clear(&self, user: UserId) -> FlowState {
        self.inner.lock().await.remove(&user).unwrap_or_default()
    }

    pub async fn active_flows(&self) -> usize {
        self.inner.lock().await.len()
    }
}
