use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicUsize, Ordering},
};

use chrono::Utc;

use crate::{domain::UserId, errors::Error, Result};

static PHOTO_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Unique local path for an inbound photo.
pub fn temp_photo_path(dir: &Path, user: UserId, message_id: i32) -> PathBuf {
    let ts = Utc::now().timestamp_millis();
    let n = PHOTO_COUNTER.fetch_add(1, Ordering::SeqCst);
    dir.join(format!("photo_{}_{message_id}_{ts}_{n}.jpg", user.0))
}

/// Owns a temp file and removes it when dropped, unless `keep()` hands the
/// path over to a longer-lived owner. Removal errors are ignored.
#[derive(Debug)]
pub struct TempPhoto {
    path: PathBuf,
    armed: bool,
}

impl TempPhoto {
    pub fn new(path: PathBuf) -> Self {
        Self { path, armed: true }
    }

    /// Disarm the guard and return the path; the file is left on disk.
    pub fn keep(mut self) -> PathBuf {
        self.armed = false;
        std::mem::take(&mut self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    pub fn ensure_exists(&self) -> Result<()> {
        if self.exists() {
            Ok(())
        } else {
            Err(Error::MissingFile(self.path.clone()))
        }
    }
}

impl Drop for TempPhoto {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            tracing::debug!(path = %self.path.display(), error = %e, "temp photo cleanup skipped");
        }
    }
}
