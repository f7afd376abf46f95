use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{domain::UserId, errors::Error, Result};

/// Typed configuration, loaded once at process start.
#[derive(Clone)]
pub struct Config {
    // Telegram
    pub telegram_token: String,
    pub operator_id: UserId,

    // Instagram
    pub instagram_username: String,
    pub instagram_password: String,
    pub instagram_api_base: String,
    pub instagram_timeout: Duration,

    // Runtime
    pub temp_dir: PathBuf,

    // Reply limits
    pub followers_fetch_limit: usize,
    pub followers_display_limit: usize,
    pub bio_preview_len: usize,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("telegram_token", &"<redacted>")
            .field("operator_id", &self.operator_id)
            .field("instagram_username", &self.instagram_username)
            .field("instagram_password", &"<redacted>")
            .field("instagram_api_base", &self.instagram_api_base)
            .field("instagram_timeout", &self.instagram_timeout)
            .field("temp_dir", &self.temp_dir)
            .field("followers_fetch_limit", &self.followers_fetch_limit)
            .field("followers_display_limit", &self.followers_display_limit)
            .field("bio_preview_len", &self.bio_preview_len)
            .finish()
    }
}

impl Config {
    /// Load from `.env` (if present) and the process environment, then make sure
    /// the temp directory exists.
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let cfg = Self::from_lookup(|key| env::var(key).ok())?;
        fs::create_dir_all(&cfg.temp_dir)?;
        Ok(cfg)
    }

    /// Build a config from an arbitrary key lookup. Does not touch the filesystem.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).and_then(non_empty);

        // Required
        let telegram_token = get("TELEGRAM_TOKEN")
            .or_else(|| get("TELEGRAM_BOT_TOKEN"))
            .ok_or_else(|| required("TELEGRAM_TOKEN"))?;
        let instagram_username = get("INSTAGRAM_USERNAME").ok_or_else(|| required("INSTAGRAM_USERNAME"))?;
        let instagram_password = get("INSTAGRAM_PASSWORD").ok_or_else(|| required("INSTAGRAM_PASSWORD"))?;
        let operator_raw = get("ADMIN_ID").ok_or_else(|| required("ADMIN_ID"))?;
        let operator_id = operator_raw
            .trim()
            .parse::<i64>()
            .map(UserId)
            .map_err(|_| Error::Config(format!("ADMIN_ID must be a numeric Telegram user id, got {operator_raw:?}")))?;

        // Instagram API
        let instagram_api_base = get("INSTAGRAM_API_BASE")
            .unwrap_or_else(|| "https://i.instagram.com/api/v1".to_string())
            .trim_end_matches('/')
            .to_string();
        let instagram_timeout =
            Duration::from_secs(parse_num(get("INSTAGRAM_TIMEOUT_SECS")).unwrap_or(30));

        let temp_dir = get("TEMP_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("/tmp/igr"));

        // Reply limits (display can never exceed what we fetch)
        let followers_fetch_limit = parse_num(get("FOLLOWERS_FETCH_LIMIT")).unwrap_or(50).max(1);
        let followers_display_limit = parse_num(get("FOLLOWERS_DISPLAY_LIMIT"))
            .unwrap_or(20)
            .clamp(1, followers_fetch_limit);
        let bio_preview_len = parse_num(get("BIO_PREVIEW_LEN")).unwrap_or(100);

        Ok(Self {
            telegram_token,
            operator_id,
            instagram_username,
            instagram_password,
            instagram_api_base,
            instagram_timeout,
            temp_dir,
            followers_fetch_limit: followers_fetch_limit as usize,
            followers_display_limit: followers_display_limit as usize,
            bio_preview_len: bio_preview_len as usize,
        })
    }
}

fn required(key: &str) -> Error {
    Error::Config(format!("{key} environment variable is required"))
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for (key, val) in parse_dotenv(&contents) {
        if env::var_os(&key).is_some() {
            continue; // do not override existing env
        }
        env::set_var(key, val);
    }
}

fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        out.push((key.to_string(), val));
    }
    out
}

fn parse_num(v: Option<String>) -> Option<u64> {
    v.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
