//! Request payload builders and response parsers for the mobile API.

use serde::Deserialize;
use serde_json::Value;

use igr_core::{domain::AccountProfile, errors::Error, Result};

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    message: Option<String>,
    logged_in_user: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    pk: Value,
}

#[derive(Debug, Deserialize)]
struct UserRefResponse {
    user: UserRef,
}

#[derive(Debug, Deserialize)]
struct UserInfoResponse {
    user: UserInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct UserInfo {
    username: String,
    full_name: String,
    follower_count: u64,
    following_count: u64,
    media_count: u64,
    biography: String,
}

#[derive(Debug, Deserialize)]
struct FollowersResponse {
    #[serde(default)]
    users: Vec<UserShort>,
}

#[derive(Debug, Deserialize)]
struct UserShort {
    username: String,
}

fn decode<'a, T: Deserialize<'a>>(what: &str, body: &'a str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|e| Error::Remote(format!("instagram {what} returned unexpected json: {e}")))
}

/// The API reports logical failures as `{"status": "fail", "message": ...}` with a 200.
pub(crate) fn check_status(what: &str, body: &str) -> Result<()> {
    let resp: StatusResponse = decode(what, body)?;
    if resp.status == "ok" {
        return Ok(());
    }
    Err(Error::Remote(format!(
        "instagram {what} status {:?}: {}",
        resp.status,
        resp.message.unwrap_or_default()
    )))
}

/// `pk` shows up as a number or a string depending on the endpoint.
fn pk_string(v: &Value) -> Option<String> {
    match v {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub(crate) fn parse_login(body: &str) -> Result<String> {
    let resp: LoginResponse =
        serde_json::from_str(body).map_err(|e| Error::Auth(format!("unexpected login response: {e}")))?;
    if resp.status != "ok" {
        return Err(Error::Auth(resp.message.unwrap_or_else(|| "login rejected".to_string())));
    }
    resp.logged_in_user
        .and_then(|u| pk_string(&u.pk))
        .ok_or_else(|| Error::Auth("login response missing logged_in_user.pk".to_string()))
}

pub(crate) fn parse_profile(body: &str) -> Result<AccountProfile> {
    check_status("account info", body)?;
    let u = decode::<UserInfoResponse>("account info", body)?.user;
    Ok(AccountProfile {
        username: u.username,
        full_name: u.full_name,
        follower_count: u.follower_count,
        following_count: u.following_count,
        post_count: u.media_count,
        biography: u.biography,
    })
}

pub(crate) fn parse_followers(body: &str) -> Result<Vec<String>> {
    check_status("followers", body)?;
    let resp: FollowersResponse = decode("followers", body)?;
    Ok(resp.users.into_iter().map(|u| u.username).collect())
}

pub(crate) fn parse_user_id(body: &str) -> Result<String> {
    check_status("user lookup", body)?;
    let resp: UserRefResponse = decode("user lookup", body)?;
    pk_string(&resp.user.pk).ok_or_else(|| Error::Remote("user lookup returned no pk".to_string()))
}

/// Version-0 (unencrypted) password envelope accepted by the login endpoint.
pub(crate) fn enc_password(password: &str, unix_ts: i64) -> String {
    format!("#PWD_INSTAGRAM:0:{unix_ts}:{password}")
}

/// `https://i.instagram.com/api/v1` → `https://i.instagram.com`.
pub(crate) fn host_root(api_base: &str) -> &str {
    let base = api_base.trim_end_matches('/');
    base.strip_suffix("/api/v1").unwrap_or(base)
}

pub(crate) fn upload_name(upload_id: &str, entropy: u128) -> String {
    let suffix = 1_000_000_000 + (entropy % 9_000_000_000) as u64;
    format!("{upload_id}_0_{suffix}")
}

pub(crate) fn rupload_params(upload_id: &str) -> String {
    serde_json::json!({
        "retry_context": r#"{"num_step_auto_retry":0,"num_reupload":0,"num_step_manual_retry":0}"#,
        "media_type": "1",
        "xsharing_user_ids": "[]",
        "upload_id": upload_id,
        "image_compression": r#"{"lib_name":"moz","lib_version":"3.1.m","quality":"80"}"#,
    })
    .to_string()
}
