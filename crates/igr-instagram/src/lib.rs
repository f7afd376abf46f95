//! Instagram adapter (mobile private API over HTTPS).
//!
//! Implements the `igr-core` AccountClient port. The session lives in the
//! reqwest cookie store plus the `ig-set-authorization` bearer the login
//! response hands out.

use std::{path::Path, sync::Mutex, time::Duration};

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{header::HeaderMap, Method, RequestBuilder};
use uuid::Uuid;

use igr_core::{
    account::AccountClient,
    config::Config,
    domain::{AccountProfile, InstagramUserId},
    errors::Error,
    Result,
};

mod api;

const USER_AGENT: &str = "Instagram 269.0.0.18.75 Android (26/8.0.0; 480dpi; 1080x1920; OnePlus; 6T Dev; devitron; qcom; en_US; 314665256)";
const APP_ID: &str = "567067343352427";

#[derive(Clone, Debug)]
pub struct InstagramConfig {
    pub api_base: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl From<&Config> for InstagramConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            api_base: cfg.instagram_api_base.clone(),
            username: cfg.instagram_username.clone(),
            password: cfg.instagram_password.clone(),
            timeout: cfg.instagram_timeout,
        }
    }
}

#[derive(Debug, Default)]
struct SessionData {
    user_pk: Option<String>,
    authorization: Option<String>,
}

pub struct InstagramClient {
    cfg: InstagramConfig,
    http: reqwest::Client,
    device_id: String,
    uuid: String,
    session: Mutex<SessionData>,
}

impl InstagramClient {
    pub fn new(cfg: InstagramConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::External(format!("instagram http client build failed: {e}")))?;

        let uuid = Uuid::new_v4();
        Ok(Self {
            cfg,
            http,
            device_id: format!("android-{}", &uuid.simple().to_string()[..16]),
            uuid: uuid.to_string(),
            session: Mutex::new(SessionData::default()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.cfg.api_base, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        let mut req = self
            .http
            .request(method, url)
            .header("X-IG-App-ID", APP_ID)
            .header("X-IG-Device-ID", &self.uuid)
            .header("X-IG-Android-ID", &self.device_id);
        if let Some(auth) = self.session_data(|s| s.authorization.clone()) {
            req = req.header("Authorization", auth);
        }
        req
    }

    fn session_data<T>(&self, f: impl FnOnce(&mut SessionData) -> T) -> T {
        let mut guard = self.session.lock().unwrap_or_else(|p| p.into_inner());
        f(&mut guard)
    }

    fn user_pk(&self) -> Result<String> {
        self.session_data(|s| s.user_pk.clone())
            .ok_or_else(|| Error::Auth("not logged in".to_string()))
    }

    async fn send(&self, what: &str, req: RequestBuilder) -> Result<(HeaderMap, String)> {
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Remote(format!("instagram {what} request error: {e}")))?;

        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Remote(format!("instagram {what} read error: {e}")))?;

        if !status.is_success() {
            return Err(Error::Remote(format!(
                "instagram {what} failed: {status} {}",
                body.chars().take(200).collect::<String>()
            )));
        }
        Ok((headers, body))
    }

    async fn get(&self, what: &str, path: &str) -> Result<String> {
        let (_, body) = self.send(what, self.request(Method::GET, &self.url(path))).await?;
        Ok(body)
    }

    async fn post_form(&self, what: &str, path: &str, form: &[(&str, String)]) -> Result<String> {
        let req = self.request(Method::POST, &self.url(path)).form(form);
        let (_, body) = self.send(what, req).await?;
        api::check_status(what, &body)?;
        Ok(body)
    }
}

#[async_trait]
impl AccountClient for InstagramClient {
    async fn login(&self) -> Result<()> {
        let ts = Utc::now().timestamp();
        let form = [
            ("username", self.cfg.username.clone()),
            ("enc_password", api::enc_password(&self.cfg.password, ts)),
            ("guid", self.uuid.clone()),
            ("phone_id", self.uuid.clone()),
            ("device_id", self.device_id.clone()),
            ("login_attempt_count", "0".to_string()),
        ];

        let req = self.request(Method::POST, &self.url("accounts/login/")).form(&form);
        let (headers, body) = self.send("login", req).await.map_err(|e| match e {
            Error::Remote(msg) => Error::Auth(msg),
            other => other,
        })?;
        let pk = api::parse_login(&body)?;

        let authorization = headers
            .get("ig-set-authorization")
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.to_string());

        tracing::debug!(user_pk = %pk, bearer = authorization.is_some(), "instagram session established");
        self.session_data(|s| {
            s.user_pk = Some(pk);
            if authorization.is_some() {
                s.authorization = authorization;
            }
        });
        Ok(())
    }

    async fn account_info(&self) -> Result<AccountProfile> {
        let pk = self.user_pk()?;
        let body = self.get("account info", &format!("users/{pk}/info/")).await?;
        api::parse_profile(&body)
    }

    async fn list_followers(&self, limit: usize) -> Result<Vec<String>> {
        let pk = self.user_pk()?;
        let body = self
            .get("followers", &format!("friendships/{pk}/followers/?count={limit}"))
            .await?;
        let mut users = api::parse_followers(&body)?;
        users.truncate(limit);
        Ok(users)
    }

    async fn upload_photo(&self, path: &Path, caption: &str) -> Result<()> {
        let bytes = tokio::fs::read(path).await.map_err(Error::Io)?;

        let upload_id = Utc::now().timestamp_millis().to_string();
        let upload_name = api::upload_name(&upload_id, Uuid::new_v4().as_u128());
        let url = format!("{}/rupload_igphoto/{upload_name}", api::host_root(&self.cfg.api_base));

        let req = self
            .request(Method::POST, &url)
            .header("X-Instagram-Rupload-Params", api::rupload_params(&upload_id))
            .header("X-Entity-Type", "image/jpeg")
            .header("X-Entity-Name", &upload_name)
            .header("X-Entity-Length", bytes.len().to_string())
            .header("Offset", "0")
            .header("Content-Type", "application/octet-stream")
            .body(bytes);
        let (_, body) = self.send("photo upload", req).await?;
        api::check_status("photo upload", &body)?;

        let form = [
            ("upload_id", upload_id),
            ("caption", caption.to_string()),
            ("source_type", "4".to_string()),
            ("device_id", self.device_id.clone()),
            ("_uuid", self.uuid.clone()),
        ];
        self.post_form("media configure", "media/configure/", &form).await?;
        Ok(())
    }

    async fn user_id_from_username(&self, username: &str) -> Result<InstagramUserId> {
        let body = self
            .get("user lookup", &format!("users/{username}/usernameinfo/"))
            .await?;
        api::parse_user_id(&body).map(InstagramUserId)
    }

    async fn send_direct_message(&self, recipient: &InstagramUserId, text: &str) -> Result<()> {
        let form = [
            ("recipient_users", format!("[[{}]]", recipient.0)),
            ("text", text.to_string()),
            ("action", "send_item".to_string()),
            ("client_context", Uuid::new_v4().to_string()),
            ("_uuid", self.uuid.clone()),
        ];
        self.post_form("direct message", "direct_v2/threads/broadcast/text/", &form)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use wiremock::{
        matchers::{body_string_contains, header, method, path, path_regex},
        Mock, MockServer, ResponseTemplate,
    };

    use super::*;

    const BEARER: &str = "Bearer IGT:2:session-token";

    fn client_at(api_base: &str) -> InstagramClient {
        InstagramClient::new(InstagramConfig {
            api_base: api_base.to_string(),
            username: "shop".to_string(),
            password: "pw".to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn client() -> InstagramClient {
        client_at("https://i.instagram.com/api/v1")
    }

    fn ok_json(body: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "application/json")
    }

    async fn mount_login(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .and(body_string_contains("username=shop"))
            .respond_with(
                ok_json(r#"{"status":"ok","logged_in_user":{"pk":42,"username":"shop"}}"#)
                    .insert_header("ig-set-authorization", BEARER),
            )
            .expect(1)
            .mount(server)
            .await;
    }

    async fn logged_in(server: &MockServer) -> InstagramClient {
        mount_login(server).await;
        let c = client_at(&format!("{}/api/v1", server.uri()));
        c.login().await.unwrap();
        c
    }

    #[test]
    fn builds_urls_under_api_base() {
        let c = client();
        assert_eq!(c.url("users/1/info/"), "https://i.instagram.com/api/v1/users/1/info/");
        assert_eq!(c.url("/accounts/login/"), "https://i.instagram.com/api/v1/accounts/login/");
    }

    #[test]
    fn device_ids_have_expected_shape() {
        let c = client();
        assert!(c.device_id.starts_with("android-"));
        assert_eq!(c.device_id.len(), "android-".len() + 16);
        assert!(Uuid::parse_str(&c.uuid).is_ok());
    }

    #[tokio::test]
    async fn account_calls_require_login_first() {
        let c = client();
        let err = c.account_info().await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
        let err = c.list_followers(10).await.unwrap_err();
        assert!(matches!(err, Error::Auth(_)));
    }

    #[tokio::test]
    async fn rejected_login_is_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/accounts/login/"))
            .respond_with(
                ResponseTemplate::new(400)
                    .set_body_string(r#"{"status":"fail","message":"The password you entered is incorrect."}"#),
            )
            .mount(&server)
            .await;

        let c = client_at(&format!("{}/api/v1", server.uri()));
        let err = c.login().await.unwrap_err();
        assert!(matches!(err, Error::Auth(ref m) if m.contains("400")), "{err}");
        assert!(matches!(c.account_info().await, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn server_error_is_remote_with_bounded_excerpt() {
        let server = MockServer::start().await;
        let c = logged_in(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/42/info/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("x".repeat(1000)))
            .mount(&server)
            .await;

        let err = c.account_info().await.unwrap_err();
        let Error::Remote(ref msg) = err else {
            panic!("expected remote error, got {err:?}");
        };
        assert!(msg.contains("500"), "{msg}");
        assert_eq!(msg.matches('x').count(), 200);
    }

    #[tokio::test]
    async fn login_bearer_is_sent_on_later_requests() {
        let server = MockServer::start().await;
        let c = logged_in(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/friendships/42/followers/"))
            .and(header("Authorization", BEARER))
            .respond_with(ok_json(
                r#"{"status":"ok","users":[{"pk":1,"username":"a"},{"pk":2,"username":"b"},{"pk":3,"username":"c"}]}"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(c.list_followers(2).await.unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn upload_sends_bytes_then_configures_media() {
        let server = MockServer::start().await;
        let c = logged_in(&server).await;
        Mock::given(method("POST"))
            .and(path_regex(r"^/rupload_igphoto/\d+_0_\d{10}$"))
            .and(header("X-Entity-Type", "image/jpeg"))
            .respond_with(ok_json(r#"{"status":"ok","upload_id":"1"}"#))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/media/configure/"))
            .and(body_string_contains("caption=Yangi+post"))
            .respond_with(ok_json(r#"{"status":"ok"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let photo = std::env::temp_dir().join(format!("igr-instagram-upload-{}.jpg", std::process::id()));
        std::fs::write(&photo, b"jpeg-bytes").unwrap();
        let result = c.upload_photo(&photo, "Yangi post").await;
        let _ = std::fs::remove_file(&photo);
        result.unwrap();

        let paths: Vec<String> = server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| r.url.path().to_string())
            .collect();
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0], "/api/v1/accounts/login/");
        assert!(paths[1].starts_with("/rupload_igphoto/"), "{paths:?}");
        assert_eq!(paths[2], "/api/v1/media/configure/");
    }

    #[tokio::test]
    async fn direct_message_targets_resolved_user() {
        let server = MockServer::start().await;
        let c = logged_in(&server).await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/john_doe/usernameinfo/"))
            .respond_with(ok_json(r#"{"status":"ok","user":{"pk":55,"username":"john_doe"}}"#))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/v1/direct_v2/threads/broadcast/text/"))
            .and(body_string_contains("recipient_users=%5B%5B55%5D%5D"))
            .and(body_string_contains("text=Salom+do%27st"))
            .respond_with(ok_json(r#"{"status":"ok"}"#))
            .expect(1)
            .mount(&server)
            .await;

        let id = c.user_id_from_username("john_doe").await.unwrap();
        assert_eq!(id, InstagramUserId("55".to_string()));
        c.send_direct_message(&id, "Salom do'st").await.unwrap();
    }

    #[tokio::test]
    async fn fail_status_with_success_code_is_remote() {
        let server = MockServer::start().await;
        let c = logged_in(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/v1/direct_v2/threads/broadcast/text/"))
            .respond_with(ok_json(r#"{"status":"fail","message":"feedback_required"}"#))
            .mount(&server)
            .await;

        let err = c
            .send_direct_message(&InstagramUserId("55".to_string()), "hi")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Remote(ref m) if m.contains("feedback_required")), "{err}");
    }
}
