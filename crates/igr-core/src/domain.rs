/// Telegram user id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct UserId(pub i64);

/// Telegram chat id (numeric).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChatId(pub i64);

/// Instagram numeric account id (`pk`), kept as a string as the API returns both forms.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstagramUserId(pub String);

/// Read-only snapshot of the operated account. Never cached beyond one reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccountProfile {
    pub username: String,
    pub full_name: String,
    pub follower_count: u64,
    pub following_count: u64,
    pub post_count: u64,
    pub biography: String,
}

/// A parsed `username:message` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DirectMessageRequest {
    pub recipient: String,
    pub body: String,
}
