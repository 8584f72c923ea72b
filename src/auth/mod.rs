use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use thiserror::Error;
use uuid::Uuid;

/// Default lifetime of an admin session.
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 120;

/// Why a request failed the admin check. The messages are part of the HTTP contract.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    Missing,
    #[error("Invalid Authorization header")]
    Malformed,
    #[error("Invalid or expired token")]
    InvalidToken,
}

/// The admin name/key pair. Login is only possible when both are configured.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    key: String,
}

impl Credentials {
    /// Returns `None` unless both values are present and non-empty.
    pub fn new(username: Option<String>, key: Option<String>) -> Option<Self> {
        match (username, key) {
            (Some(username), Some(key)) if !username.is_empty() && !key.is_empty() => {
                Some(Credentials { username, key })
            }
            _ => None,
        }
    }

    pub fn matches(&self, name: &str, why: &str) -> bool {
        self.username == name && self.key == why
    }
}

// Keep the key out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("key", &"<redacted>")
            .finish()
    }
}

/// In-memory admin sessions: token -> expiry.
#[derive(Debug)]
pub struct TokenStore {
    ttl: Duration,
    tokens: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl Default for TokenStore {
    fn default() -> Self {
        TokenStore::new(Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES))
    }
}

impl TokenStore {
    pub fn new(ttl: Duration) -> Self {
        TokenStore {
            ttl,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Mint a new token valid for `ttl` from now, capped at the latest representable time.
    pub fn issue(&self) -> (String, DateTime<Utc>) {
        self.issue_at(Utc::now())
    }

    fn issue_at(&self, now: DateTime<Utc>) -> (String, DateTime<Utc>) {
        let token = Uuid::new_v4().simple().to_string();
        let expiry = now
            .checked_add_signed(self.ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        let mut tokens = self.lock();
        tokens.retain(|_, exp| *exp >= now);
        tokens.insert(token.clone(), expiry);
        (token, expiry)
    }

    /// Check a token, dropping it if it has expired.
    pub fn is_valid(&self, token: &str) -> bool {
        self.is_valid_at(token, Utc::now())
    }

    fn is_valid_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        let mut tokens = self.lock();
        match tokens.get(token) {
            None => false,
            Some(expiry) if *expiry < now => {
                tokens.remove(token);
                false
            }
            Some(_) => true,
        }
    }

    /// Forget a token. Returns whether it was known.
    pub fn revoke(&self, token: &str) -> bool {
        self.lock().remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, DateTime<Utc>>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.tokens.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
pub fn parse_bearer(header: &str) -> Result<&str, AuthError> {
    let mut parts = header.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::Malformed),
    }
}
