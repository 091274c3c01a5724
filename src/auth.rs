use axum::http::{header, HeaderMap};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "lead_board_session";
const SESSION_MAX_AGE_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone)]
struct SessionEntry {
    email: String,
    issued_at: DateTime<Utc>,
}

/// Tokens older than the cookie's max age are dropped on lookup and on every new login.
#[derive(Debug, Default)]
pub struct SessionStore {
    tokens: HashMap<String, SessionEntry>,
}

impl SessionStore {
    pub fn open(&mut self, email: &str) -> String {
        self.open_at(email, Utc::now())
    }

    pub fn open_at(&mut self, email: &str, now: DateTime<Utc>) -> String {
        self.tokens.retain(|_, entry| !is_expired(entry, now));
        let token = Uuid::new_v4().to_string();
        self.tokens.insert(
            token.clone(),
            SessionEntry {
                email: email.to_string(),
                issued_at: now,
            },
        );
        token
    }

    pub fn lookup(&mut self, token: &str) -> Option<String> {
        self.lookup_at(token, Utc::now())
    }

    pub fn lookup_at(&mut self, token: &str, now: DateTime<Utc>) -> Option<String> {
        let entry = self.tokens.get(token)?;
        if is_expired(entry, now) {
            self.tokens.remove(token);
            return None;
        }
        Some(entry.email.clone())
    }

    pub fn close(&mut self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

fn max_age() -> Duration {
    Duration::seconds(SESSION_MAX_AGE_SECS as i64)
}

fn is_expired(entry: &SessionEntry, now: DateTime<Utc>) -> bool {
    now - entry.issued_at >= max_age()
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={SESSION_MAX_AGE_SECS}")
}

pub fn expired_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}
