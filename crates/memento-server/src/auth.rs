//! Session-based authentication.
//!
//! The memory service only ever sees the resolved `user_id`; everything
//! credential-shaped stays in this module. Sessions are opaque bearer
//! tokens held in process memory with a TTL, backed by the
//! [`UserDirectory`] for registration and login.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use memento_core::{NewUser, StoreError, User, UserDirectory};

use crate::error::ApiError;
use crate::state::AppState;

/// Authentication failures.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("email is already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("user directory error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Stable wire code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Store(_) => "UNKNOWN",
        }
    }
}

/// The authenticated caller, resolved from a session token.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
struct Session {
    user_id: String,
    name: String,
    expires_at: DateTime<Utc>,
}

/// In-process session table over the user directory.
pub struct SessionManager {
    users: Arc<dyn UserDirectory>,
    sessions: RwLock<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionManager {
    /// Create a session manager with the given token lifetime.
    pub fn new(users: Arc<dyn UserDirectory>, ttl_secs: u64) -> Self {
        Self {
            users,
            sessions: RwLock::new(HashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Register a new user.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        if self.users.find_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let user = self
            .users
            .create_user(NewUser {
                name: name.to_string(),
                email: email.to_string(),
                password_hash: hash_password(password),
            })
            .await?;
        Ok(user)
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> Result<(String, User), AuthError> {
        let user = self
            .users
            .find_user_by_email(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = Uuid::new_v4().to_string();
        let session = Session {
            user_id: user.id.clone(),
            name: user.name.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.sessions.write().await.insert(token.clone(), session);
        Ok((token, user))
    }

    /// Invalidate a session token. Unknown tokens are ignored.
    pub async fn logout(&self, token: &str) {
        self.sessions.write().await.remove(token);
    }

    /// Resolve a token into the authenticated identity, evicting it if
    /// it has expired.
    pub async fn resolve(&self, token: &str) -> Option<Identity> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Some(Identity {
                user_id: session.user_id.clone(),
                name: session.name.clone(),
            }),
            Some(_) => {
                sessions.remove(token);
                None
            }
            None => None,
        }
    }
}

fn hash_password(password: &str) -> String {
    let salt: [u8; 16] = rand::random();
    let digest = Sha256::digest([&salt[..], password.as_bytes()].concat());
    format!("{}${}", hex::encode(salt), hex::encode(digest))
}

fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_hex, hash_hex)) = stored.split_once('$') else {
        return false;
    };
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let digest = Sha256::digest([&salt[..], password.as_bytes()].concat());
    hex::encode(digest) == hash_hex
}

/// Pull the session token from the request: `Authorization: Bearer`
/// (or `Token`) first, then a `session` cookie.
fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(header) = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        if let Some(token) = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("Token "))
        {
            return Some(token.to_string());
        }
    }

    parts
        .headers
        .get(axum::http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|cookie| {
                let (name, value) = cookie.trim().split_once('=')?;
                (name == "session").then(|| value.to_string())
            })
        })
}

/// Raw session token extractor, for logout.
pub struct SessionToken(pub String);

#[async_trait]
impl FromRequestParts<AppState> for SessionToken {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        extract_token(parts)
            .map(SessionToken)
            .ok_or_else(ApiError::unauthenticated)
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Identity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(ApiError::unauthenticated)?;
        state
            .sessions
            .resolve(&token)
            .await
            .ok_or_else(ApiError::unauthenticated)
    }
}
