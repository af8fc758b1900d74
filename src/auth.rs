use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info};
use uuid::Uuid;
use crate::core::errors::ApiError;
use crate::core::helpers::{bearer_token, now, respond};
use crate::models::models::TokenData;
use crate::users::credentials;
use crate::AppState;

/// Bearer tokens handed out at login, mapped to the username they act for.
///
/// This is the only place that remembers who is logged in; the store and the
/// directory take the acting username as a plain argument.
pub struct SessionRegistry {
    tokens: RwLock<HashMap<String, TokenData>>,
    expiration_hours: i64,
}

impl SessionRegistry {
    pub fn new(expiration_hours: i64) -> Self {
        Self {
            tokens: RwLock::new(HashMap::new()),
            expiration_hours,
        }
    }

    /// Issues a fresh token for `username`. Expired tokens are dropped here,
    /// so the map only holds sessions that could still be used.
    pub fn issue(&self, username: &str) -> String {
        let token = Uuid::new_v4().to_string();
        let created_at = now();

        let mut tokens = self.tokens.write().unwrap_or_else(PoisonError::into_inner);
        tokens.retain(|_, data| !self.is_expired(data, created_at));
        tokens.insert(
            token.clone(),
            TokenData {
                username: username.to_string(),
                created_at,
            },
        );
        token
    }

    /// Returns the username behind `token`, dropping it if it has expired.
    pub fn resolve(&self, token: &str) -> Option<String> {
        let data = self
            .tokens
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(token)
            .cloned()?;

        if self.is_expired(&data, now()) {
            debug!("token for {} expired", data.username);
            self.revoke(token);
            return None;
        }
        Some(data.username)
    }

    pub fn revoke(&self, token: &str) -> Option<String> {
        self.tokens
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(token)
            .map(|data| data.username)
    }

    fn is_expired(&self, data: &TokenData, at: chrono::DateTime<chrono::Utc>) -> bool {
        (at - data.created_at).num_hours() > self.expiration_hours
    }

    pub fn len(&self) -> usize {
        self.tokens.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn validate_token(req: &HttpRequest, sessions: &SessionRegistry) -> Option<String> {
    let token = bearer_token(req)?;
    sessions.resolve(token)
}

pub(crate) fn require_user(req: &HttpRequest, state: &AppState) -> Result<String, ApiError> {
    validate_token(req, &state.sessions).ok_or_else(ApiError::unauthorized)
}

pub async fn login_user(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let (username, password) = credentials(&body)?;

    let directory = state.directory.clone();
    let name = username.clone();
    let posts = web::block(move || directory.authenticate(&name, &password)).await??;

    let token = state.sessions.issue(&username);
    info!("user {username} logged in");

    let resp = serde_json::json!({
        "token": token,
        "username": username,
        "posts": posts,
    });
    Ok(respond(StatusCode::OK, format!("Welcome {}!", username), Some(resp)))
}

pub async fn logout_user(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let token = bearer_token(&req).ok_or_else(ApiError::unauthorized)?;
    let username = state.sessions.revoke(token).ok_or_else(ApiError::unauthorized)?;

    state.directory.logout(&username);

    Ok(respond::<()>(StatusCode::OK, "Logged out successfully", None))
}
