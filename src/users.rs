use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;
use tracing::info;
use crate::core::db::Store;
use crate::core::errors::{ApiError, StoreError};
use crate::core::helpers::respond;
use crate::models::models::Post;
use crate::AppState;

/// Registration and login on top of the store.
///
/// Holds no session state of its own; whoever keeps track of logged-in
/// users (see [`crate::auth::SessionRegistry`]) calls [`Directory::logout`]
/// when it forgets one.
#[derive(Clone)]
pub struct Directory {
    store: Arc<Store>,
}

impl Directory {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        self.store.register(username, password)?;
        info!("registered user {username}");
        Ok(())
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<Vec<Post>, StoreError> {
        self.store.authenticate(username, password)
    }

    pub fn logout(&self, username: &str) {
        info!("user {username} logged out");
    }
}

pub(crate) fn credentials(body: &[u8]) -> Result<(String, String), ApiError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;
    let username = value["username"].as_str().unwrap_or_default();
    let password = value["password"].as_str().unwrap_or_default();
    Ok((username.to_string(), password.to_string()))
}

pub async fn create_user(
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let (username, password) = credentials(&body)?;

    let directory = state.directory.clone();
    web::block(move || directory.register(&username, &password)).await??;

    Ok(respond::<()>(StatusCode::CREATED, "Registration successful.", None))
}
