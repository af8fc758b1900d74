use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use crate::auth::require_user;
use crate::core::errors::ApiError;
use crate::core::helpers::respond;
use crate::models::models::{PostId, Vote};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    pub author: Option<String>,
}

pub async fn create_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let username = require_user(&req, &state)?;

    let value: serde_json::Value = serde_json::from_slice(&body)?;
    let content = value["content"].as_str().unwrap_or_default().to_string();

    if content.chars().count() > state.config.max_post_length {
        return Err(ApiError::BadRequest(format!(
            "Post cannot be longer than {} characters.",
            state.config.max_post_length
        )));
    }

    let store = Arc::clone(&state.store);
    let author = username.clone();
    let id = web::block(move || store.create_post(&author, &content)).await??;
    info!("user {username} created post {id}");

    Ok(respond(
        StatusCode::CREATED,
        format!("Post created successfully with ID: {}", id),
        Some(serde_json::json!({ "id": id })),
    ))
}

pub async fn delete_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, ApiError> {
    let username = require_user(&req, &state)?;
    let post_id = path.into_inner();

    let store = Arc::clone(&state.store);
    web::block(move || store.delete_post(&username, post_id)).await??;

    Ok(respond::<()>(
        StatusCode::OK,
        format!("Post ID {} deleted successfully.", post_id),
        None,
    ))
}

/// Everyone's posts, or a single author's with `?author=name`.
pub async fn list_posts(
    state: web::Data<AppState>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, ApiError> {
    // An empty author means no filter.
    let author = query.into_inner().author.filter(|a| !a.is_empty());

    let store = Arc::clone(&state.store);
    let posts = web::block(move || store.list_posts(author.as_deref())).await??;

    Ok(respond(StatusCode::OK, format!("{} posts", posts.len()), Some(posts)))
}

pub async fn my_posts(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let username = require_user(&req, &state)?;

    let store = Arc::clone(&state.store);
    let posts = web::block(move || store.list_posts(Some(&username))).await??;

    Ok(respond(StatusCode::OK, format!("{} posts", posts.len()), Some(posts)))
}

pub async fn upvote_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, ApiError> {
    vote_post(&req, &state, path.into_inner(), Vote::Up).await
}

pub async fn downvote_post(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<PostId>,
) -> Result<HttpResponse, ApiError> {
    vote_post(&req, &state, path.into_inner(), Vote::Down).await
}

async fn vote_post(
    req: &HttpRequest,
    state: &AppState,
    post_id: PostId,
    vote: Vote,
) -> Result<HttpResponse, ApiError> {
    require_user(req, state)?;

    let store = Arc::clone(&state.store);
    let post = web::block(move || store.vote(post_id, vote)).await??;

    let verb = match vote {
        Vote::Up => "liked",
        Vote::Down => "disliked",
    };
    Ok(respond(
        StatusCode::OK,
        format!("Post ID {} {} successfully.", post_id, verb),
        Some(post),
    ))
}
