use actix_web::web;
use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod core;
pub mod models;
pub mod posts;
pub mod users;

use crate::auth::SessionRegistry;
use crate::config::Config;
use crate::core::db::Store;
use crate::users::Directory;

pub use crate::core::errors::StoreError;
pub use crate::models::models::{Post, PostId, StoreData, User, Vote};

// === Shared state ===
pub struct AppState {
    pub store: Arc<Store>,
    pub directory: Directory,
    pub sessions: SessionRegistry,
    pub config: Config,
}

impl AppState {
    /// Opens the store named in `config`. Call once per process.
    pub fn new(config: Config) -> Self {
        let store = Arc::new(Store::open(config.data_file.clone()));
        Self::with_store(store, config)
    }

    pub fn with_store(store: Arc<Store>, config: Config) -> Self {
        Self {
            directory: Directory::new(Arc::clone(&store)),
            sessions: SessionRegistry::new(config.token_expiration_hours),
            store,
            config,
        }
    }
}

// === Routes ===
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/users").route(web::post().to(users::create_user)))
        .service(web::resource("/login").route(web::post().to(auth::login_user)))
        .service(web::resource("/logout").route(web::post().to(auth::logout_user)))
        .service(
            web::resource("/posts")
                .route(web::get().to(posts::list_posts))
                .route(web::post().to(posts::create_post)),
        )
        .service(web::resource("/my_posts").route(web::get().to(posts::my_posts)))
        .service(web::resource("/posts/{id}").route(web::delete().to(posts::delete_post)))
        .service(web::resource("/posts/{id}/upvote").route(web::post().to(posts::upvote_post)))
        .service(web::resource("/posts/{id}/downvote").route(web::post().to(posts::downvote_post)));
}
