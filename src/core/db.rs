//! File-backed store for users and their posts.
//!
//! The whole document lives in memory behind a [`RwLock`] and is mirrored to a
//! single JSON file. Mutations hold the write lock across the full
//! read-modify-write cycle, including the durable write, so two writers can
//! never interleave. The new state is published only after the file has been
//! replaced; a failed write leaves both the file and the in-memory state as
//! they were.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, error, info, warn};
use crate::core::errors::StoreError;
use crate::core::helpers::{to_json_pretty, write_atomic};
use crate::models::models::{Post, PostId, StoreData, User, Vote};

pub struct Store {
    path: PathBuf,
    state: RwLock<StoreData>,
}

impl Store {
    /// Opens the store at `path`.
    ///
    /// A missing, unreadable or malformed file yields an empty store. Nothing
    /// is written until the first mutation.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut data = load_data(&path);
        data.next_post_id = data.next_post_id.max(data.max_post_id().saturating_add(1));
        if data.next_post_id == PostId::MAX {
            error!(
                "store file {} has no post ids left; new posts will be refused",
                path.display()
            );
        }

        info!(
            "opened store at {} ({} users, next post id {})",
            path.display(),
            data.user_data.len(),
            data.next_post_id
        );

        Self {
            path,
            state: RwLock::new(data),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn register(&self, username: &str, password: &str) -> Result<(), StoreError> {
        if username.is_empty() || password.is_empty() {
            return Err(StoreError::InvalidInput("Username and password cannot be empty."));
        }

        self.mutate(|data| {
            if data.user(username).is_some() {
                return Err(StoreError::DuplicateUser);
            }
            data.user_data.push(User {
                username: username.to_string(),
                password: password.to_string(),
                posts: Vec::new(),
            });
            Ok(())
        })
    }

    /// Returns the user's posts when both fields match a stored user exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Vec<Post>, StoreError> {
        self.read(|data| {
            data.user_data
                .iter()
                .find(|u| u.username == username && u.password == password)
                .map(|u| u.posts.clone())
                .ok_or(StoreError::InvalidCredentials)
        })
    }

    pub fn create_post(&self, username: &str, text: &str) -> Result<PostId, StoreError> {
        if text.is_empty() {
            return Err(StoreError::InvalidInput("Post cannot be empty."));
        }

        self.mutate(|data| {
            if data.user(username).is_none() {
                return Err(StoreError::UnknownUser(username.to_string()));
            }

            let id = data.allocate_post_id().ok_or(StoreError::IdsExhausted)?;
            let post = Post {
                id,
                text: text.to_string(),
                likes: 0,
                dislikes: 0,
                author: username.to_string(),
            };

            // Checked above, and we still hold the lock.
            if let Some(user) = data.user_mut(username) {
                user.posts.push(post);
            }
            Ok(id)
        })
    }

    /// Deletes one of `username`'s posts. Someone else's post and a missing
    /// post are reported the same way.
    pub fn delete_post(&self, username: &str, post_id: PostId) -> Result<(), StoreError> {
        self.mutate(|data| {
            let user = data
                .user_mut(username)
                .ok_or(StoreError::NotFoundOrForbidden(post_id))?;

            let before = user.posts.len();
            user.posts.retain(|p| p.id != post_id);
            if user.posts.len() == before {
                return Err(StoreError::NotFoundOrForbidden(post_id));
            }
            Ok(())
        })
    }

    /// Lists posts in stored order: users in registration order, each user's
    /// posts in creation order.
    pub fn list_posts(&self, author: Option<&str>) -> Result<Vec<Post>, StoreError> {
        self.read(|data| {
            Ok(data
                .user_data
                .iter()
                .filter(|u| author.map_or(true, |a| u.username == a))
                .flat_map(|u| u.posts.iter().cloned())
                .collect())
        })
    }

    pub fn vote(&self, post_id: PostId, vote: Vote) -> Result<Post, StoreError> {
        self.mutate(|data| {
            let post = data.post_mut(post_id).ok_or(StoreError::NotFound(post_id))?;
            match vote {
                Vote::Up => post.likes = post.likes.saturating_add(1),
                Vote::Down => post.dislikes = post.dislikes.saturating_add(1),
            }
            Ok(post.clone())
        })
    }

    pub fn get_post(&self, post_id: PostId) -> Result<Post, StoreError> {
        self.read(|data| {
            data.posts()
                .find(|p| p.id == post_id)
                .cloned()
                .ok_or(StoreError::NotFound(post_id))
        })
    }

    pub fn user_count(&self) -> Result<usize, StoreError> {
        self.read(|data| Ok(data.user_data.len()))
    }

    /// A copy of the last committed state.
    pub fn snapshot(&self) -> Result<StoreData, StoreError> {
        self.read(|data| Ok(data.clone()))
    }

    fn read<T>(&self, f: impl FnOnce(&StoreData) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let guard = self.state.read().map_err(|_| StoreError::Poisoned)?;
        f(&*guard)
    }

    /// Runs `f` against a private copy of the state while holding the write
    /// lock, persists the result, and only then publishes it.
    fn mutate<T>(&self, f: impl FnOnce(&mut StoreData) -> Result<T, StoreError>) -> Result<T, StoreError> {
        let mut guard = self.state.write().map_err(|_| StoreError::Poisoned)?;

        let mut next = guard.clone();
        let out = f(&mut next)?;

        let bytes = to_json_pretty(&next)?;
        if let Err(e) = write_atomic(&self.path, &bytes) {
            error!("failed to write store {}: {}", self.path.display(), e);
            return Err(e.into());
        }
        debug!("committed store ({} bytes)", bytes.len());

        *guard = next;
        Ok(out)
    }
}

fn load_data(path: &Path) -> StoreData {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("store file {} not found, starting empty", path.display());
            return StoreData::default();
        }
        Err(e) => {
            error!("store file {} unreadable ({}), starting empty", path.display(), e);
            return StoreData::default();
        }
    };

    match serde_json::from_slice::<StoreData>(&raw) {
        Ok(data) => data,
        Err(e) => {
            error!(
                "store file {} is malformed ({}), starting empty; it will be overwritten on the next write",
                path.display(),
                e
            );
            StoreData::default()
        }
    }
}
