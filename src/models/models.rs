use serde::{Serialize, Deserialize};

pub type PostId = u64;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub posts: Vec<Post>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Post {
    pub id: PostId,
    #[serde(rename = "post")]
    pub text: String,
    pub likes: u64,
    pub dislikes: u64,
    pub author: String,
}

/// The whole durable document, as written to the data file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreData {
    #[serde(rename = "userData", default)]
    pub user_data: Vec<User>,
    /// Next id to hand out. Zero means "derive from the highest id on disk".
    #[serde(rename = "nextPostId", default)]
    pub next_post_id: PostId,
}

impl StoreData {
    pub fn user(&self, username: &str) -> Option<&User> {
        self.user_data.iter().find(|u| u.username == username)
    }

    pub fn user_mut(&mut self, username: &str) -> Option<&mut User> {
        self.user_data.iter_mut().find(|u| u.username == username)
    }

    pub fn posts(&self) -> impl Iterator<Item = &Post> {
        self.user_data.iter().flat_map(|u| u.posts.iter())
    }

    pub fn post_mut(&mut self, post_id: PostId) -> Option<&mut Post> {
        self.user_data
            .iter_mut()
            .flat_map(|u| u.posts.iter_mut())
            .find(|p| p.id == post_id)
    }

    pub fn max_post_id(&self) -> PostId {
        self.posts().map(|p| p.id).max().unwrap_or(0)
    }

    /// Reserves and returns the next post id, advancing the counter.
    /// `None` once the id space is used up.
    pub fn allocate_post_id(&mut self) -> Option<PostId> {
        let floor = self.max_post_id().checked_add(1)?;
        let id = self.next_post_id.max(floor);
        self.next_post_id = id.checked_add(1)?;
        Some(id)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vote {
    Up,
    Down,
}

#[derive(Clone, Debug)]
pub struct TokenData {
    pub username: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Envelope for every HTTP response: a success flag, a message, and an
/// optional payload.
#[derive(Serialize, Debug)]
pub struct Outcome<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Outcome<T> {
    pub fn ok(message: impl Into<String>, data: Option<T>) -> Self {
        Self { success: true, message: message.into(), data }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), data: None }
    }
}
