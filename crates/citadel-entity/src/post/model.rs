//! Post entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One immutable revision of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Post {
    /// Identifier of this revision row.
    pub post_id: Uuid,
    /// Chain key of the original post; `None` on the original itself.
    pub original_chain_id: Option<Uuid>,
    /// 0 for the original, `max + 1` for each edit.
    pub revision_number: i32,
    /// Author of the whole chain.
    pub user_id: Uuid,
    /// Title at this revision.
    pub title: String,
    /// Body at this revision.
    pub content: String,
    /// Visibility at this revision.
    pub public: bool,
    /// When this revision was written.
    pub created_at: DateTime<Utc>,
    /// Soft-delete marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    /// Identifier shared by every revision in this post's chain.
    pub fn chain_key(&self) -> Uuid {
        self.original_chain_id.unwrap_or(self.post_id)
    }

    /// Whether this row is the original of its chain.
    pub fn is_original(&self) -> bool {
        self.original_chain_id.is_none()
    }

    /// Whether this row has been soft-deleted.
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A post revision joined with its author's public profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct PostView {
    /// The revision itself.
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub post: Post,
    /// Author's username.
    pub username: String,
    /// Author's email.
    pub email: String,
}

/// Input for creating a new chain.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Author.
    pub user_id: Uuid,
    /// Title.
    pub title: String,
    /// Body.
    pub content: String,
    /// Visibility.
    pub public: bool,
}

/// Input for appending a revision. Omitted fields carry over from the
/// chain's current head.
#[derive(Debug, Clone, Default)]
pub struct PostRevision {
    /// New title.
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New visibility.
    pub public: Option<bool>,
}
