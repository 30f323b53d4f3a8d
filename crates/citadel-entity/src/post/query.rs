//! Filters accepted by the post listing.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use citadel_core::types::SortField;

/// Columns the post listing may be ordered by.
pub const POST_SORT_COLUMNS: &[&str] = &[
    "post_id",
    "user_id",
    "title",
    "content",
    "public",
    "created_at",
];

/// Which chains a caller may see at all. Applied before any explicit
/// filter, so a filter can only narrow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    /// Anonymous callers: public posts only.
    #[default]
    PublicOnly,
    /// Authenticated callers: their own posts plus everyone's public posts.
    OwnOrPublic(Uuid),
    /// Moderators: everything that is not deleted.
    All,
}

impl Visibility {
    /// Whether a post with this author and visibility passes.
    pub fn admits(&self, author: Uuid, public: bool) -> bool {
        match self {
            Self::PublicOnly => public,
            Self::OwnOrPublic(viewer) => public || *viewer == author,
            Self::All => true,
        }
    }
}

/// Options for listing posts. Only chain heads are listed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostFilter {
    /// Visibility boundary of the caller.
    pub visibility: Visibility,
    /// Case-insensitive substring matched against the title.
    pub search: Option<String>,
    /// Restrict to one author.
    pub author: Option<Uuid>,
    /// Restrict to public (`true`) or private (`false`) posts.
    pub public: Option<bool>,
    /// Ordering; empty means `created_at DESC`.
    pub order_by: Vec<SortField>,
}
