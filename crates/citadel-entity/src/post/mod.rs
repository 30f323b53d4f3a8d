//! Post domain entities.
//!
//! A logical post is a chain of immutable rows. The first row is the
//! chain head (revision 0, `original_chain_id = NULL`); every edit appends
//! a row pointing back at it. The chain key is
//! `COALESCE(original_chain_id, post_id)`.

pub mod model;
pub mod query;

pub use model::{NewPost, Post, PostRevision, PostView};
pub use query::{POST_SORT_COLUMNS, PostFilter, Visibility};
