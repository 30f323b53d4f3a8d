//! In-process store using a Tokio mutex, for tests and single-node
//! development runs (`database.url = "memory"`).
//!
//! Each operation holds the lock for its whole duration, which gives the
//! same atomicity the PostgreSQL transactions provide.

mod post;
mod session;
mod user;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use citadel_core::error::AppError;
use citadel_core::types::{SortDirection, SortField};
use citadel_entity::post::Post;
use citadel_entity::session::Session;
use citadel_entity::user::User;

/// Rows held by the memory store.
#[derive(Debug, Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    sessions: HashMap<String, Session>,
    posts: Vec<Post>,
}

/// In-memory implementation of every store trait.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of session rows, expired ones included.
    pub async fn session_count(&self) -> usize {
        self.tables.lock().await.sessions.len()
    }

    /// Number of post rows, deleted ones included.
    pub async fn post_row_count(&self) -> usize {
        self.tables.lock().await.posts.len()
    }
}

/// Sort `rows` by `order_by`, falling back to `default` when it is empty.
/// `compare` orders two rows by one named column.
fn sort_rows<T>(
    rows: &mut [T],
    order_by: &[SortField],
    allowed: &[&str],
    default: SortField,
    compare: impl Fn(&T, &T, &str) -> Ordering,
) -> Result<(), AppError> {
    for sort in order_by {
        if !allowed.contains(&sort.field.as_str()) {
            return Err(AppError::validation(format!(
                "invalid column name: {}",
                sort.field
            )));
        }
    }

    let fallback = [default];
    let order = if order_by.is_empty() {
        &fallback[..]
    } else {
        order_by
    };

    rows.sort_by(|a, b| {
        order
            .iter()
            .map(|sort| {
                let ordering = compare(a, b, &sort.field);
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            })
            .find(|o| o.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    Ok(())
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
