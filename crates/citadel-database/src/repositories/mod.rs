//! PostgreSQL implementations of the store traits.

pub mod post;
pub mod session;
pub mod user;

pub use post::PostRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use sqlx::{Postgres, QueryBuilder};

use citadel_core::error::AppError;
use citadel_core::types::SortField;

/// Build a `LIKE` pattern for a case-insensitive substring match against
/// a lowercased column. Wildcards in the input match literally.
pub(crate) fn like_pattern(search: &str) -> String {
    let escaped = search
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

/// Append an `ORDER BY` clause. Columns are checked against `allowed`
/// again here because they are spliced into the SQL text.
pub(crate) fn push_order_by(
    qb: &mut QueryBuilder<'_, Postgres>,
    order_by: &[SortField],
    allowed: &[&str],
    prefix: &str,
    default: &str,
) -> Result<(), AppError> {
    qb.push(" ORDER BY ");
    if order_by.is_empty() {
        qb.push(default);
        return Ok(());
    }

    let mut columns = qb.separated(", ");
    for sort in order_by {
        if !allowed.contains(&sort.field.as_str()) {
            return Err(AppError::validation(format!(
                "invalid column name: {}",
                sort.field
            )));
        }
        columns.push(format!("{prefix}{} {}", sort.field, sort.direction.as_sql()));
    }
    Ok(())
}
