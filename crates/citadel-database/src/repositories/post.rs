//! Revisioned post repository implementation.
//!
//! Every row belongs to a chain identified by
//! `COALESCE(original_chain_id, post_id)`. Reads resolve the chain from
//! whichever member id the caller passed.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use citadel_core::error::{AppError, ErrorKind};
use citadel_core::result::AppResult;
use citadel_entity::post::{
    NewPost, POST_SORT_COLUMNS, Post, PostFilter, PostRevision, PostView, Visibility,
};

use super::{like_pattern, push_order_by};
use crate::store::PostStore;

const CHAIN_OF: &str = "(SELECT COALESCE(original_chain_id, post_id) FROM posts WHERE post_id = $1)";

/// Repository for revisioned posts.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: PgPool,
}

impl PostRepository {
    /// Create a new post repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_err(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

#[async_trait]
impl PostStore for PostRepository {
    async fn create(&self, data: NewPost) -> AppResult<Post> {
        sqlx::query_as::<_, Post>(
            "INSERT INTO posts (post_id, original_chain_id, revision_number, user_id, title, content, public) \
             VALUES ($1, NULL, 0, $2, $3, $4, $5) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(data.user_id)
        .bind(&data.title)
        .bind(&data.content)
        .bind(data.public)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err("Failed to create post"))
    }

    async fn get_current(&self, post_id: Uuid) -> AppResult<Option<PostView>> {
        let sql = format!(
            "SELECT p.*, u.username, u.email \
             FROM posts p JOIN users u ON u.user_id = p.user_id \
             WHERE COALESCE(p.original_chain_id, p.post_id) = {CHAIN_OF} \
               AND p.deleted_at IS NULL \
             ORDER BY p.revision_number DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, PostView>(&sql)
            .bind(post_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err("Failed to find post"))
    }

    async fn update(&self, post_id: Uuid, revision: PostRevision) -> AppResult<Post> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_err("Failed to begin transaction"))?;

        let chain_key = sqlx::query_scalar::<_, Uuid>(
            "SELECT COALESCE(original_chain_id, post_id) FROM posts WHERE post_id = $1",
        )
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to resolve post chain"))?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

        // Serializes writers of one chain until commit.
        let author = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM posts WHERE post_id = $1 FOR UPDATE",
        )
        .bind(chain_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to lock post chain"))?;

        let head = sqlx::query_as::<_, Post>(
            "SELECT * FROM posts \
             WHERE COALESCE(original_chain_id, post_id) = $1 AND deleted_at IS NULL \
             ORDER BY revision_number DESC \
             LIMIT 1",
        )
        .bind(chain_key)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_err("Failed to read current revision"))?
        .ok_or_else(|| AppError::not_found("Post not found"))?;

        // Deleted rows still hold their revision numbers.
        let max_revision = sqlx::query_scalar::<_, i32>(
            "SELECT COALESCE(MAX(revision_number), 0) FROM posts \
             WHERE COALESCE(original_chain_id, post_id) = $1",
        )
        .bind(chain_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_err("Failed to read revision number"))?;

        let created = sqlx::query_as::<_, Post>(
            "INSERT INTO posts (post_id, original_chain_id, revision_number, user_id, title, content, public) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(chain_key)
        .bind(max_revision + 1)
        .bind(author)
        .bind(revision.title.unwrap_or(head.title))
        .bind(revision.content.unwrap_or(head.content))
        .bind(revision.public.unwrap_or(head.public))
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref err)
                if err.constraint() == Some("posts_chain_revision_key") =>
            {
                AppError::conflict("Post was modified concurrently")
            }
            _ => AppError::with_source(ErrorKind::Database, "Failed to insert revision", e),
        })?;

        tx.commit()
            .await
            .map_err(db_err("Failed to commit revision"))?;

        Ok(created)
    }

    async fn list_revisions(&self, post_id: Uuid) -> AppResult<Vec<PostView>> {
        let sql = format!(
            "SELECT p.*, u.username, u.email \
             FROM posts p JOIN users u ON u.user_id = p.user_id \
             WHERE COALESCE(p.original_chain_id, p.post_id) = {CHAIN_OF} \
               AND p.deleted_at IS NULL \
             ORDER BY p.revision_number ASC"
        );
        sqlx::query_as::<_, PostView>(&sql)
            .bind(post_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list revisions"))
    }

    async fn delete(&self, post_id: Uuid) -> AppResult<u64> {
        let sql = format!(
            "UPDATE posts SET deleted_at = NOW() \
             WHERE COALESCE(original_chain_id, post_id) = {CHAIN_OF} \
               AND deleted_at IS NULL"
        );
        let result = sqlx::query(&sql)
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(db_err("Failed to delete post"))?;
        Ok(result.rows_affected())
    }

    async fn list(&self, filter: &PostFilter) -> AppResult<Vec<PostView>> {
        let mut qb = QueryBuilder::<Postgres>::new(
            "SELECT h.*, u.username, u.email FROM (\
               SELECT DISTINCT ON (COALESCE(original_chain_id, post_id)) * \
               FROM posts WHERE deleted_at IS NULL \
               ORDER BY COALESCE(original_chain_id, post_id), revision_number DESC\
             ) h JOIN users u ON u.user_id = h.user_id WHERE TRUE",
        );

        match filter.visibility {
            Visibility::PublicOnly => {
                qb.push(" AND h.public");
            }
            Visibility::OwnOrPublic(viewer) => {
                qb.push(" AND (h.public OR h.user_id = ")
                    .push_bind(viewer)
                    .push(")");
            }
            Visibility::All => {}
        }
        if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
            qb.push(" AND LOWER(h.title) LIKE ")
                .push_bind(like_pattern(search));
        }
        if let Some(author) = filter.author {
            qb.push(" AND h.user_id = ").push_bind(author);
        }
        if let Some(public) = filter.public {
            qb.push(" AND h.public = ").push_bind(public);
        }
        push_order_by(
            &mut qb,
            &filter.order_by,
            POST_SORT_COLUMNS,
            "h.",
            "h.created_at DESC",
        )?;

        qb.build_query_as::<PostView>()
            .fetch_all(&self.pool)
            .await
            .map_err(db_err("Failed to list posts"))
    }
}
