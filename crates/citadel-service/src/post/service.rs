//! Revisioned post operations with visibility and ownership rules.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use citadel_core::error::AppError;
use citadel_database::store::{PostStore, UserStore};
use citadel_entity::post::{NewPost, Post, PostFilter, PostRevision, PostView, Visibility};
use citadel_entity::user::{Capability, User};

use crate::context::RequestContext;

/// Handles post creation, editing, deletion and listing.
#[derive(Clone)]
pub struct PostService {
    /// Post persistence.
    posts: Arc<dyn PostStore>,
    /// User lookup for the acting user's role.
    users: Arc<dyn UserStore>,
}

impl std::fmt::Debug for PostService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostService").finish_non_exhaustive()
    }
}

/// The visibility boundary for reading a single chain.
///
/// Moderators may open any chain by id; listings never widen for them.
fn visibility_for(viewer: Option<&User>) -> Visibility {
    match viewer {
        None => Visibility::PublicOnly,
        Some(user) if user.can(Capability::ModerateAnyPost) => Visibility::All,
        Some(user) => Visibility::OwnOrPublic(user.user_id),
    }
}

impl PostService {
    /// Creates a new post service.
    pub fn new(posts: Arc<dyn PostStore>, users: Arc<dyn UserStore>) -> Self {
        Self { posts, users }
    }

    async fn viewer(&self, ctx: Option<&RequestContext>) -> Result<Option<User>, AppError> {
        match ctx {
            Some(ctx) => ctx.actor(self.users.as_ref()).await.map(Some),
            None => Ok(None),
        }
    }

    /// Starts a new chain authored by the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        title: String,
        content: String,
        public: bool,
    ) -> Result<Post, AppError> {
        if title.trim().is_empty() {
            return Err(AppError::validation("Title is required"));
        }

        let post = self
            .posts
            .create(NewPost {
                user_id: ctx.user_id(),
                title,
                content,
                public,
            })
            .await?;

        info!(post_id = %post.post_id, user_id = %post.user_id, "Post created");
        Ok(post)
    }

    /// Current head of a chain, if the caller may see it.
    ///
    /// Invisible posts are reported exactly like missing ones.
    pub async fn get(
        &self,
        ctx: Option<&RequestContext>,
        post_id: Uuid,
    ) -> Result<PostView, AppError> {
        let viewer = self.viewer(ctx).await?;
        let visibility = visibility_for(viewer.as_ref());

        self.posts
            .get_current(post_id)
            .await?
            .filter(|view| visibility.admits(view.post.user_id, view.post.public))
            .ok_or_else(|| AppError::not_found("Post not found"))
    }

    /// Appends a revision. Only the author or a moderator may edit.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        post_id: Uuid,
        revision: PostRevision,
    ) -> Result<Post, AppError> {
        if revision.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(AppError::validation("Title is required"));
        }

        self.authorize_write(ctx, post_id).await?;
        let post = self.posts.update(post_id, revision).await?;

        info!(
            post_id = %post.post_id,
            chain = %post.chain_key(),
            revision = post.revision_number,
            by = %ctx.user_id(),
            "Post revised"
        );
        Ok(post)
    }

    /// Soft-deletes a whole chain. Only the author or a moderator may delete.
    pub async fn delete(&self, ctx: &RequestContext, post_id: Uuid) -> Result<(), AppError> {
        self.authorize_write(ctx, post_id).await?;

        let removed = self.posts.delete(post_id).await?;
        if removed == 0 {
            return Err(AppError::not_found("Post not found"));
        }

        info!(post_id = %post_id, rows = removed, by = %ctx.user_id(), "Post deleted");
        Ok(())
    }

    /// Revisions of a visible chain, oldest first.
    pub async fn revisions(
        &self,
        ctx: Option<&RequestContext>,
        post_id: Uuid,
    ) -> Result<Vec<PostView>, AppError> {
        self.get(ctx, post_id).await?;
        self.posts.list_revisions(post_id).await
    }

    /// Current heads visible to the caller: the caller's own posts plus
    /// every public post, whatever the caller's role. Explicit filters can
    /// only narrow this.
    pub async fn list(
        &self,
        ctx: Option<&RequestContext>,
        mut filter: PostFilter,
    ) -> Result<Vec<PostView>, AppError> {
        filter.visibility = match ctx {
            Some(ctx) => Visibility::OwnOrPublic(ctx.user_id()),
            None => Visibility::PublicOnly,
        };
        self.posts.list(&filter).await
    }

    async fn authorize_write(&self, ctx: &RequestContext, post_id: Uuid) -> Result<(), AppError> {
        let head = self
            .posts
            .get_current(post_id)
            .await?
            .ok_or_else(|| AppError::not_found("Post not found"))?;

        if head.post.user_id == ctx.user_id() {
            return Ok(());
        }
        let actor = ctx.actor(self.users.as_ref()).await?;
        if actor.can(Capability::ModerateAnyPost) {
            return Ok(());
        }
        Err(AppError::authorization("You can only modify your own posts"))
    }
}
