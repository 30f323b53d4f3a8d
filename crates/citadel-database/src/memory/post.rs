use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use citadel_core::error::AppError;
use citadel_core::result::AppResult;
use citadel_core::types::SortField;
use citadel_entity::post::{
    NewPost, POST_SORT_COLUMNS, Post, PostFilter, PostRevision, PostView,
};

use super::{MemoryStore, Tables, contains_ignore_case, sort_rows};
use crate::store::PostStore;

impl Tables {
    fn chain_of(&self, post_id: Uuid) -> Option<Uuid> {
        self.posts
            .iter()
            .find(|p| p.post_id == post_id)
            .map(Post::chain_key)
    }

    fn live_chain(&self, chain_key: Uuid) -> impl Iterator<Item = &Post> {
        self.posts
            .iter()
            .filter(move |p| p.chain_key() == chain_key && !p.is_deleted())
    }

    fn view(&self, post: &Post) -> Option<PostView> {
        self.users.get(&post.user_id).map(|author| PostView {
            post: post.clone(),
            username: author.username.clone(),
            email: author.email.clone(),
        })
    }
}

fn compare(a: &PostView, b: &PostView, column: &str) -> Ordering {
    let (a, b) = (&a.post, &b.post);
    match column {
        "post_id" => a.post_id.cmp(&b.post_id),
        "user_id" => a.user_id.cmp(&b.user_id),
        "title" => a.title.cmp(&b.title),
        "content" => a.content.cmp(&b.content),
        "public" => a.public.cmp(&b.public),
        _ => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn create(&self, data: NewPost) -> AppResult<Post> {
        let post = Post {
            post_id: Uuid::new_v4(),
            original_chain_id: None,
            revision_number: 0,
            user_id: data.user_id,
            title: data.title,
            content: data.content,
            public: data.public,
            created_at: Utc::now(),
            deleted_at: None,
        };
        self.tables.lock().await.posts.push(post.clone());
        Ok(post)
    }

    async fn get_current(&self, post_id: Uuid) -> AppResult<Option<PostView>> {
        let tables = self.tables.lock().await;
        let Some(chain_key) = tables.chain_of(post_id) else {
            return Ok(None);
        };
        Ok(tables
            .live_chain(chain_key)
            .max_by_key(|p| p.revision_number)
            .and_then(|head| tables.view(head)))
    }

    async fn update(&self, post_id: Uuid, revision: PostRevision) -> AppResult<Post> {
        let mut tables = self.tables.lock().await;

        let chain_key = tables
            .chain_of(post_id)
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        let head = tables
            .live_chain(chain_key)
            .max_by_key(|p| p.revision_number)
            .cloned()
            .ok_or_else(|| AppError::not_found("Post not found"))?;
        let author = tables
            .posts
            .iter()
            .find(|p| p.post_id == chain_key)
            .map(|p| p.user_id)
            .ok_or_else(|| AppError::internal("Post chain has no original"))?;
        let max_revision = tables
            .posts
            .iter()
            .filter(|p| p.chain_key() == chain_key)
            .map(|p| p.revision_number)
            .max()
            .unwrap_or(0);

        let post = Post {
            post_id: Uuid::new_v4(),
            original_chain_id: Some(chain_key),
            revision_number: max_revision + 1,
            user_id: author,
            title: revision.title.unwrap_or(head.title),
            content: revision.content.unwrap_or(head.content),
            public: revision.public.unwrap_or(head.public),
            created_at: Utc::now(),
            deleted_at: None,
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn list_revisions(&self, post_id: Uuid) -> AppResult<Vec<PostView>> {
        let tables = self.tables.lock().await;
        let Some(chain_key) = tables.chain_of(post_id) else {
            return Ok(Vec::new());
        };
        let mut revisions: Vec<PostView> = tables
            .live_chain(chain_key)
            .filter_map(|p| tables.view(p))
            .collect();
        revisions.sort_by_key(|v| v.post.revision_number);
        Ok(revisions)
    }

    async fn delete(&self, post_id: Uuid) -> AppResult<u64> {
        let mut tables = self.tables.lock().await;
        let Some(chain_key) = tables.chain_of(post_id) else {
            return Ok(0);
        };

        let now = Utc::now();
        let mut marked = 0;
        for post in tables
            .posts
            .iter_mut()
            .filter(|p| p.chain_key() == chain_key && p.deleted_at.is_none())
        {
            post.deleted_at = Some(now);
            marked += 1;
        }
        Ok(marked)
    }

    async fn list(&self, filter: &PostFilter) -> AppResult<Vec<PostView>> {
        let tables = self.tables.lock().await;

        let mut heads: HashMap<Uuid, &Post> = HashMap::new();
        for post in tables.posts.iter().filter(|p| !p.is_deleted()) {
            heads
                .entry(post.chain_key())
                .and_modify(|head| {
                    if post.revision_number > head.revision_number {
                        *head = post;
                    }
                })
                .or_insert(post);
        }

        let search = filter.search.as_deref().filter(|s| !s.is_empty());
        let mut views: Vec<PostView> = heads
            .into_values()
            .filter(|p| filter.visibility.admits(p.user_id, p.public))
            .filter(|p| search.is_none_or(|s| contains_ignore_case(&p.title, s)))
            .filter(|p| filter.author.is_none_or(|a| p.user_id == a))
            .filter(|p| filter.public.is_none_or(|public| p.public == public))
            .filter_map(|p| tables.view(p))
            .collect();

        sort_rows(
            &mut views,
            &filter.order_by,
            POST_SORT_COLUMNS,
            SortField::desc("created_at"),
            compare,
        )?;
        Ok(views)
    }
}
