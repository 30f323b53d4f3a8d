use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use citadel_core::error::AppError;
use citadel_core::result::AppResult;
use citadel_core::types::SortField;
use citadel_entity::user::{CreateUser, USER_SORT_COLUMNS, User, UserFilter, UserRole};

use super::{MemoryStore, contains_ignore_case, sort_rows};
use crate::store::UserStore;

fn compare(a: &User, b: &User, column: &str) -> Ordering {
    match column {
        "user_id" => a.user_id.cmp(&b.user_id),
        "username" => a.username.cmp(&b.username),
        "email" => a.email.cmp(&b.email),
        "role" => a.role.as_str().cmp(b.role.as_str()),
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        _ => a.created_at.cmp(&b.created_at),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, data: CreateUser) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if tables.users.values().any(|u| u.username == data.username) {
            return Err(AppError::conflict("Username is already taken"));
        }
        if tables.users.values().any(|u| u.email == data.email) {
            return Err(AppError::conflict("Email is already registered"));
        }

        let now = Utc::now();
        let user = User {
            user_id: Uuid::new_v4(),
            username: data.username,
            email: data.email,
            password_hash: data.password_hash,
            salt: data.salt,
            role: data.role,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, user_id: Uuid) -> AppResult<Option<User>> {
        Ok(self.tables.lock().await.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn username_taken(&self, username: &str) -> AppResult<bool> {
        let tables = self.tables.lock().await;
        Ok(tables.users.values().any(|u| u.username == username))
    }

    async fn list(&self, filter: &UserFilter) -> AppResult<Vec<User>> {
        let tables = self.tables.lock().await;
        let search = filter.search.as_deref().filter(|s| !s.is_empty());

        let mut users: Vec<User> = tables
            .users
            .values()
            .filter(|u| {
                search.is_none_or(|s| {
                    contains_ignore_case(&u.username, s) || contains_ignore_case(&u.email, s)
                })
            })
            .filter(|u| filter.role.is_none_or(|r| u.role == r))
            .cloned()
            .collect();

        sort_rows(
            &mut users,
            &filter.order_by,
            USER_SORT_COLUMNS,
            SortField::desc("created_at"),
            compare,
        )?;
        Ok(users)
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> AppResult<User> {
        let mut tables = self.tables.lock().await;

        if tables
            .users
            .values()
            .any(|u| u.username == username && u.user_id != user_id)
        {
            return Err(AppError::conflict("Username is already taken"));
        }

        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.username = username.to_string();
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn update_role(&self, user_id: Uuid, role: UserRole) -> AppResult<User> {
        let mut tables = self.tables.lock().await;
        let user = tables
            .users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::not_found("User not found"))?;
        user.role = role;
        user.updated_at = Utc::now();
        Ok(user.clone())
    }
}

#[cfg(test)]
mod tests {
    use citadel_core::error::ErrorKind;

    use super::*;

    fn new_user(username: &str, email: &str) -> CreateUser {
        CreateUser {
            username: username.into(),
            email: email.into(),
            password_hash: "aGFzaA==".into(),
            salt: vec![1; 32],
            role: UserRole::User,
        }
    }

    #[tokio::test]
    async fn test_duplicates_conflict() {
        let store = MemoryStore::new();
        store.create(new_user("alice", "a@x.com")).await.unwrap();

        let err = store.create(new_user("alice", "b@x.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message, "Username is already taken");

        let err = store.create(new_user("bob", "a@x.com")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_list_search_role_and_order() {
        let store = MemoryStore::new();
        let carol = store.create(new_user("carol", "carol@x.com")).await.unwrap();
        store.create(new_user("alice", "alice@x.com")).await.unwrap();
        store.create(new_user("bob", "bob@y.com")).await.unwrap();
        store.update_role(carol.user_id, UserRole::Admin).await.unwrap();

        let filter = UserFilter {
            search: Some("X.COM".into()),
            order_by: vec![SortField::asc("username")],
            ..Default::default()
        };
        let names: Vec<_> = store
            .list(&filter)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, ["alice", "carol"]);

        let admins = UserFilter {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        let found = store.list(&admins).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].user_id, carol.user_id);
    }

    #[tokio::test]
    async fn test_update_username() {
        let store = MemoryStore::new();
        let alice = store.create(new_user("alice", "a@x.com")).await.unwrap();
        store.create(new_user("bob", "b@x.com")).await.unwrap();

        let err = store.update_username(alice.user_id, "bob").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);

        // Renaming to the current name is not a conflict.
        store.update_username(alice.user_id, "alice").await.unwrap();

        let renamed = store.update_username(alice.user_id, "alicia").await.unwrap();
        assert_eq!(renamed.username, "alicia");
        assert!(store.username_taken("alicia").await.unwrap());
        assert!(!store.username_taken("alice").await.unwrap());

        let err = store.update_username(Uuid::new_v4(), "x").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }
}
