//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use citadel_core::error::AppError;
use citadel_core::types::SortField;
use citadel_entity::post::{POST_SORT_COLUMNS, PostFilter, PostRevision};
use citadel_entity::user::{USER_SORT_COLUMNS, UserFilter, UserRole};

/// Registration body. With HTTP Basic credentials only `username` is
/// read; otherwise `email` and `password` are required too.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username.
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    pub username: String,
    /// Login email.
    #[validate(email(message = "Invalid email address"))]
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Login body, used when no HTTP Basic credentials are sent.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Login email.
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Username change.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    /// New username.
    #[validate(length(min = 1, max = 64, message = "Username is required"))]
    pub username: String,
}

/// Role change (admin).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    /// `admin` or `user`.
    pub role: String,
}

impl UpdateRoleRequest {
    /// The requested role. Unknown names are rejected.
    pub fn role(&self) -> Result<UserRole, AppError> {
        self.role
            .parse()
            .map_err(|_| AppError::validation("Invalid role provided"))
    }
}

/// New post.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreatePostRequest {
    /// Title.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    /// Body.
    #[serde(default)]
    pub content: String,
    /// Visibility.
    #[serde(default)]
    pub public: bool,
}

/// Post edit. Omitted fields keep their current value.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdatePostRequest {
    /// New title.
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: Option<String>,
    /// New body.
    pub content: Option<String>,
    /// New visibility.
    pub public: Option<bool>,
}

impl From<UpdatePostRequest> for PostRevision {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            public: req.public,
        }
    }
}

/// Query string of `GET /users`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserListQuery {
    /// Case-insensitive substring of username or email.
    pub search: Option<String>,
    /// Exact role.
    pub role: Option<String>,
    /// `column:direction` list, comma separated.
    pub order_by: Option<String>,
}

impl UserListQuery {
    /// Validate and convert into a store filter.
    pub fn into_filter(self) -> Result<UserFilter, AppError> {
        let role = self
            .role
            .filter(|r| !r.is_empty())
            .map(|r| r.parse::<UserRole>())
            .transpose()?;
        let order_by = match self.order_by.as_deref() {
            Some(raw) if !raw.is_empty() => SortField::parse_list(raw, USER_SORT_COLUMNS)?,
            _ => Vec::new(),
        };
        Ok(UserFilter {
            search: self.search,
            role,
            order_by,
        })
    }
}

/// Query string of `GET /posts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostListQuery {
    /// Case-insensitive substring of the title.
    pub search: Option<String>,
    /// Restrict to one author.
    pub author: Option<Uuid>,
    /// Restrict to public or private posts.
    pub public: Option<bool>,
    /// `column:direction` list, comma separated.
    pub order_by: Option<String>,
}

impl PostListQuery {
    /// Validate and convert into a store filter. Visibility is set by the
    /// service from the caller, never from the query.
    pub fn into_filter(self) -> Result<PostFilter, AppError> {
        let order_by = match self.order_by.as_deref() {
            Some(raw) if !raw.is_empty() => SortField::parse_list(raw, POST_SORT_COLUMNS)?,
            _ => Vec::new(),
        };
        Ok(PostFilter {
            search: self.search,
            author: self.author,
            public: self.public,
            order_by,
            ..PostFilter::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use citadel_core::error::ErrorKind;
    use citadel_core::types::SortDirection;

    use super::*;

    #[test]
    fn test_post_query_order_by() {
        let query = PostListQuery {
            order_by: Some("title:asc,created_at:DESC".into()),
            ..Default::default()
        };
        let filter = query.into_filter().unwrap();
        assert_eq!(filter.order_by.len(), 2);
        assert_eq!(filter.order_by[1].direction, SortDirection::Desc);

        let bad = PostListQuery {
            order_by: Some("deleted_at:asc".into()),
            ..Default::default()
        };
        assert_eq!(bad.into_filter().unwrap_err().kind, ErrorKind::Validation);
    }

    #[test]
    fn test_user_query_role() {
        let query = UserListQuery {
            role: Some("admin".into()),
            ..Default::default()
        };
        assert_eq!(query.into_filter().unwrap().role, Some(UserRole::Admin));

        let bad = UserListQuery {
            role: Some("root".into()),
            ..Default::default()
        };
        assert!(bad.into_filter().is_err());
    }

    #[test]
    fn test_role_request() {
        let req = UpdateRoleRequest { role: "superuser".into() };
        assert_eq!(req.role().unwrap_err().message, "Invalid role provided");
    }

    #[test]
    fn test_register_validation() {
        let req = RegisterRequest {
            username: String::new(),
            email: Some("alice@x.com".into()),
            password: Some("secret1".into()),
        };
        assert!(req.validate().is_err());

        let req = RegisterRequest {
            username: "alice".into(),
            email: Some("not-an-email".into()),
            password: None,
        };
        assert!(req.validate().is_err());
    }
}
