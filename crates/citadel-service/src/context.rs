//! Request context carrying the authenticated session and, once resolved,
//! its user.

use uuid::Uuid;

use citadel_core::error::AppError;
use citadel_database::store::UserStore;
use citadel_entity::session::Session;
use citadel_entity::user::User;

/// Context for the current authenticated request.
///
/// Attached to the request by the authentication stage and enriched with
/// the [`User`] by the admin stage.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The validated session.
    pub session: Session,
    /// The session's user, if a stage has already loaded it.
    pub user: Option<User>,
}

impl RequestContext {
    /// Creates a context for a validated session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            user: None,
        }
    }

    /// Attaches the resolved user.
    pub fn with_user(mut self, user: User) -> Self {
        self.user = Some(user);
        self
    }

    /// The authenticated user's id.
    pub fn user_id(&self) -> Uuid {
        self.session.user_id
    }

    /// The current session id.
    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    /// The acting user, loaded from `users` unless already attached.
    ///
    /// Roles are read fresh on every request, so a role change takes
    /// effect without revoking sessions.
    pub async fn actor(&self, users: &dyn UserStore) -> Result<User, AppError> {
        if let Some(user) = &self.user {
            return Ok(user.clone());
        }
        users
            .find_by_id(self.user_id())
            .await?
            .ok_or_else(|| AppError::authorization("Forbidden"))
    }
}
