//! User domain entities.

pub mod model;
pub mod query;
pub mod role;

pub use model::{CreateUser, User};
pub use query::{USER_SORT_COLUMNS, UserFilter};
pub use role::{Capability, UserRole};
