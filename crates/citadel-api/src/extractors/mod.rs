//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;
pub mod query;

pub use auth::{Authenticated, MaybeAuthenticated};
pub use json::{ValidJson, parse_json};
pub use path::parse_uuid;
pub use query::QueryParams;
