//! # citadel-service
//!
//! Business logic service layer for Citadel. Each service orchestrates the
//! stores and the auth primitives to implement one family of use cases.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references.

pub mod context;
pub mod post;
pub mod user;

pub use context::RequestContext;
pub use post::PostService;
pub use user::{Registration, UserService};
