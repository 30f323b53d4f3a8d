//! Revisioned post use cases.

pub mod service;

pub use service::PostService;
