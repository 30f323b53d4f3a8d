//! Shared value types used by list queries.

pub mod sorting;

pub use sorting::{SortDirection, SortField};
