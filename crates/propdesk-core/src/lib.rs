//! # Propdesk Core
//!
//! Core types and utilities for the Propdesk API:
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`listing`]: The shared list-query pipeline (filter, search, sort,
//!   paginate, count) every resource module delegates to
//! - [`permissions`]: Role/resource/action vocabulary and effective
//!   capability resolution
//! - [`serde`]: Custom serde deserialization helpers

pub mod errors;
pub mod listing;
pub mod permissions;
pub mod serde;

// Re-export commonly used types at crate root
pub use errors::AppError;
pub use listing::{Collection, FieldKind, FilterField, ListResult, Repository, list_documents};
pub use permissions::{Action, Capabilities, PermissionMap, Resource, Role};
