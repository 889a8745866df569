//! Request middleware and extractors.
//!
//! - [`auth`]: JWT authentication (bearer header or `access_token` cookie)
//! - [`authorize`]: capability resolution and per-(resource, action)
//!   authorization extractors
//!
//! Flow: the `AuthUser` extractor establishes the principal; a
//! `Require<Resource><Action>` extractor then resolves the principal's
//! effective capabilities from the permission tables and either admits the
//! request or rejects with 403. The resolved capability set is attached to
//! request extensions for handlers that need further checks.

pub mod auth;
pub mod authorize;
