//! # Propdesk Auth
//!
//! JWT claims and token creation/verification for the Propdesk API.

pub mod claims;
pub mod jwt;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
