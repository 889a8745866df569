//! Shared utilities:
//!
//! - [`email`]: SMTP mailer for password-reset and reminder notifications
//! - [`password`]: bcrypt hashing and verification
//! - [`signed_url`]: expiring HMAC-signed URLs for stored files

pub mod email;
pub mod password;
pub mod signed_url;
