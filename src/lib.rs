//! # Propdesk API
//!
//! A real-estate back-office REST API built with Rust, Axum, and PostgreSQL.
//!
//! ## Overview
//!
//! Propdesk provides the backend for a property management office:
//!
//! - **Authentication**: JWT access tokens, accepted as a bearer header or
//!   an `access_token` cookie
//! - **Capability-based authorization**: a role-level permission table with
//!   per-user overrides, resolved per request; admins bypass the tables
//! - **Resource modules**: properties, owners, clients, contracts, payments,
//!   reminders, media, features, facilities, users
//! - **Shared list pipeline**: every list endpoint supports filtering
//!   (including `field[op]=` comparison operators and date ranges), keyword
//!   search, multi-field sort, field projection, and pagination with
//!   total/filtered counts
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── config/           # Env-driven configuration (db, jwt, email, cors, storage)
//! ├── middleware/       # AuthUser extractor + capability authorization
//! ├── modules/          # Feature modules
//! │   ├── auth/         # Login, logout, password reset
//! │   ├── properties/   # Property listings (media-enriched lists)
//! │   ├── contracts/    # Contracts (signed document URLs)
//! │   ├── payments/     # Payment records
//! │   ├── ...           # owners, clients, reminders, media, features, facilities, users
//! │   ├── role_permissions/  # Role-level permission table (admin only)
//! │   └── user_permissions/  # Per-user overrides (admin only)
//! └── utils/            # Mailer, password hashing, signed URLs
//! ```
//!
//! Each feature module follows a consistent structure: `model.rs` (entity,
//! DTOs), `service.rs` (business logic and SQL), `controller.rs` (handlers),
//! `router.rs` (routes).
//!
//! ## Authorization model
//!
//! Effective permissions are resolved on every request from two tables:
//! `role_permissions` (defaults per role) and `user_permissions` (per-user
//! overrides). An override replaces the role entry for that resource
//! entirely, so a user's access can be narrowed below or widened beyond the
//! role default. Resources absent from both tables are denied. A bootstrap
//! step seeds read-only defaults for every (role, resource) pair and is safe
//! to re-run.

pub mod config;
pub mod docs;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod utils;
pub mod validator;

// Re-export workspace crates for convenience
pub use propdesk_auth;
pub use propdesk_core;
pub use propdesk_db;
