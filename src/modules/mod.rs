//! Feature modules, one per resource. Each module follows the same layout:
//! `model.rs` (entity + DTOs), `service.rs` (business logic and SQL),
//! `controller.rs` (HTTP handlers), `router.rs` (route table).

pub mod auth;
pub mod clients;
pub mod contracts;
pub mod facilities;
pub mod features;
pub mod media;
pub mod owners;
pub mod payments;
pub mod properties;
pub mod reminders;
pub mod role_permissions;
pub mod user_permissions;
pub mod users;
