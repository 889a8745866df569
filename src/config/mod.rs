//! Configuration modules for the Propdesk API.
//!
//! Each submodule handles one aspect of configuration, loaded from
//! environment variables with development defaults.

pub mod cors;
pub mod database;
pub mod email;
pub mod jwt;
pub mod storage;
