//! Application Layer
//!
//! Use cases orchestrating domain objects through the repository and
//! authenticator ports.

pub mod config;
pub mod create_user;
pub mod current_user;
pub mod login;
pub mod logout;
