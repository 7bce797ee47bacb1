//! Platform Crate - Technical Infrastructure
//!
//! This crate provides shared technical foundations:
//! - Password hashing (Argon2id, configurable work factor)
//! - Cookie management
//! - Clock and identifier generation ports for deterministic tests

pub mod clock;
pub mod cookie;
pub mod idgen;
pub mod password;
