//! Value Objects
//!
//! Validated domain primitives. Construction is the validation point;
//! `from_db` constructors skip it for values already persisted.

pub mod email;
pub mod user_id;
pub mod user_name;
pub mod user_password;
