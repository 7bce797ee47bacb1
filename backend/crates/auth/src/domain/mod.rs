pub mod authenticator;
pub mod entity;
pub mod repository;
pub mod value_object;
