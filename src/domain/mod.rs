//! Core business entities and input validation.

pub mod user;

pub use user::{violation_messages, User, UserInput, UserRecord};
