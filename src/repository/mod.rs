//! Persistence layer for the User resource.

pub mod entities;
mod user_repository;

pub use user_repository::{RepoError, RepoResult, UserRepository, UserStore};

#[cfg(any(test, feature = "test-utils"))]
pub use user_repository::MockUserRepository;
