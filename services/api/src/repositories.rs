//! Credential store: the persisted table of users
//!
//! Handlers talk to the [`UserStore`] trait so the HTTP layer can be driven
//! against any backing store; [`UserRepository`] is the PostgreSQL one.

use async_trait::async_trait;
use common::error::DatabaseError;
use thiserror::Error;

use crate::models::{NewUser, UpdateUser, User};

pub mod user;

pub use user::UserRepository;

/// Errors raised by a credential store
#[derive(Debug, Error)]
pub enum StoreError {
    /// Another user already owns this email
    #[error("Email already registered")]
    DuplicateEmail,

    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// Operations on persisted users
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, failing with [`StoreError::DuplicateEmail`] when the
    /// email is taken
    async fn create(&self, new_user: &NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Users ordered by id
    async fn list(&self, skip: i64, limit: i64) -> Result<Vec<User>, StoreError>;

    /// Apply profile changes; `None` when the user does not exist
    async fn update_profile(
        &self,
        id: i64,
        update: &UpdateUser,
    ) -> Result<Option<User>, StoreError>;

    /// Replace the password digest; `None` when the user does not exist
    async fn update_password(
        &self,
        id: i64,
        password_hash: &str,
    ) -> Result<Option<User>, StoreError>;
}
