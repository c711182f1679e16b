//! Backend interfaces consumed by the guard and the dispatcher.
//!
//! The document layout mirrors the remote database:
//! `users/{uid}/categories/{name}/logins/{label}`. Every call is scoped to
//! one user id.

pub mod documents;
pub mod local;
pub mod vault;

use async_trait::async_trait;
use thiserror::Error;

use crate::category::CategoryName;
use crate::registration::{AccountRequest, RegistrationError};

pub use local::LocalStore;
pub use vault::{Vault, VaultError};

/// Failures reported by a category store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("vault error: {0}")]
    Vault(#[from] VaultError),

    #[error("background task failed: {0}")]
    Task(String),
}

/// Category documents and their login subcollections.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Names of the user's categories, in store order.
    async fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryName>, StoreError>;

    /// Whether at least one login exists under the category. Implementations
    /// must answer without enumerating the subcollection.
    async fn has_logins(&self, user_id: &str, category: &CategoryName) -> Result<bool, StoreError>;

    /// Deletes the category document. Deleting an absent category succeeds.
    async fn delete_category(&self, user_id: &str, category: &CategoryName)
    -> Result<(), StoreError>;
}

/// Account creation on the auth provider.
#[async_trait]
pub trait AccountRegistrar: Send + Sync {
    async fn register_account(&self, request: &AccountRequest) -> Result<(), RegistrationError>;
}
