//! SuperID - category management and sign-up for a password manager.
//!
//! The library holds the category deletion guard, the registration
//! dispatcher, the backend traits they run against, a local encrypted
//! document store implementing those traits, and a rustyline shell.

pub mod app;
pub mod category;
pub mod config;
pub mod crypto;
pub mod guard;
pub mod listing;
pub mod logging;
pub mod registration;
pub mod shell;
pub mod store;

// Re-export commonly used types
pub use app::{App, AppError};
pub use category::{Category, CategoryName, ProtectedCategory};
pub use config::AppConfig;
pub use guard::{DeleteOutcome, DeletionGuard, FailureReason, RejectReason};
pub use listing::CategoryListing;
pub use logging::{LogConfig, init_logging};
pub use registration::{AccountRequest, RegistrationDispatcher, RegistrationError};
pub use shell::Shell;
pub use store::{AccountRegistrar, CategoryStore, LocalStore, StoreError};
