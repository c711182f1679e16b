//! Account registration dispatcher.
//!
//! Forwards sign-up input to an [`AccountRegistrar`] without validating it
//! and reports the outcome through exactly one of two callbacks.

use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::store::{AccountRegistrar, StoreError};

/// Message used when a registration failure carries none.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Erro desconhecido";

/// Sign-up fields, consumed by one registration attempt.
#[derive(Clone)]
pub struct AccountRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub device_id: String,
}

impl AccountRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        device_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            device_id: device_id.into(),
        }
    }
}

impl fmt::Debug for AccountRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("device_id", &self.device_id)
            .finish()
    }
}

/// A failed registration, with the registrar's message if it gave one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .message.as_deref().unwrap_or(DEFAULT_FAILURE_MESSAGE))]
pub struct RegistrationError {
    pub message: Option<String>,
}

impl RegistrationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn without_message() -> Self {
        Self { message: None }
    }

    /// The message to show the user; blank messages count as missing.
    pub fn user_message(&self, fallback: &str) -> String {
        match self.message.as_deref().map(str::trim) {
            Some(msg) if !msg.is_empty() => msg.to_string(),
            _ => fallback.to_string(),
        }
    }
}

impl From<StoreError> for RegistrationError {
    fn from(err: StoreError) -> Self {
        Self::new(err.to_string())
    }
}

/// Dispatches registration requests on the tokio runtime.
#[derive(Clone)]
pub struct RegistrationDispatcher {
    registrar: Arc<dyn AccountRegistrar>,
    fallback_message: String,
}

impl RegistrationDispatcher {
    pub fn new(registrar: Arc<dyn AccountRegistrar>) -> Self {
        Self {
            registrar,
            fallback_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn with_fallback_message(mut self, message: impl Into<String>) -> Self {
        self.fallback_message = message.into();
        self
    }

    /// Starts a registration and returns immediately.
    ///
    /// Exactly one callback runs, exactly once, on a runtime worker. A
    /// registrar that panics is reported through `on_failure` with the
    /// fallback message.
    pub fn register<S, F>(&self, request: AccountRequest, on_success: S, on_failure: F) -> JoinHandle<()>
    where
        S: FnOnce() + Send + 'static,
        F: FnOnce(String) + Send + 'static,
    {
        let this = self.clone();
        tokio::spawn(async move {
            match this.register_and_wait(request).await {
                Ok(()) => on_success(),
                Err(message) => on_failure(message),
            }
        })
    }

    /// Runs a registration to completion and returns the user-facing
    /// failure message on error.
    pub async fn register_and_wait(&self, request: AccountRequest) -> Result<(), String> {
        log::debug!("Dispatching registration for {}", request.email);
        let registrar = Arc::clone(&self.registrar);
        let email = request.email.clone();

        let attempt = tokio::spawn(async move { registrar.register_account(&request).await });

        match attempt.await {
            Ok(Ok(())) => {
                log::info!("Registered account {}", email);
                Ok(())
            }
            Ok(Err(err)) => {
                log::warn!("Registration of {} failed: {:?}", email, err.message);
                Err(err.user_message(&self.fallback_message))
            }
            Err(join_err) => {
                log::error!("Registration task for {} aborted: {}", email, join_err);
                Err(self.fallback_message.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_prefers_registrar_text() {
        let err = RegistrationError::new("The email address is badly formatted.");
        assert_eq!(
            err.user_message(DEFAULT_FAILURE_MESSAGE),
            "The email address is badly formatted."
        );
    }

    #[test]
    fn test_user_message_falls_back() {
        assert_eq!(
            RegistrationError::without_message().user_message("Erro desconhecido"),
            "Erro desconhecido"
        );
        assert_eq!(
            RegistrationError::new("   ").user_message("fallback"),
            "fallback"
        );
    }

    #[test]
    fn test_display_uses_default_when_empty() {
        assert_eq!(
            RegistrationError::without_message().to_string(),
            DEFAULT_FAILURE_MESSAGE
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        let request = AccountRequest::new("Ana", "a@x.com", "pw123", "IMEI1");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("pw123"));
        assert!(debug.contains("a@x.com"));
    }
}
