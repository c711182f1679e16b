//! Session host wiring the store, the listing, the deletion guard and the
//! registration dispatcher together for one user at a time.

use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::category::{CategoryName, CategoryNameError};
use crate::config::AppConfig;
use crate::guard::{DeleteOutcome, DeletionGuard};
use crate::listing::CategoryListing;
use crate::registration::{AccountRequest, RegistrationDispatcher};
use crate::store::{CategoryStore, LocalStore, StoreError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("not signed in")]
    NotSignedIn,

    #[error(transparent)]
    InvalidName(#[from] CategoryNameError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedIn {
    pub user_id: String,
    pub email: String,
}

struct Session {
    user: SignedIn,
    guard: DeletionGuard,
}

pub struct App {
    store: Arc<LocalStore>,
    dispatcher: RegistrationDispatcher,
    listing: CategoryListing,
    device_id: String,
    session: Option<Session>,
}

impl App {
    pub fn new(store: Arc<LocalStore>, config: &AppConfig) -> Self {
        let dispatcher = RegistrationDispatcher::new(store.clone())
            .with_fallback_message(config.unknown_error_message.clone());
        Self {
            store,
            dispatcher,
            listing: CategoryListing::new(),
            device_id: config.device_id().to_string(),
            session: None,
        }
    }

    pub fn listing(&self) -> &CategoryListing {
        &self.listing
    }

    pub fn store(&self) -> &Arc<LocalStore> {
        &self.store
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn current_user(&self) -> Option<&SignedIn> {
        self.session.as_ref().map(|s| &s.user)
    }

    fn session(&self) -> Result<&Session, AppError> {
        self.session.as_ref().ok_or(AppError::NotSignedIn)
    }

    /// Signs in and loads the user's categories into the listing. On any
    /// failure the previous session and listing are left as they were.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<usize, AppError> {
        let user_id = self.store.sign_in(email, password).await?;
        let names = self.store.list_categories(&user_id).await?;

        let store: Arc<dyn CategoryStore> = self.store.clone();
        self.listing.replace_all(names);
        self.session = Some(Session {
            guard: DeletionGuard::new(store, user_id.clone(), self.listing.clone()),
            user: SignedIn {
                user_id,
                email: email.trim().to_string(),
            },
        });
        Ok(self.listing.len())
    }

    pub fn sign_out(&mut self) -> Option<SignedIn> {
        self.listing.clear();
        self.session.take().map(|s| s.user)
    }

    /// Reloads the listing from the store. Returns the number of categories.
    pub async fn refresh(&self) -> Result<usize, AppError> {
        let session = self.session()?;
        let names = self.store.list_categories(&session.user.user_id).await?;
        self.listing.replace_all(names);
        Ok(self.listing.len())
    }

    /// Creates a category and lists it. Returns `false` if it already existed.
    pub async fn add_category(&self, name: &str) -> Result<bool, AppError> {
        let session = self.session()?;
        let name = CategoryName::new(name)?;
        let created = self
            .store
            .create_category(&session.user.user_id, &name)
            .await?;
        self.listing.insert(name);
        Ok(created)
    }

    pub async fn save_login(
        &self,
        category: &str,
        label: &str,
        username: &str,
        secret: &str,
    ) -> Result<(), AppError> {
        let session = self.session()?;
        let category = CategoryName::new(category)?;
        self.store
            .save_login(&session.user.user_id, &category, label, username, secret)
            .await?;
        Ok(())
    }

    pub async fn remove_login(&self, category: &str, label: &str) -> Result<bool, AppError> {
        let session = self.session()?;
        let category = CategoryName::new(category)?;
        Ok(self
            .store
            .remove_login(&session.user.user_id, &category, label)
            .await?)
    }

    pub async fn list_logins(&self, category: &str) -> Result<Vec<String>, AppError> {
        let session = self.session()?;
        let category = CategoryName::new(category)?;
        Ok(self
            .store
            .list_logins(&session.user.user_id, &category)
            .await?)
    }

    pub async fn request_delete(&self, category: &str) -> Result<DeleteOutcome, AppError> {
        let session = self.session()?;
        let category = CategoryName::new(category)?;
        Ok(session.guard.request_delete(&category).await)
    }

    /// Starts a registration with this device's identifier. Must be called
    /// from within a tokio runtime.
    pub fn sign_up<S, F>(
        &self,
        name: &str,
        email: &str,
        password: &str,
        on_success: S,
        on_failure: F,
    ) -> JoinHandle<()>
    where
        S: FnOnce() + Send + 'static,
        F: FnOnce(String) + Send + 'static,
    {
        let request = AccountRequest::new(name, email, password, self.device_id.as_str());
        self.dispatcher.register(request, on_success, on_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::RejectReason;
    use std::sync::mpsc;

    fn test_config() -> AppConfig {
        AppConfig {
            device_id: Some("IMEI1".to_string()),
            ..Default::default()
        }
    }

    async fn signed_up_app() -> App {
        let mut app = App::new(Arc::new(LocalStore::in_memory()), &test_config());
        let (tx, rx) = mpsc::channel();
        let fail_tx = tx.clone();
        app.sign_up(
            "Ana",
            "a@x.com",
            "pw123456",
            move || tx.send(Ok(())).unwrap(),
            move |msg| fail_tx.send(Err(msg)).unwrap(),
        )
        .await
        .unwrap();
        assert_eq!(rx.try_recv().unwrap(), Ok(()));

        app.sign_in("a@x.com", "pw123456").await.unwrap();
        app
    }

    #[tokio::test]
    async fn test_requires_sign_in() {
        let app = App::new(Arc::new(LocalStore::in_memory()), &test_config());
        assert!(matches!(app.refresh().await, Err(AppError::NotSignedIn)));
        assert!(matches!(
            app.request_delete("Email").await,
            Err(AppError::NotSignedIn)
        ));
    }

    #[tokio::test]
    async fn test_sign_in_loads_listing() {
        let app = signed_up_app().await;
        assert_eq!(app.listing().names(), vec!["WebSite"]);
        assert_eq!(app.current_user().unwrap().email, "a@x.com");
    }

    #[tokio::test]
    async fn test_delete_flow_through_store() {
        let app = signed_up_app().await;
        assert!(app.add_category("Email").await.unwrap());
        app.save_login("Email", "gmail", "ana", "s3cret").await.unwrap();

        assert_eq!(
            app.request_delete("Email").await.unwrap(),
            DeleteOutcome::Rejected(RejectReason::HasDependents)
        );

        assert!(app.remove_login("Email", "gmail").await.unwrap());
        assert_eq!(
            app.request_delete("Email").await.unwrap(),
            DeleteOutcome::Deleted
        );
        assert_eq!(app.listing().names(), vec!["WebSite"]);

        assert_eq!(
            app.request_delete("WebSite").await.unwrap(),
            DeleteOutcome::Rejected(RejectReason::ReservedCategory)
        );
    }

    #[tokio::test]
    async fn test_sign_out_clears_listing() {
        let mut app = signed_up_app().await;
        assert!(app.sign_out().is_some());
        assert!(app.listing().is_empty());
        assert!(app.current_user().is_none());
    }

    #[tokio::test]
    async fn test_failed_sign_in_keeps_previous_state() {
        let mut app = signed_up_app().await;
        app.add_category("Email").await.unwrap();

        assert!(matches!(
            app.sign_in("a@x.com", "wrong-password").await,
            Err(AppError::Store(StoreError::InvalidCredentials))
        ));
        assert_eq!(app.current_user().unwrap().email, "a@x.com");
        assert_eq!(app.listing().names(), vec!["WebSite", "Email"]);

        app.sign_out();
        assert!(app.sign_in("nobody@x.com", "pw123456").await.is_err());
        assert!(app.current_user().is_none());
        assert!(app.listing().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_category_name() {
        let app = signed_up_app().await;
        assert!(matches!(
            app.add_category("  ").await,
            Err(AppError::InvalidName(_))
        ));
    }
}
