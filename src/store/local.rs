//! In-process document store backed by an optional encrypted vault.
//!
//! Implements both backend traits, so the whole application can run
//! without a remote database. Writes are applied to a copy of the tree,
//! persisted, and only then made visible; a failed save leaves the store
//! unchanged.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::category::{CategoryName, ProtectedCategory};
use crate::crypto::{self, PasswordDigest};
use crate::registration::{AccountRequest, RegistrationError};
use crate::store::documents::{CategoryDocument, Documents, LoginDocument, UserDocument};
use crate::store::vault::Vault;
use crate::store::{AccountRegistrar, CategoryStore, StoreError};

const MIN_PASSWORD_LEN: usize = 6;

pub struct LocalStore {
    documents: RwLock<Documents>,
    vault: Option<Arc<Vault>>,
}

impl LocalStore {
    /// A store that lives only in memory.
    pub fn in_memory() -> Self {
        Self {
            documents: RwLock::new(Documents::default()),
            vault: None,
        }
    }

    /// Opens a vault, creating an empty one if the file does not exist yet.
    pub async fn open(vault: Vault) -> Result<Self, StoreError> {
        let vault = Arc::new(vault);
        let handle = Arc::clone(&vault);

        let documents = blocking(move || {
            if handle.is_new() {
                log::info!("Creating new vault at {}", handle.path().display());
                let documents = Documents::default();
                handle.save(&documents)?;
                Ok(documents)
            } else {
                Ok(handle.load()?)
            }
        })
        .await?;

        log::info!("Opened vault with {} users", documents.users.len());
        Ok(Self {
            documents: RwLock::new(documents),
            vault: Some(vault),
        })
    }

    /// Checks an email/password pair and returns the user's uid.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<String, StoreError> {
        let (uid, digest) = {
            let documents = self.documents.read().await;
            let (uid, user) = documents
                .user_by_email(email.trim())
                .ok_or(StoreError::InvalidCredentials)?;
            (uid.clone(), user.password.clone())
        };

        let password = password.to_string();
        let valid = blocking(move || Ok(digest.verify(&password))).await?;
        if !valid {
            log::warn!("Rejected sign-in for {}", email);
            return Err(StoreError::InvalidCredentials);
        }

        log::info!("Signed in {}", email);
        Ok(uid)
    }

    /// Creates a category. Returns `false` if it already existed.
    pub async fn create_category(
        &self,
        user_id: &str,
        category: &CategoryName,
    ) -> Result<bool, StoreError> {
        {
            let documents = self.documents.read().await;
            if user(&documents, user_id)?
                .categories
                .contains_key(category.as_str())
            {
                return Ok(false);
            }
        }

        self.commit(|documents| {
            let user = user_mut(documents, user_id)?;
            let created = !user.categories.contains_key(category.as_str());
            user.categories
                .entry(category.to_string())
                .or_insert_with(CategoryDocument::new);
            Ok(created)
        })
        .await
    }

    /// Stores a login under a category, replacing any login with the same
    /// label.
    pub async fn save_login(
        &self,
        user_id: &str,
        category: &CategoryName,
        label: &str,
        username: &str,
        secret: &str,
    ) -> Result<(), StoreError> {
        self.commit(|documents| {
            let category_doc = category_mut(documents, user_id, category)?;
            category_doc.logins.insert(
                label.to_string(),
                LoginDocument {
                    username: username.to_string(),
                    secret: secret.to_string(),
                    updated_at: Utc::now(),
                },
            );
            Ok(())
        })
        .await
    }

    /// Removes a login. Returns `false` if there was none with that label.
    pub async fn remove_login(
        &self,
        user_id: &str,
        category: &CategoryName,
        label: &str,
    ) -> Result<bool, StoreError> {
        self.commit(|documents| {
            let category_doc = category_mut(documents, user_id, category)?;
            Ok(category_doc.logins.remove(label).is_some())
        })
        .await
    }

    /// Labels of the logins under a category, sorted.
    pub async fn list_logins(
        &self,
        user_id: &str,
        category: &CategoryName,
    ) -> Result<Vec<String>, StoreError> {
        let documents = self.documents.read().await;
        let category_doc = user(&documents, user_id)?
            .categories
            .get(category.as_str())
            .ok_or_else(|| StoreError::NotFound(format!("category '{}'", category)))?;
        Ok(category_doc.logins.keys().cloned().collect())
    }

    async fn commit<T, F>(&self, mutate: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut Documents) -> Result<T, StoreError>,
    {
        let mut documents = self.documents.write().await;
        let mut next = documents.clone();
        let value = mutate(&mut next)?;

        let next = match &self.vault {
            Some(vault) => {
                let vault = Arc::clone(vault);
                blocking(move || {
                    vault.save(&next)?;
                    Ok(next)
                })
                .await?
            }
            None => next,
        };

        *documents = next;
        Ok(value)
    }
}

#[async_trait]
impl CategoryStore for LocalStore {
    async fn list_categories(&self, user_id: &str) -> Result<Vec<CategoryName>, StoreError> {
        let documents = self.documents.read().await;
        let names = user(&documents, user_id)?
            .categories
            .keys()
            .filter_map(|key| match CategoryName::new(key) {
                Ok(name) => Some(name),
                Err(e) => {
                    log::warn!("Skipping stored category '{}': {}", key, e);
                    None
                }
            })
            .collect();
        Ok(names)
    }

    async fn has_logins(&self, user_id: &str, category: &CategoryName) -> Result<bool, StoreError> {
        let documents = self.documents.read().await;
        let exists = user(&documents, user_id)?
            .categories
            .get(category.as_str())
            .is_some_and(|c| c.logins.first_key_value().is_some());
        Ok(exists)
    }

    async fn delete_category(
        &self,
        user_id: &str,
        category: &CategoryName,
    ) -> Result<(), StoreError> {
        {
            let documents = self.documents.read().await;
            if !user(&documents, user_id)?
                .categories
                .contains_key(category.as_str())
            {
                log::debug!("Category '{}' already absent", category);
                return Ok(());
            }
        }

        self.commit(|documents| {
            user_mut(documents, user_id)?
                .categories
                .remove(category.as_str());
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl AccountRegistrar for LocalStore {
    async fn register_account(&self, request: &AccountRequest) -> Result<(), RegistrationError> {
        let email = request.email.trim().to_string();
        if !is_plausible_email(&email) {
            return Err(RegistrationError::new(
                "The email address is badly formatted.",
            ));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(RegistrationError::new(
                "The given password is invalid. [ Password should be at least 6 characters ]",
            ));
        }
        if self.documents.read().await.user_by_email(&email).is_some() {
            return Err(email_in_use());
        }

        let password = request.password.clone();
        let (uid, digest) = blocking(move || {
            let digest = PasswordDigest::compute(&password)
                .map_err(|e| StoreError::Vault(e.into()))?;
            let uid = crypto::random_token().map_err(|e| StoreError::Vault(e.into()))?;
            Ok((uid, digest))
        })
        .await?;

        let categories: BTreeMap<String, CategoryDocument> = ProtectedCategory::ALL
            .into_iter()
            .map(|p| (p.name().to_string(), CategoryDocument::new()))
            .collect();

        let document = UserDocument {
            name: request.name.trim().to_string(),
            email: email.clone(),
            device_id: request.device_id.clone(),
            password: digest,
            created_at: Utc::now(),
            categories,
        };

        let inserted = self
            .commit(|documents| {
                if documents.user_by_email(&email).is_some() {
                    return Ok(false);
                }
                documents.users.insert(uid.clone(), document);
                Ok(true)
            })
            .await?;

        if !inserted {
            return Err(email_in_use());
        }
        log::info!("Created account {} for {}", uid, email);
        Ok(())
    }
}

fn email_in_use() -> RegistrationError {
    RegistrationError::new("The email address is already in use by another account.")
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

fn user<'a>(documents: &'a Documents, user_id: &str) -> Result<&'a UserDocument, StoreError> {
    documents
        .users
        .get(user_id)
        .ok_or_else(|| StoreError::NotFound(format!("user '{}'", user_id)))
}

fn user_mut<'a>(
    documents: &'a mut Documents,
    user_id: &str,
) -> Result<&'a mut UserDocument, StoreError> {
    documents
        .users
        .get_mut(user_id)
        .ok_or_else(|| StoreError::NotFound(format!("user '{}'", user_id)))
}

fn category_mut<'a>(
    documents: &'a mut Documents,
    user_id: &str,
    category: &CategoryName,
) -> Result<&'a mut CategoryDocument, StoreError> {
    user_mut(documents, user_id)?
        .categories
        .get_mut(category.as_str())
        .ok_or_else(|| StoreError::NotFound(format!("category '{}'", category)))
}

/// Runs CPU-bound work (key derivation, sealing) off the async workers.
async fn blocking<T, F>(f: F) -> Result<T, StoreError>
where
    F: FnOnce() -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> CategoryName {
        CategoryName::new(s).unwrap()
    }

    async fn store_with_user() -> (LocalStore, String) {
        let store = LocalStore::in_memory();
        store
            .register_account(&AccountRequest::new("Ana", "a@x.com", "pw123456", "IMEI1"))
            .await
            .unwrap();
        let uid = store.sign_in("a@x.com", "pw123456").await.unwrap();
        (store, uid)
    }

    #[test]
    fn test_email_plausibility() {
        assert!(is_plausible_email("a@x.com"));
        assert!(!is_plausible_email("ax.com"));
        assert!(!is_plausible_email("a@x"));
        assert!(!is_plausible_email("@x.com"));
        assert!(!is_plausible_email("a b@x.com"));
        assert!(!is_plausible_email("a@@x.com"));
    }

    #[tokio::test]
    async fn test_registration_seeds_protected_category() {
        let (store, uid) = store_with_user().await;
        let categories = store.list_categories(&uid).await.unwrap();
        assert_eq!(categories, vec![name("WebSite")]);
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (store, _) = store_with_user().await;
        let err = store
            .register_account(&AccountRequest::new("Ana", "A@X.com", "other123", "IMEI2"))
            .await
            .unwrap_err();
        assert!(err.message.unwrap().contains("already in use"));
    }

    #[tokio::test]
    async fn test_short_password_rejected() {
        let store = LocalStore::in_memory();
        let err = store
            .register_account(&AccountRequest::new("Ana", "a@x.com", "pw123", "IMEI1"))
            .await
            .unwrap_err();
        assert!(err.message.unwrap().contains("at least 6 characters"));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_wrong_password() {
        let (store, _) = store_with_user().await;
        assert!(matches!(
            store.sign_in("a@x.com", "wrong-password").await,
            Err(StoreError::InvalidCredentials)
        ));
        assert!(matches!(
            store.sign_in("nobody@x.com", "pw123456").await,
            Err(StoreError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_login_existence_probe() {
        let (store, uid) = store_with_user().await;
        let email = name("Email");
        assert!(store.create_category(&uid, &email).await.unwrap());
        assert!(!store.create_category(&uid, &email).await.unwrap());
        assert!(!store.has_logins(&uid, &email).await.unwrap());

        store
            .save_login(&uid, &email, "gmail", "ana", "s3cret")
            .await
            .unwrap();
        assert!(store.has_logins(&uid, &email).await.unwrap());
        assert_eq!(store.list_logins(&uid, &email).await.unwrap(), vec!["gmail"]);

        assert!(store.remove_login(&uid, &email, "gmail").await.unwrap());
        assert!(!store.remove_login(&uid, &email, "gmail").await.unwrap());
        assert!(!store.has_logins(&uid, &email).await.unwrap());
    }

    #[tokio::test]
    async fn test_probe_of_missing_category_is_false() {
        let (store, uid) = store_with_user().await;
        assert!(!store.has_logins(&uid, &name("Nope")).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_absent_category_succeeds() {
        let (store, uid) = store_with_user().await;
        store.delete_category(&uid, &name("Nope")).await.unwrap();
        store.delete_category(&uid, &name("WebSite")).await.unwrap();
        assert!(store.list_categories(&uid).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = LocalStore::in_memory();
        assert!(matches!(
            store.list_categories("missing").await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(
            store.save_login("missing", &name("Email"), "l", "u", "s").await,
            Err(StoreError::NotFound(_))
        ));
    }
}
