//! Category deletion guard.
//!
//! Decides whether a category may be deleted and, when it may, deletes it
//! remotely and then drops it from the listing. The checks run in a fixed
//! order: protected name, pending request for the same category, login
//! existence probe, delete.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::category::CategoryName;
use crate::listing::CategoryListing;
use crate::store::CategoryStore;

/// Why a deletion was refused without touching the store's data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The category is a protected default.
    ReservedCategory,
    /// Logins still exist under the category.
    HasDependents,
    /// Another deletion of the same category has not finished.
    InFlight,
}

/// Why a permitted deletion did not happen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    RemoteError { detail: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Rejected(RejectReason),
    Failed(FailureReason),
}

impl DeleteOutcome {
    /// Text shown to the user for this outcome.
    pub fn notice(&self) -> &'static str {
        match self {
            DeleteOutcome::Deleted => "Categoria excluída com sucesso.",
            DeleteOutcome::Rejected(RejectReason::ReservedCategory) => {
                "A categoria 'WebSite' não pode ser excluída."
            }
            DeleteOutcome::Rejected(RejectReason::HasDependents) => {
                "Há logins associados a esta categoria. Exclua-os primeiro."
            }
            DeleteOutcome::Rejected(RejectReason::InFlight) => {
                "A exclusão desta categoria já está em andamento."
            }
            DeleteOutcome::Failed(FailureReason::RemoteError { .. }) => {
                "Erro ao excluir categoria."
            }
        }
    }
}

/// Deletion guard for one signed-in user. Clones share the listing and the
/// set of in-flight requests.
#[derive(Clone)]
pub struct DeletionGuard {
    store: Arc<dyn CategoryStore>,
    user_id: String,
    listing: CategoryListing,
    in_flight: Arc<Mutex<HashSet<CategoryName>>>,
}

impl DeletionGuard {
    pub fn new(
        store: Arc<dyn CategoryStore>,
        user_id: impl Into<String>,
        listing: CategoryListing,
    ) -> Self {
        Self {
            store,
            user_id: user_id.into(),
            listing,
            in_flight: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    pub async fn request_delete(&self, category: &CategoryName) -> DeleteOutcome {
        if let Some(protected) = category.protected() {
            log::info!("Refusing to delete protected category '{}'", protected.name());
            return DeleteOutcome::Rejected(RejectReason::ReservedCategory);
        }

        let Some(_pending) = PendingDelete::claim(&self.in_flight, category) else {
            log::debug!("Deletion of '{}' already in progress", category);
            return DeleteOutcome::Rejected(RejectReason::InFlight);
        };

        match self.store.has_logins(&self.user_id, category).await {
            Ok(true) => {
                log::info!("Category '{}' still has logins", category);
                return DeleteOutcome::Rejected(RejectReason::HasDependents);
            }
            Ok(false) => {}
            Err(e) => {
                log::error!("Login probe for '{}' failed: {}", category, e);
                return DeleteOutcome::Failed(FailureReason::RemoteError {
                    detail: e.to_string(),
                });
            }
        }

        match self.store.delete_category(&self.user_id, category).await {
            Ok(()) => {
                let removed = self.listing.remove(category);
                log::info!("Deleted category '{}' (listed: {})", category, removed);
                DeleteOutcome::Deleted
            }
            Err(e) => {
                log::error!("Failed to delete category '{}': {}", category, e);
                DeleteOutcome::Failed(FailureReason::RemoteError {
                    detail: e.to_string(),
                })
            }
        }
    }
}

/// Marks a category as having a deletion in progress until dropped.
struct PendingDelete<'a> {
    in_flight: &'a Mutex<HashSet<CategoryName>>,
    category: CategoryName,
}

impl<'a> PendingDelete<'a> {
    fn claim(in_flight: &'a Mutex<HashSet<CategoryName>>, category: &CategoryName) -> Option<Self> {
        let mut set = in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if !set.insert(category.clone()) {
            return None;
        }
        Some(Self {
            in_flight,
            category: category.clone(),
        })
    }
}

impl Drop for PendingDelete<'_> {
    fn drop(&mut self) {
        self.in_flight
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.category);
    }
}
