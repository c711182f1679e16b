//! The observable, ordered list of categories shown to the user.
//!
//! All mutations go through this type; the underlying watch channel
//! serializes writers, so guard invocations completing on different tasks
//! never interleave their updates.

use std::sync::Arc;
use tokio::sync::watch;

use crate::category::{Category, CategoryName};

/// Shared handle to the category listing. Clones refer to the same list.
#[derive(Debug, Clone)]
pub struct CategoryListing {
    tx: Arc<watch::Sender<Vec<Category>>>,
}

impl CategoryListing {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Vec::new());
        Self { tx: Arc::new(tx) }
    }

    pub fn with_categories<I>(names: I) -> Self
    where
        I: IntoIterator<Item = CategoryName>,
    {
        let listing = Self::new();
        listing.replace_all(names);
        listing
    }

    /// Replaces the whole listing, dropping duplicate names.
    pub fn replace_all<I>(&self, names: I)
    where
        I: IntoIterator<Item = CategoryName>,
    {
        let mut categories: Vec<Category> = Vec::new();
        for name in names {
            if !categories.iter().any(|c| c.name == name) {
                categories.push(Category::new(name));
            }
        }
        log::debug!("Listing replaced with {} categories", categories.len());
        self.tx.send_replace(categories);
    }

    /// Appends a category. Returns `false` if it was already listed.
    pub fn insert(&self, name: CategoryName) -> bool {
        self.tx.send_if_modified(|categories| {
            if categories.iter().any(|c| c.name == name) {
                return false;
            }
            categories.push(Category::new(name));
            true
        })
    }

    /// Removes a category. Removing an absent category is a no-op that
    /// returns `false` and notifies nobody.
    pub fn remove(&self, name: &CategoryName) -> bool {
        self.tx.send_if_modified(|categories| {
            let before = categories.len();
            categories.retain(|c| &c.name != name);
            categories.len() != before
        })
    }

    pub fn contains(&self, name: &CategoryName) -> bool {
        self.tx.borrow().iter().any(|c| &c.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.tx
            .borrow()
            .iter()
            .map(|c| c.name.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.tx.send_if_modified(|categories| {
            let changed = !categories.is_empty();
            categories.clear();
            changed
        });
    }

    /// Subscribes to changes. The receiver sees the current list and is
    /// woken on every effective mutation.
    pub fn subscribe(&self) -> watch::Receiver<Vec<Category>> {
        self.tx.subscribe()
    }
}

impl Default for CategoryListing {
    fn default() -> Self {
        Self::new()
    }
}
