//! Category identity and the protected-category policy.
//!
//! A category is identified by its name alone: the name is both what the
//! user sees and the key of its document in the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Reasons a string cannot be used as a category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CategoryNameError {
    #[error("category name cannot be empty")]
    Empty,
    #[error("category name cannot contain '/': '{0}'")]
    PathSeparator(String),
}

/// Categories that always exist and can never be deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectedCategory {
    /// The default category every account starts with.
    WebSite,
}

impl ProtectedCategory {
    /// All protected categories, in seeding order.
    pub const ALL: [ProtectedCategory; 1] = [ProtectedCategory::WebSite];

    pub const fn name(self) -> &'static str {
        match self {
            ProtectedCategory::WebSite => "WebSite",
        }
    }

    /// Matches a name exactly; protection is case-sensitive.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

/// A validated category name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryName(String);

impl CategoryName {
    /// Trims surrounding whitespace and validates the result.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CategoryNameError> {
        let name = name.as_ref().trim();
        if name.is_empty() {
            return Err(CategoryNameError::Empty);
        }
        if name.contains('/') {
            return Err(CategoryNameError::PathSeparator(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn protected(&self) -> Option<ProtectedCategory> {
        ProtectedCategory::from_name(&self.0)
    }

    pub fn is_protected(&self) -> bool {
        self.protected().is_some()
    }
}

impl TryFrom<String> for CategoryName {
    type Error = CategoryNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryName> for String {
    fn from(name: CategoryName) -> Self {
        name.0
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entry of the category listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: CategoryName,
}

impl Category {
    pub fn new(name: CategoryName) -> Self {
        Self { name }
    }

    pub fn is_protected(&self) -> bool {
        self.name.is_protected()
    }
}

impl From<CategoryName> for Category {
    fn from(name: CategoryName) -> Self {
        Self::new(name)
    }
}
