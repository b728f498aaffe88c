//! Common type definitions shared across docstack crates.

use std::fmt;

/// Name of a document collection (for example `/apps/users`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CollectionName(String);

impl CollectionName {
    /// Create a new collection name.
    ///
    /// # Errors
    /// Returns an error if the name is empty or contains whitespace.
    pub fn new(name: impl Into<String>) -> Result<Self, crate::DocStackError> {
        let name = name.into();
        if name.is_empty() || name.chars().any(char::is_whitespace) {
            return Err(crate::DocStackError::InvalidCollectionName(name));
        }
        Ok(Self(name))
    }

    /// Get the collection name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
