//! Storage collaborator and the in-memory storage engine.
//!
//! The [`Storage`] trait is the seam between the collection façade and
//! whatever holds documents. [`MemoryStorage`] keeps documents in a
//! [`DashMap`] keyed by `_id`, so different documents can be read and written
//! concurrently without contention.
//!
//! # Architecture
//!
//! ```text
//! DashMap<Id, StoredDocument { seq, document }>
//! ```
//!
//! - Entry-level locking: `update_with` runs the read-modify-write while
//!   holding the entry's write guard, so two updates of the same document are
//!   serialized and never merge.
//! - Scan ordering: every inserted document takes the next sequence number;
//!   scans return documents in insertion order. Replacing a document keeps its
//!   position.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;
use tracing::debug;

use docstack_model::Document;

use crate::expression::ExpressionError;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No document has the given identifier.
    #[error("document not found: {id}")]
    NotFound {
        /// The requested identifier.
        id: String,
    },
    /// A document with the same identifier already exists.
    #[error("document already exists: {id}")]
    DuplicateId {
        /// The conflicting identifier.
        id: String,
    },
    /// A document has an empty identifier.
    #[error("document has an empty `_id`")]
    MissingId,
    /// A document's identifier does not match the key it is stored under.
    #[error("document `_id` {actual} does not match key {expected}")]
    InvalidId {
        /// The key the document was written under.
        expected: String,
        /// The document's own identifier.
        actual: String,
    },
    /// The update function rejected the document.
    #[error(transparent)]
    Rejected(#[from] ExpressionError),
}

/// Read-modify-write callback used by [`Storage::update_with`].
pub type UpdateFn<'a> = dyn FnMut(&Document) -> Result<Document, ExpressionError> + 'a;

// ---------------------------------------------------------------------------
// Storage trait
// ---------------------------------------------------------------------------

/// Document storage used by the collection façade.
///
/// Implementations must be `Send + Sync` because a collection can be shared
/// across threads behind an `Arc`.
pub trait Storage: Send + Sync + fmt::Debug {
    /// All documents, in an order that is stable within one scan.
    fn scan_all(&self) -> Vec<Document>;

    /// Fetch a document by identifier.
    fn get(&self, id: &str) -> Result<Document, StorageError>;

    /// Write a document under `id`, replacing any previous version.
    fn put(&self, id: &str, document: Document) -> Result<(), StorageError>;

    /// Add a new document; fails if its identifier is taken.
    fn insert(&self, document: Document) -> Result<(), StorageError>;

    /// Remove a document, returning it if it existed.
    fn delete(&self, id: &str) -> Option<Document>;

    /// Number of stored documents.
    fn len(&self) -> usize;

    /// Returns `true` if nothing is stored.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replace a document with `apply(current)` as one logical unit.
    ///
    /// The default is a plain get/put. Implementations that can lock a single
    /// document should override it so concurrent updates never interleave.
    fn update_with(&self, id: &str, apply: &mut UpdateFn<'_>) -> Result<Document, StorageError> {
        let current = self.get(id)?;
        let updated = apply(&current)?;
        self.put(id, updated.clone())?;
        Ok(updated)
    }
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
struct StoredDocument {
    seq: u64,
    document: Document,
}

/// In-memory document storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    data: DashMap<String, StoredDocument>,
    next_seq: AtomicU64,
}

impl MemoryStorage {
    /// Creates a new empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a storage pre-loaded with `documents`, in order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::DuplicateId` if two documents share an identifier.
    pub fn from_documents(
        documents: impl IntoIterator<Item = Document>,
    ) -> Result<Self, StorageError> {
        let storage = Self::new();
        for document in documents {
            storage.insert(document)?;
        }
        Ok(storage)
    }

    fn next_seq(&self) -> u64 {
        self.next_seq.fetch_add(1, AtomicOrdering::Relaxed)
    }
}

impl Storage for MemoryStorage {
    fn scan_all(&self) -> Vec<Document> {
        let mut entries: Vec<(u64, Document)> = self
            .data
            .iter()
            .map(|entry| (entry.seq, entry.document.clone()))
            .collect();
        entries.sort_by_key(|(seq, _)| *seq);
        entries.into_iter().map(|(_, document)| document).collect()
    }

    fn get(&self, id: &str) -> Result<Document, StorageError> {
        self.data
            .get(id)
            .map(|entry| entry.document.clone())
            .ok_or_else(|| StorageError::NotFound { id: id.to_owned() })
    }

    fn put(&self, id: &str, document: Document) -> Result<(), StorageError> {
        check_id(id, &document)?;
        let fields = document.len();
        match self.data.entry(id.to_owned()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().document = document;
                debug!(id, fields, "replaced existing document");
            }
            Entry::Vacant(entry) => {
                entry.insert(StoredDocument {
                    seq: self.next_seq(),
                    document,
                });
                debug!(id, fields, "inserted new document");
            }
        }
        Ok(())
    }

    fn insert(&self, document: Document) -> Result<(), StorageError> {
        let id = document.id().to_owned();
        let fields = document.len();
        match self.data.entry(id) {
            Entry::Occupied(entry) => Err(StorageError::DuplicateId {
                id: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                debug!(id = %entry.key(), fields, "inserted new document");
                entry.insert(StoredDocument {
                    seq: self.next_seq(),
                    document,
                });
                Ok(())
            }
        }
    }

    fn delete(&self, id: &str) -> Option<Document> {
        let (_, removed) = self.data.remove(id)?;
        debug!(id, "deleted document");
        Some(removed.document)
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn update_with(&self, id: &str, apply: &mut UpdateFn<'_>) -> Result<Document, StorageError> {
        let mut entry = self
            .data
            .get_mut(id)
            .ok_or_else(|| StorageError::NotFound { id: id.to_owned() })?;
        let updated = apply(&entry.document)?;
        check_id(id, &updated)?;
        entry.document = updated.clone();
        debug!(id, fields = updated.len(), "updated document");
        Ok(updated)
    }
}

fn check_id(expected: &str, document: &Document) -> Result<(), StorageError> {
    if document.id() == expected {
        Ok(())
    } else {
        Err(StorageError::InvalidId {
            expected: expected.to_owned(),
            actual: document.id().to_owned(),
        })
    }
}
