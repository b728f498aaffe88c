//! Collection façade.
//!
//! A [`Collection`] composes the expression engine with a [`Storage`]
//! collaborator: reads are scan, filter, project; updates are read, apply,
//! write back as one unit per document. Every operation returns a
//! [`DocumentError`] on failure.

use std::collections::HashSet;
use std::sync::Arc;

use docstack_core::CollectionName;
use docstack_model::{Document, DocumentError, Value, document_error};
use tracing::warn;

use crate::config::EngineConfig;
use crate::error::{expression_error_to_document, storage_error_to_document};
use crate::expression::{apply_mutation, evaluate, parse_condition, parse_mutation, project};
use crate::storage::Storage;

/// A named collection of documents backed by a storage collaborator.
#[derive(Debug, Clone)]
pub struct Collection {
    name: CollectionName,
    storage: Arc<dyn Storage>,
    config: EngineConfig,
}

impl Collection {
    /// Create a collection over `storage`.
    #[must_use]
    pub fn new(name: CollectionName, storage: Arc<dyn Storage>, config: EngineConfig) -> Self {
        Self {
            name,
            storage,
            config,
        }
    }

    /// The collection name.
    #[must_use]
    pub fn name(&self) -> &CollectionName {
        &self.name
    }

    /// Select documents matching `condition`, projected to `fields`.
    ///
    /// A missing condition selects every document; missing or empty `fields`
    /// returns whole documents. Results keep the storage scan order.
    ///
    /// # Errors
    ///
    /// Returns a `ParseError` if the condition is malformed. Type mismatches
    /// during evaluation only exclude the document.
    pub fn find(
        &self,
        condition: Option<&Value>,
        fields: Option<&[String]>,
    ) -> Result<Vec<Document>, DocumentError> {
        let condition = condition
            .map(|c| parse_condition(c, self.config.max_condition_depth))
            .transpose()
            .map_err(expression_error_to_document)?;
        let fields = fields.unwrap_or_default();

        Ok(self
            .storage
            .scan_all()
            .into_iter()
            .filter(|doc| condition.as_ref().is_none_or(|c| evaluate(c, doc)))
            .map(|doc| if fields.is_empty() { doc } else { project(&doc, fields) })
            .collect())
    }

    /// Fetch one document by identifier.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document has this identifier.
    pub fn find_by_id(&self, id: &str) -> Result<Document, DocumentError> {
        self.storage.get(id).map_err(storage_error_to_document)
    }

    /// Insert a new document.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdError` for an empty identifier (when strict ids are
    /// on) and `DuplicateIdError` if the identifier is taken.
    pub fn insert(&self, document: Document) -> Result<(), DocumentError> {
        self.check_id(&document)?;
        self.storage
            .insert(document)
            .map_err(storage_error_to_document)
    }

    /// Insert a batch of documents.
    ///
    /// The whole batch is validated first (identifiers present, unique within
    /// the batch and not already stored); nothing is written if any check fails.
    /// If a concurrent writer takes one of the identifiers after validation,
    /// the documents already written by this call are removed again before the
    /// error is returned. Concurrent readers may observe the partial batch
    /// until then.
    ///
    /// # Errors
    ///
    /// Returns `MissingIdError` or `DuplicateIdError` for the first offending
    /// document.
    pub fn insert_all(&self, documents: Vec<Document>) -> Result<(), DocumentError> {
        let mut seen = HashSet::with_capacity(documents.len());
        for document in &documents {
            self.check_id(document)?;
            let id = document.id();
            if !seen.insert(id) || self.storage.get(id).is_ok() {
                return Err(DocumentError::duplicate_id(id));
            }
        }

        let mut written: Vec<String> = Vec::with_capacity(documents.len());
        for document in documents {
            let id = document.id().to_owned();
            if let Err(e) = self.storage.insert(document) {
                for id in &written {
                    self.storage.delete(id);
                }
                warn!(
                    collection = %self.name,
                    rolled_back = written.len(),
                    "batch insert lost a race, rolled back"
                );
                return Err(storage_error_to_document(e));
            }
            written.push(id);
        }
        Ok(())
    }

    /// Apply `mutation` to the document `id` and return the stored result.
    ///
    /// The mutation is parsed before storage is touched; application is
    /// all-or-nothing.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` or `UnsupportedMutationKeyError` for a bad
    /// mutation, `NotFound` for an unknown id and `MutationTypeError` when an
    /// operator meets an incompatible value.
    pub fn update(&self, id: &str, mutation: &Value) -> Result<Document, DocumentError> {
        let mutation = parse_mutation(mutation).map_err(expression_error_to_document)?;
        self.storage
            .update_with(id, &mut |current| apply_mutation(current, &mutation))
            .map_err(storage_error_to_document)
    }

    /// Remove the document `id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no document has this identifier.
    pub fn delete(&self, id: &str) -> Result<Document, DocumentError> {
        self.storage
            .delete(id)
            .ok_or_else(|| DocumentError::not_found(id))
    }

    /// Number of documents in the collection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// Returns `true` if the collection holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    fn check_id(&self, document: &Document) -> Result<(), DocumentError> {
        if self.config.strict_ids && document.id().is_empty() {
            return Err(document_error!(
                MissingIdError,
                "document `_id` must not be empty"
            ));
        }
        Ok(())
    }
}
