//! Integration tests for docstack.
//!
//! These tests drive the [`Collection`] façade end to end over the in-memory
//! storage engine. Run them with:
//! ```text
//! cargo test -p docstack-integration
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use docstack_core::CollectionName;
use docstack_engine::{Collection, EngineConfig, MemoryStorage};
use docstack_model::{Document, Value};
use tracing::debug;

static INIT: Once = Once::new();
static NEXT_COLLECTION: AtomicUsize = AtomicUsize::new(0);

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Generate a unique collection name for a test.
#[must_use]
pub fn test_collection_name(prefix: &str) -> CollectionName {
    let n = NEXT_COLLECTION.fetch_add(1, Ordering::Relaxed);
    CollectionName::new(format!("/apps/test-{prefix}-{n}"))
        .unwrap_or_else(|e| panic!("invalid collection name for {prefix}: {e}"))
}

/// Build a document from a JSON literal.
#[must_use]
pub fn doc(json: serde_json::Value) -> Document {
    Document::try_from(json).unwrap_or_else(|e| panic!("invalid test document: {e}"))
}

/// Build a [`Value`] from a JSON literal.
#[must_use]
pub fn val(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Create an empty collection with the default engine configuration.
#[must_use]
pub fn empty_collection(prefix: &str) -> Collection {
    init_tracing();
    Collection::new(
        test_collection_name(prefix),
        Arc::new(MemoryStorage::new()),
        EngineConfig::default(),
    )
}

/// Create a collection holding `documents`, inserted in order.
#[must_use]
pub fn seeded_collection(prefix: &str, documents: Vec<serde_json::Value>) -> Collection {
    let collection = empty_collection(prefix);
    let documents: Vec<Document> = documents.into_iter().map(doc).collect();
    collection
        .insert_all(documents)
        .unwrap_or_else(|e| panic!("failed to seed {}: {e}", collection.name()));
    debug!(collection = %collection.name(), size = collection.len(), "seeded collection");
    collection
}

/// The three people used by the find scenarios.
#[must_use]
pub fn people() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({"_id": "1", "name": "John", "age": 34, "city": "Denver"}),
        serde_json::json!({"_id": "2", "name": "Sam", "age": 40, "city": "NY"}),
        serde_json::json!({"_id": "3", "name": "Sam", "age": 21, "city": "LA"}),
    ]
}

/// Identifiers of `docs`, in order.
#[must_use]
pub fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(Document::id).collect()
}

mod test_find;
mod test_insert;
mod test_update;
