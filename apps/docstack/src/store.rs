//! Loading and saving the collection's data file.
//!
//! The file is a JSON array of documents. Saves go through a temporary file in
//! the same directory and are renamed into place.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::debug;

use docstack_engine::{MemoryStorage, Storage};
use docstack_model::Document;

/// Load `path` into a fresh in-memory storage. A missing or blank file is an
/// empty collection.
pub fn load(path: &Path) -> Result<MemoryStorage> {
    if !path.exists() {
        debug!(path = %path.display(), "data file does not exist, starting empty");
        return Ok(MemoryStorage::new());
    }

    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read data file {}", path.display()))?;
    if raw.trim().is_empty() {
        return Ok(MemoryStorage::new());
    }

    let documents: Vec<Document> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse data file {}", path.display()))?;
    let count = documents.len();
    let storage = MemoryStorage::from_documents(documents)
        .with_context(|| format!("invalid data file {}", path.display()))?;
    debug!(path = %path.display(), count, "loaded data file");
    Ok(storage)
}

/// Write every document in `storage` to `path`.
pub fn save(path: &Path, storage: &dyn Storage) -> Result<()> {
    let documents = storage.scan_all();
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut file = NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut file, &documents).context("failed to encode documents")?;
    file.write_all(b"\n")?;
    file.persist(path)
        .with_context(|| format!("failed to write data file {}", path.display()))?;

    debug!(path = %path.display(), count = documents.len(), "saved data file");
    Ok(())
}
