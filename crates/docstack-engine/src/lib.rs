//! Document evaluation engine for docstack.
//!
//! Parses and evaluates conditions, projections and mutations over
//! [`Document`](docstack_model::Document)s, and exposes them through the
//! [`Collection`] façade on top of a [`Storage`] collaborator.
#![allow(clippy::doc_markdown, clippy::module_name_repetitions)]

pub mod collection;
pub mod config;
pub mod error;
pub mod expression;
pub mod storage;

pub use collection::Collection;
pub use config::EngineConfig;
pub use storage::{MemoryStorage, Storage, StorageError};
