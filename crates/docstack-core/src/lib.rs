//! Core types, configuration, and error handling for docstack.
//!
//! This crate provides the foundational building blocks shared by the
//! document model, the evaluation engine, and the command-line caller:
//! environment-driven configuration, the core error type, and the collection
//! name newtype.

mod config;
mod error;
mod types;

pub use config::DocStackConfig;
pub use error::{DocStackError, DocStackResult};
pub use types::CollectionName;
