//! Document model types for docstack.
//!
//! This crate provides the schema-less value model shared by every docstack
//! crate: the [`Value`] tagged union with its equality and ordering rules, the
//! identifier-keyed [`Document`], and the caller-facing [`DocumentError`].
#![allow(clippy::module_name_repetitions)]

pub mod document;
pub mod error;
pub mod value;

pub use document::{Document, ID_FIELD};
pub use error::{DocumentError, DocumentErrorCode};
pub use value::{TypeMismatchError, Value};
