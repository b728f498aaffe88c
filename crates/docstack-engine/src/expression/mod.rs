//! Condition, projection and mutation expressions.
//!
//! The pipeline is:
//!
//! 1. **Parsing**: turn a structured [`Value`](docstack_model::Value) tree into
//!    a [`Condition`] or [`Mutation`], rejecting unknown operators and
//!    malformed shapes up front.
//! 2. **Evaluation**: match conditions against documents, project fields, or
//!    apply mutations to a copy of a document.

pub mod ast;
pub mod evaluator;
pub mod parser;

pub use ast::{CompareOp, Condition, FieldTest, Mutation, MutationOp};
pub use evaluator::{apply_mutation, evaluate, project};
pub use parser::{ExpressionError, parse_condition, parse_mutation};
