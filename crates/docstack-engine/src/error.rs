//! Conversion of engine errors into caller-facing document errors.

use docstack_model::error::DocumentError;

use crate::expression::ExpressionError;
use crate::storage::StorageError;

/// Convert an expression error into a document error.
///
/// Takes `e` by value because this is used as a closure argument to `.map_err()`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn expression_error_to_document(e: ExpressionError) -> DocumentError {
    let message = e.to_string();
    let err = match &e {
        ExpressionError::InvalidShape { .. }
        | ExpressionError::UnknownOperator { .. }
        | ExpressionError::DepthExceeded { .. } => DocumentError::parse(message),
        ExpressionError::UnsupportedMutationKey { field } => {
            DocumentError::unsupported_mutation_key(field)
        }
        ExpressionError::MutationType { .. } | ExpressionError::AppendArgument { .. } => {
            DocumentError::mutation_type(message)
        }
    };
    err.with_source(e)
}

/// Convert a storage error into a document error.
///
/// Takes `e` by value because this is used as a closure argument to `.map_err()`.
#[must_use]
#[allow(clippy::needless_pass_by_value)]
pub fn storage_error_to_document(e: StorageError) -> DocumentError {
    let message = e.to_string();
    match e {
        StorageError::NotFound { id } => DocumentError::not_found(&id),
        StorageError::DuplicateId { id } => DocumentError::duplicate_id(&id),
        StorageError::MissingId | StorageError::InvalidId { .. } => {
            DocumentError::missing_id(message)
        }
        StorageError::Rejected(inner) => expression_error_to_document(inner),
    }
}
