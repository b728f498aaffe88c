//! Document error types.
//!
//! Every failure surfaced to a docstack caller is a [`DocumentError`] carrying
//! one of the well-known [`DocumentErrorCode`]s.

use std::fmt;

/// Well-known docstack error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum DocumentErrorCode {
    /// A condition or mutation has an unrecognized operator or a malformed shape.
    #[default]
    ParseError,
    /// Two values of incompatible kinds were ordered.
    TypeMismatchError,
    /// A mutation targets the identifier field.
    UnsupportedMutationKeyError,
    /// A mutation operator met an existing value of an incompatible kind.
    MutationTypeError,
    /// The requested identifier does not exist.
    NotFound,
    /// A document with the same identifier already exists.
    DuplicateIdError,
    /// A document has no usable identifier.
    MissingIdError,
    /// Internal error.
    InternalError,
}

impl DocumentErrorCode {
    /// Returns the error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ParseError => "ParseError",
            Self::TypeMismatchError => "TypeMismatchError",
            Self::UnsupportedMutationKeyError => "UnsupportedMutationKeyError",
            Self::MutationTypeError => "MutationTypeError",
            Self::NotFound => "NotFound",
            Self::DuplicateIdError => "DuplicateIdError",
            Self::MissingIdError => "MissingIdError",
            Self::InternalError => "InternalError",
        }
    }
}

impl fmt::Display for DocumentErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A docstack error returned to callers.
#[derive(Debug)]
pub struct DocumentError {
    /// The error code.
    pub code: DocumentErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The underlying source error, if any.
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl DocumentError {
    /// Create a new `DocumentError` with a custom message.
    #[must_use]
    pub fn with_message(code: DocumentErrorCode, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            source: None,
        }
    }

    /// Set the source error.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    // -- Convenience constructors --

    /// Malformed condition or mutation.
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::with_message(DocumentErrorCode::ParseError, message)
    }

    /// Mutation targeting an immutable field.
    #[must_use]
    pub fn unsupported_mutation_key(field: &str) -> Self {
        Self::with_message(
            DocumentErrorCode::UnsupportedMutationKeyError,
            format!("field `{field}` cannot be mutated"),
        )
    }

    /// Mutation operator applied to an incompatible existing value.
    #[must_use]
    pub fn mutation_type(message: impl Into<String>) -> Self {
        Self::with_message(DocumentErrorCode::MutationTypeError, message)
    }

    /// Unknown document identifier.
    #[must_use]
    pub fn not_found(id: &str) -> Self {
        Self::with_message(
            DocumentErrorCode::NotFound,
            format!("document not found: {id}"),
        )
    }

    /// Identifier already in use.
    #[must_use]
    pub fn duplicate_id(id: &str) -> Self {
        Self::with_message(
            DocumentErrorCode::DuplicateIdError,
            format!("document already exists: {id}"),
        )
    }

    /// Missing or malformed identifier.
    #[must_use]
    pub fn missing_id(message: impl Into<String>) -> Self {
        Self::with_message(DocumentErrorCode::MissingIdError, message)
    }
}

/// Create a `DocumentError` from an error code and a message, which may be a
/// format string.
///
/// # Examples
///
/// ```
/// use docstack_model::document_error;
/// use docstack_model::error::DocumentErrorCode;
///
/// let err = document_error!(MissingIdError, "document `_id` must not be empty");
/// assert_eq!(err.code, DocumentErrorCode::MissingIdError);
///
/// let id = "42";
/// let err = document_error!(NotFound, "document not found: {id}");
/// assert_eq!(err.message, "document not found: 42");
/// ```
#[macro_export]
macro_rules! document_error {
    ($code:ident, $($arg:tt)+) => {
        $crate::error::DocumentError::with_message(
            $crate::error::DocumentErrorCode::$code,
            format!($($arg)+),
        )
    };
}
