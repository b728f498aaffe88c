//! Identifier-keyed document type.
//!
//! A [`Document`] is an object value whose `_id` field is a string. The `_id`
//! is fixed at construction: [`Document::insert`] and [`Document::remove`]
//! refuse to touch it, so a document can never lose or change its identity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::DocumentError;
use crate::value::Value;

/// Name of the mandatory identifier field.
pub const ID_FIELD: &str = "_id";

/// A schema-less record with a mandatory string `_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Document {
    fields: BTreeMap<String, Value>,
}

impl Document {
    /// Create a document holding only its identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(ID_FIELD.to_owned(), Value::String(id.into()));
        Self { fields }
    }

    /// Build a document from its fields.
    ///
    /// # Errors
    ///
    /// Returns a `MissingIdError` if `_id` is absent or not a string.
    pub fn from_fields(fields: BTreeMap<String, Value>) -> Result<Self, DocumentError> {
        match fields.get(ID_FIELD) {
            Some(Value::String(_)) => Ok(Self { fields }),
            Some(other) => Err(DocumentError::missing_id(format!(
                "document `{ID_FIELD}` must be a string, got {}",
                other.kind()
            ))),
            None => Err(DocumentError::missing_id(format!(
                "document has no `{ID_FIELD}` field"
            ))),
        }
    }

    /// The document identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        self.fields
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// Look up a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Look up a field, reading an absent field as `Null`.
    #[must_use]
    pub fn get_or_null(&self, field: &str) -> &Value {
        static NULL: Value = Value::Null;
        self.fields.get(field).unwrap_or(&NULL)
    }

    /// Returns `true` if the field is present (a stored `null` counts).
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Copy the fields accepted by `keep` into a new document. `_id` is always kept.
    #[must_use]
    pub fn filtered(&self, mut keep: impl FnMut(&str) -> bool) -> Self {
        let fields = self
            .fields
            .iter()
            .filter(|(name, _)| name.as_str() == ID_FIELD || keep(name))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { fields }
    }

    /// Set a field, returning its previous value.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedMutationKeyError` when `field` is `_id`.
    pub fn insert(
        &mut self,
        field: impl Into<String>,
        value: Value,
    ) -> Result<Option<Value>, DocumentError> {
        let field = field.into();
        if field == ID_FIELD {
            return Err(DocumentError::unsupported_mutation_key(&field));
        }
        Ok(self.fields.insert(field, value))
    }

    /// Remove a field, returning its value if it was present.
    ///
    /// # Errors
    ///
    /// Returns an `UnsupportedMutationKeyError` when `field` is `_id`.
    pub fn remove(&mut self, field: &str) -> Result<Option<Value>, DocumentError> {
        if field == ID_FIELD {
            return Err(DocumentError::unsupported_mutation_key(field));
        }
        Ok(self.fields.remove(field))
    }

    /// Number of fields, including `_id`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always `false`: a document holds at least its `_id`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl TryFrom<Value> for Document {
    type Error = DocumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(DocumentError::missing_id(format!(
                "a document must be an object, got {}",
                other.kind()
            ))),
        }
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = DocumentError;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        Self::try_from(Value::from(json))
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Self::Object(doc.fields)
    }
}
