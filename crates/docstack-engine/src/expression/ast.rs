//! AST types for docstack conditions and mutations.
//!
//! Conditions and mutations arrive as structured [`Value`] trees (parsed JSON).
//! The parser turns them into the tagged variants below so the evaluator can
//! match exhaustively instead of inspecting object shapes at evaluation time.

use std::fmt;

use docstack_model::Value;

/// A predicate over a document.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `{field: test, ...}`: every field test must match (implicit AND).
    Object(Vec<(String, FieldTest)>),
    /// `[cond, ...]`: at least one condition must match (implicit OR).
    Array(Vec<Condition>),
}

/// The per-field part of an object condition.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldTest {
    /// A bare value: implicit equality.
    Literal(Value),
    /// `{"$eq": v}`, `{"$lt": v}`, ...
    Compare(CompareOp, Value),
    /// `{"$or": [test, ...]}`.
    Or(Vec<FieldTest>),
    /// `{"$and": {"$ge": lo, "$lt": hi, ...}}`.
    And(Vec<(CompareOp, Value)>),
}

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    /// Structural equality (`$eq`).
    Eq,
    /// Less than (`$lt`).
    Lt,
    /// Less than or equal (`$le`).
    Le,
    /// Greater than (`$gt`).
    Gt,
    /// Greater than or equal (`$ge`).
    Ge,
}

impl CompareOp {
    /// Look up a comparison operator by its key.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "$eq" => Some(Self::Eq),
            "$lt" => Some(Self::Lt),
            "$le" => Some(Self::Le),
            "$gt" => Some(Self::Gt),
            "$ge" => Some(Self::Ge),
            _ => None,
        }
    }

    /// The operator key as it appears in a condition.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Eq => "$eq",
            Self::Lt => "$lt",
            Self::Le => "$le",
            Self::Gt => "$gt",
            Self::Ge => "$ge",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single field operation of a mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOp {
    /// `{"$inc": delta}`.
    Inc(f64),
    /// `{"$delete": true}`.
    Delete,
    /// `{"$append": v}`.
    Append(Value),
    /// `{"$set": v}` or `{"$setOrReplace": v}`.
    Set(Value),
}

impl MutationOp {
    /// The canonical operator key.
    #[must_use]
    pub fn key(&self) -> &'static str {
        match self {
            Self::Inc(_) => "$inc",
            Self::Delete => "$delete",
            Self::Append(_) => "$append",
            Self::Set(_) => "$set",
        }
    }
}

impl fmt::Display for MutationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed mutation: field operations in application order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mutation {
    /// `(field, operation)` pairs.
    pub ops: Vec<(String, MutationOp)>,
}

impl Mutation {
    /// Fields touched by this mutation.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().map(|(field, _)| field.as_str())
    }
}
