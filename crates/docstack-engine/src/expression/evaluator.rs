//! Evaluator for parsed conditions, projections and mutations.
//!
//! Everything here is a pure function of its inputs: documents are read, never
//! modified in place, and nothing is logged.

use std::cmp::Ordering;

use docstack_model::{Document, ID_FIELD, Value};

use super::ast::{CompareOp, Condition, FieldTest, Mutation, MutationOp};
use super::parser::ExpressionError;

// ---------------------------------------------------------------------------
// Condition evaluation
// ---------------------------------------------------------------------------

/// Evaluate a condition against a document.
///
/// An empty object condition matches every document, an empty array condition
/// matches none. Absent fields are read as `Null`.
#[must_use]
pub fn evaluate(condition: &Condition, document: &Document) -> bool {
    match condition {
        Condition::Object(tests) => tests
            .iter()
            .all(|(field, test)| eval_field_test(test, document.get_or_null(field))),
        Condition::Array(conditions) => conditions.iter().any(|inner| evaluate(inner, document)),
    }
}

fn eval_field_test(test: &FieldTest, value: &Value) -> bool {
    match test {
        FieldTest::Literal(literal) => value.equals(literal),
        FieldTest::Compare(op, operand) => compare(*op, value, operand),
        FieldTest::Or(alternatives) => alternatives.iter().any(|alt| eval_field_test(alt, value)),
        FieldTest::And(bounds) => bounds.iter().all(|(op, operand)| compare(*op, value, operand)),
    }
}

/// Apply a comparison operator. Ordering across kinds is a failed test.
fn compare(op: CompareOp, left: &Value, right: &Value) -> bool {
    let ordered = |accept: fn(Ordering) -> bool| left.compare(right).is_ok_and(accept);
    match op {
        CompareOp::Eq => left.equals(right),
        CompareOp::Lt => ordered(Ordering::is_lt),
        CompareOp::Le => ordered(Ordering::is_le),
        CompareOp::Gt => ordered(Ordering::is_gt),
        CompareOp::Ge => ordered(Ordering::is_ge),
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Reduce a document to the requested fields plus `_id`.
///
/// An empty field list is the identity projection. Requested fields missing
/// from the document are omitted.
#[must_use]
pub fn project(document: &Document, fields: &[String]) -> Document {
    if fields.is_empty() {
        return document.clone();
    }
    document.filtered(|name| fields.iter().any(|field| field == name))
}

// ---------------------------------------------------------------------------
// Mutation
// ---------------------------------------------------------------------------

/// Apply a mutation, returning the updated document.
///
/// Operations run in order on a copy; the first failure discards the copy, so
/// the input is never partially updated.
///
/// # Errors
///
/// Returns `UnsupportedMutationKey` if any operation targets `_id` (checked
/// before anything is applied) and `MutationType` when an operator meets an
/// existing value it cannot handle.
pub fn apply_mutation(document: &Document, mutation: &Mutation) -> Result<Document, ExpressionError> {
    if let Some(field) = mutation.fields().find(|field| *field == ID_FIELD) {
        return Err(ExpressionError::UnsupportedMutationKey {
            field: field.to_owned(),
        });
    }

    let mut updated = document.clone();
    for (field, op) in &mutation.ops {
        apply_op(&mut updated, field, op)?;
    }
    Ok(updated)
}

fn apply_op(document: &mut Document, field: &str, op: &MutationOp) -> Result<(), ExpressionError> {
    let current = document.get(field).filter(|value| !value.is_null());
    let mismatch = |found: &'static str| ExpressionError::MutationType {
        field: field.to_owned(),
        operator: op.key(),
        found,
    };

    let next = match op {
        MutationOp::Inc(delta) => match current {
            None => Some(Value::Number(*delta)),
            Some(Value::Number(n)) => Some(Value::Number(n + delta)),
            Some(other) => return Err(mismatch(other.kind())),
        },
        MutationOp::Delete => None,
        MutationOp::Append(arg) => Some(append(field, current, arg)?),
        MutationOp::Set(value) => Some(value.clone()),
    };

    let written = match next {
        Some(value) => document.insert(field, value).map(|_| ()),
        None => document.remove(field).map(|_| ()),
    };
    written.map_err(|_| ExpressionError::UnsupportedMutationKey {
        field: field.to_owned(),
    })
}

/// Compute the result of `$append` on `field`.
fn append(field: &str, current: Option<&Value>, arg: &Value) -> Result<Value, ExpressionError> {
    match (current, arg) {
        (None, Value::List(_) | Value::String(_)) => Ok(arg.clone()),
        (None, other) => Ok(Value::List(vec![other.clone()])),
        (Some(Value::List(items)), Value::List(extra)) => {
            let mut items = items.clone();
            items.extend(extra.iter().cloned());
            Ok(Value::List(items))
        }
        (Some(Value::List(items)), other) => {
            let mut items = items.clone();
            items.push(other.clone());
            Ok(Value::List(items))
        }
        (Some(Value::String(s)), Value::String(suffix)) => Ok(Value::String(format!("{s}{suffix}"))),
        (Some(Value::String(_)), other) => Err(ExpressionError::AppendArgument {
            field: field.to_owned(),
            argument: other.kind(),
        }),
        (Some(other), _) => Err(ExpressionError::MutationType {
            field: field.to_owned(),
            operator: "$append",
            found: other.kind(),
        }),
    }
}
