//! Parser for condition and mutation trees.
//!
//! Input is an already-parsed [`Value`] (mapping/list/scalar tree). Text
//! parsing is the caller's concern. Operator keys are matched exactly and
//! case-sensitively.

use std::collections::BTreeMap;

use docstack_model::{ID_FIELD, Value};

use super::ast::{CompareOp, Condition, FieldTest, Mutation, MutationOp};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while parsing or applying expressions.
#[derive(Debug, thiserror::Error)]
pub enum ExpressionError {
    /// The tree does not have the expected shape.
    #[error("Invalid {context}: {message}")]
    InvalidShape {
        /// What was being parsed.
        context: &'static str,
        /// Explanation.
        message: String,
    },
    /// An operator key is not recognised in this position.
    #[error("Unknown operator {operator} in {context}")]
    UnknownOperator {
        /// The offending key.
        operator: String,
        /// What was being parsed.
        context: &'static str,
    },
    /// A mutation targets an immutable field.
    #[error("Field {field} cannot be mutated")]
    UnsupportedMutationKey {
        /// The targeted field.
        field: String,
    },
    /// A mutation operator met an existing value of an incompatible kind.
    #[error("Cannot apply {operator} to field {field}: existing value is {found}")]
    MutationType {
        /// The targeted field.
        field: String,
        /// The operator key.
        operator: &'static str,
        /// Kind of the existing value.
        found: &'static str,
    },
    /// `$append` onto a string field with a non-string argument.
    #[error("Cannot apply $append to field {field}: cannot append a {argument} to a string")]
    AppendArgument {
        /// The targeted field.
        field: String,
        /// Kind of the rejected argument.
        argument: &'static str,
    },
    /// The condition nests deeper than allowed.
    #[error("Condition exceeds maximum nesting depth of {max_depth}")]
    DepthExceeded {
        /// The configured limit.
        max_depth: usize,
    },
}

impl ExpressionError {
    fn shape(context: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidShape {
            context,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Condition parsing
// ---------------------------------------------------------------------------

/// Parse a condition tree.
///
/// An object is an [`Condition::Object`], a list is a [`Condition::Array`].
/// Each nested list, `$or` and `$and` adds one level; trees deeper than
/// `max_depth` are rejected.
///
/// # Errors
///
/// Returns `ExpressionError` on malformed shapes, unknown operators, or when
/// the tree is too deep.
pub fn parse_condition(value: &Value, max_depth: usize) -> Result<Condition, ExpressionError> {
    ConditionParser { max_depth }.condition(value, 1)
}

struct ConditionParser {
    max_depth: usize,
}

impl ConditionParser {
    fn check_depth(&self, depth: usize) -> Result<(), ExpressionError> {
        if depth > self.max_depth {
            return Err(ExpressionError::DepthExceeded {
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    fn condition(&self, value: &Value, depth: usize) -> Result<Condition, ExpressionError> {
        self.check_depth(depth)?;
        match value {
            Value::Object(entries) => {
                let mut tests = Vec::with_capacity(entries.len());
                for (field, test) in entries {
                    // Operator syntax is only valid under a field key.
                    if field.starts_with('$') {
                        return Err(ExpressionError::UnknownOperator {
                            operator: field.clone(),
                            context: "condition",
                        });
                    }
                    tests.push((field.clone(), self.field_test(test, depth)?));
                }
                Ok(Condition::Object(tests))
            }
            Value::List(items) => items
                .iter()
                .map(|item| self.condition(item, depth + 1))
                .collect::<Result<Vec<_>, _>>()
                .map(Condition::Array),
            other => Err(ExpressionError::shape(
                "condition",
                format!("expected an object or a list, got {}", other.kind()),
            )),
        }
    }

    fn field_test(&self, value: &Value, depth: usize) -> Result<FieldTest, ExpressionError> {
        let Some(entries) = value.as_object().filter(|entries| is_operator_object(entries)) else {
            return Ok(FieldTest::Literal(value.clone()));
        };

        let (key, arg) = single_entry(entries, "field test")?;
        if let Some(op) = CompareOp::from_key(key) {
            return Ok(FieldTest::Compare(op, arg.clone()));
        }

        match key {
            "$or" => {
                self.check_depth(depth + 1)?;
                let Value::List(items) = arg else {
                    return Err(ExpressionError::shape(
                        "$or",
                        format!("expected a list, got {}", arg.kind()),
                    ));
                };
                items
                    .iter()
                    .map(|item| self.field_test(item, depth + 1))
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldTest::Or)
            }
            "$and" => {
                self.check_depth(depth + 1)?;
                let Value::Object(members) = arg else {
                    return Err(ExpressionError::shape(
                        "$and",
                        format!("expected an object, got {}", arg.kind()),
                    ));
                };
                members
                    .iter()
                    .map(|(key, bound)| {
                        CompareOp::from_key(key)
                            .map(|op| (op, bound.clone()))
                            .ok_or_else(|| ExpressionError::UnknownOperator {
                                operator: key.clone(),
                                context: "$and",
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(FieldTest::And)
            }
            _ => Err(ExpressionError::UnknownOperator {
                operator: key.to_owned(),
                context: "field test",
            }),
        }
    }
}

/// An empty object under a field key is a malformed operator test, not a
/// literal `{}`.
fn is_operator_object(entries: &BTreeMap<String, Value>) -> bool {
    entries.is_empty() || entries.keys().any(|key| key.starts_with('$'))
}

fn single_entry<'a>(
    entries: &'a BTreeMap<String, Value>,
    context: &'static str,
) -> Result<(&'a str, &'a Value), ExpressionError> {
    let mut iter = entries.iter();
    match (iter.next(), iter.next()) {
        (Some((key, value)), None) => Ok((key.as_str(), value)),
        _ => Err(ExpressionError::shape(
            context,
            format!(
                "expected exactly one operator, got {{{}}}",
                entries.keys().cloned().collect::<Vec<_>>().join(", ")
            ),
        )),
    }
}

// ---------------------------------------------------------------------------
// Mutation parsing
// ---------------------------------------------------------------------------

/// Parse a mutation tree `{field: {op: arg}, ...}`.
///
/// The identifier check runs before any operator is looked at, so a mutation
/// naming `_id` is always an `UnsupportedMutationKey` error.
///
/// # Errors
///
/// Returns `ExpressionError` when the mutation targets `_id`, has a malformed
/// shape, or uses an unknown operator.
pub fn parse_mutation(value: &Value) -> Result<Mutation, ExpressionError> {
    let Value::Object(entries) = value else {
        return Err(ExpressionError::shape(
            "mutation",
            format!("expected an object, got {}", value.kind()),
        ));
    };

    if entries.contains_key(ID_FIELD) {
        return Err(ExpressionError::UnsupportedMutationKey {
            field: ID_FIELD.to_owned(),
        });
    }

    let mut ops = Vec::with_capacity(entries.len());
    for (field, op) in entries {
        let Value::Object(op_entries) = op else {
            return Err(ExpressionError::shape(
                "mutation",
                format!("field {field} expects an operator object, got {}", op.kind()),
            ));
        };
        let (key, arg) = single_entry(op_entries, "mutation")?;
        ops.push((field.clone(), parse_mutation_op(key, arg)?));
    }

    Ok(Mutation { ops })
}

fn parse_mutation_op(key: &str, arg: &Value) -> Result<MutationOp, ExpressionError> {
    match key {
        "$inc" => arg.as_f64().map(MutationOp::Inc).ok_or_else(|| {
            ExpressionError::shape("$inc", format!("expected a number, got {}", arg.kind()))
        }),
        "$delete" => match arg {
            Value::Bool(true) => Ok(MutationOp::Delete),
            other => Err(ExpressionError::shape(
                "$delete",
                format!("expected true, got {other}"),
            )),
        },
        "$append" => Ok(MutationOp::Append(arg.clone())),
        "$set" | "$setOrReplace" => Ok(MutationOp::Set(arg.clone())),
        _ => Err(ExpressionError::UnknownOperator {
            operator: key.to_owned(),
            context: "mutation",
        }),
    }
}
