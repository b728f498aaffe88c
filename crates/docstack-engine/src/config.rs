//! Engine configuration.

use std::env;

use docstack_core::{DocStackError, DocStackResult};

/// Default maximum nesting depth of a condition tree.
pub const DEFAULT_MAX_CONDITION_DEPTH: usize = 32;

/// Evaluation engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Maximum nesting depth of lists, `$or` and `$and` in a condition.
    pub max_condition_depth: usize,
    /// Reject empty `_id` values on insert (default: true).
    pub strict_ids: bool,
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `DocStackError::Config` if `DOCSTACK_MAX_CONDITION_DEPTH` is
    /// not a positive integer.
    pub fn from_env() -> DocStackResult<Self> {
        let max_condition_depth = match env::var("DOCSTACK_MAX_CONDITION_DEPTH") {
            Ok(raw) => parse_depth(&raw)?,
            Err(_) => DEFAULT_MAX_CONDITION_DEPTH,
        };
        Ok(Self {
            max_condition_depth,
            strict_ids: env_bool("DOCSTACK_STRICT_IDS", true),
        })
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_condition_depth: DEFAULT_MAX_CONDITION_DEPTH,
            strict_ids: true,
        }
    }
}

fn parse_depth(raw: &str) -> DocStackResult<usize> {
    match raw.trim().parse::<usize>() {
        Ok(depth) if depth > 0 => Ok(depth),
        _ => Err(DocStackError::Config(format!(
            "DOCSTACK_MAX_CONDITION_DEPTH must be a positive integer, got {raw:?}"
        ))),
    }
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| {
        matches!(v.as_str(), "1" | "true" | "yes" | "TRUE" | "YES")
    })
}
