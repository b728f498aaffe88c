//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Query and mutate a JSON document collection.
#[derive(Debug, Parser)]
#[command(name = "docstack", version, about)]
pub struct Cli {
    /// JSON file holding the collection (overrides `DATA_FILE`).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_file: Option<String>,

    /// Write changes back to the data file (same as `PERSISTENCE=1`).
    #[arg(long, global = true)]
    pub persist: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Collection operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Select documents matching a condition.
    Find {
        /// Condition as JSON, e.g. `{"age": {"$ge": 30}}`.
        #[arg(long = "where", value_name = "JSON")]
        condition: Option<String>,
        /// Comma-separated fields to keep (`_id` is always kept).
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
    },
    /// Fetch one document by identifier.
    Get {
        /// Document identifier.
        id: String,
    },
    /// Insert a document object, or an array of documents as one batch.
    Insert {
        /// Document(s) as JSON.
        json: String,
    },
    /// Apply a mutation to one document.
    Update {
        /// Document identifier.
        id: String,
        /// Mutation as JSON, e.g. `{"age": {"$inc": 1}}`.
        mutation: String,
    },
    /// Remove one document.
    Delete {
        /// Document identifier.
        id: String,
    },
    /// Print the number of documents.
    Count,
}

impl Command {
    /// Returns `true` if the command can change the collection.
    #[must_use]
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Self::Insert { .. } | Self::Update { .. } | Self::Delete { .. }
        )
    }
}
