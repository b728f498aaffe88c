//! docstack - query and mutate a JSON document collection.
//!
//! Loads the collection from a JSON data file into memory, runs one command
//! against it, prints the result as JSON on stdout and, when persistence is
//! on, writes mutations back to the file.
//!
//! # Usage
//!
//! ```text
//! docstack find --where '{"age": {"$ge": 30}}' --fields name,age
//! docstack update 2 '{"age": {"$inc": 1}}' --persist
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DATA_FILE` | `docstack.json` | Collection data file |
//! | `PERSISTENCE` | `false` | Write mutations back to the data file |
//! | `DOCSTACK_COLLECTION` | `/apps/docstack` | Collection name |
//! | `DOCSTACK_MAX_CONDITION_DEPTH` | `32` | Maximum condition nesting depth |
//! | `DOCSTACK_STRICT_IDS` | `true` | Reject empty `_id` values on insert |
//! | `LOG_LEVEL` | `info` | Log level filter |
//! | `LOG_FORMAT` | `text` | `text` or `json` |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `LOG_LEVEL`) |

mod cli;
mod store;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use docstack_core::{CollectionName, DocStackConfig};
use docstack_engine::{Collection, EngineConfig, Storage};
use docstack_model::{Document, Value};

use crate::cli::{Cli, Command};

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `LOG_LEVEL` config value.
/// Logs go to stderr so stdout carries only command output.
fn init_tracing(config: &DocStackConfig) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(&config.log_level)
            .with_context(|| format!("invalid log level filter: {}", config.log_level))?
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    if config.json_logs() {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

/// Parse a JSON argument into a [`Value`].
fn parse_json(label: &str, text: &str) -> Result<Value> {
    serde_json::from_str(text).with_context(|| format!("{label} is not valid JSON"))
}

/// Load `data_file` and build the collection over it. The storage handle is
/// returned as well so mutations can be saved afterwards.
fn open(
    name: CollectionName,
    data_file: &Path,
    config: EngineConfig,
) -> Result<(Collection, Arc<dyn Storage>)> {
    let storage: Arc<dyn Storage> = Arc::new(store::load(data_file)?);
    let collection = Collection::new(name, Arc::clone(&storage), config);
    Ok((collection, storage))
}

/// Run one command, returning its JSON output.
fn run(collection: &Collection, command: &Command) -> Result<serde_json::Value> {
    let output = match command {
        Command::Find { condition, fields } => {
            let condition = condition
                .as_deref()
                .map(|text| parse_json("condition", text))
                .transpose()?;
            let docs = collection.find(condition.as_ref(), Some(fields.as_slice()))?;
            debug!(matched = docs.len(), "find completed");
            serde_json::to_value(docs)?
        }
        Command::Get { id } => serde_json::to_value(collection.find_by_id(id)?)?,
        Command::Insert { json } => {
            let inserted = match parse_json("document", json)? {
                Value::List(items) => {
                    let docs = items
                        .into_iter()
                        .map(Document::try_from)
                        .collect::<Result<Vec<_>, _>>()?;
                    let count = docs.len();
                    collection.insert_all(docs)?;
                    count
                }
                value => {
                    collection.insert(Document::try_from(value)?)?;
                    1
                }
            };
            info!(inserted, "inserted documents");
            serde_json::json!({ "inserted": inserted })
        }
        Command::Update { id, mutation } => {
            let mutation = parse_json("mutation", mutation)?;
            let updated = collection.update(id, &mutation)?;
            info!(id = %id, "updated document");
            serde_json::to_value(updated)?
        }
        Command::Delete { id } => {
            let deleted = collection.delete(id)?;
            info!(id = %id, "deleted document");
            serde_json::to_value(deleted)?
        }
        Command::Count => serde_json::json!({ "count": collection.len() }),
    };
    Ok(output)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = DocStackConfig::from_env();
    init_tracing(&config)?;

    let engine_config = EngineConfig::from_env()?;
    let name = CollectionName::new(config.collection.clone())?;
    let data_file = PathBuf::from(cli.data_file.as_deref().unwrap_or(&config.data_file));
    let persist = cli.persist || config.persistence;

    info!(
        collection = %name,
        data_file = %data_file.display(),
        persist,
        max_condition_depth = engine_config.max_condition_depth,
        strict_ids = engine_config.strict_ids,
        "starting docstack",
    );

    let (collection, storage) = open(name, &data_file, engine_config)?;

    let output = match run(&collection, &cli.command) {
        Ok(output) => output,
        Err(e) => {
            error!(error = %e, "command failed");
            return Err(e);
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    if persist && cli.command.mutates() {
        store::save(&data_file, storage.as_ref())?;
        info!(documents = collection.len(), "persisted collection");
    }

    Ok(())
}
