//! Configuration management for docstack.
//!
//! All configuration is driven by environment variables; there are no
//! configuration files.

/// Global configuration for docstack callers.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocStackConfig {
    /// Name of the collection the caller operates on.
    pub collection: String,
    /// Log level.
    pub log_level: String,
    /// Log output format: `text` or `json`.
    pub log_format: String,
    /// Whether mutations are written back to the data file.
    pub persistence: bool,
    /// JSON file holding the collection's documents.
    pub data_file: String,
}

impl Default for DocStackConfig {
    fn default() -> Self {
        Self {
            collection: "/apps/docstack".to_owned(),
            log_level: "info".to_owned(),
            log_format: "text".to_owned(),
            persistence: false,
            data_file: "docstack.json".to_owned(),
        }
    }
}

impl DocStackConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("DOCSTACK_COLLECTION") {
            config.collection = v;
        }
        if let Ok(v) = std::env::var("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Ok(v) = std::env::var("LOG_FORMAT") {
            config.log_format = v;
        }
        if let Ok(v) = std::env::var("PERSISTENCE") {
            config.persistence = parse_flag(&v);
        }
        if let Ok(v) = std::env::var("DATA_FILE") {
            config.data_file = v;
        }

        config
    }

    /// Returns `true` when logs should be emitted as JSON lines.
    #[must_use]
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

/// Interpret an environment flag value.
pub(crate) fn parse_flag(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}
