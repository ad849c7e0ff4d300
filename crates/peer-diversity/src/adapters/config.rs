//! TOML configuration loading (requires "toml-config" feature)

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use super::StaticAsnTable;
use crate::domain::{DiversityConfig, DiversityError, NodeId};

/// Configuration file structure.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    diversity: DiversityConfigFile,
    #[serde(default)]
    asn: Vec<AsnEntry>,
}

#[derive(Debug, Deserialize, Default)]
struct DiversityConfigFile {
    max_per_cpl: Option<usize>,
    max_for_table: Option<usize>,
    log_key: Option<String>,
    #[serde(default)]
    whitelist: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct AsnEntry {
    prefix: String,
    asn: String,
}

/// TOML-based configuration provider.
///
/// # Config File Format
///
/// ```toml
/// [diversity]
/// max_per_cpl = 2
/// max_for_table = 3
/// log_key = "rt/diversity"
/// whitelist = [
///     "0101010101010101010101010101010101010101010101010101010101010101",
/// ]
///
/// [[asn]]
/// prefix = "2001:db8::/32"
/// asn = "64500"
/// ```
#[derive(Debug, Clone)]
pub struct TomlConfigProvider {
    config: DiversityConfig,
    log_key: String,
    whitelist: Vec<NodeId>,
    asn_table: StaticAsnTable,
}

impl TomlConfigProvider {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed or validated.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            error: e.to_string(),
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        // Limits fall back to the defaults
        let defaults = DiversityConfig::default();
        let dc = file.diversity;
        let config = DiversityConfig {
            max_per_cpl: dc.max_per_cpl.unwrap_or(defaults.max_per_cpl),
            max_for_table: dc.max_for_table.unwrap_or(defaults.max_for_table),
        };
        config.validate()?;

        let whitelist = dc
            .whitelist
            .iter()
            .map(|s| NodeId::from_hex(s))
            .collect::<Result<Vec<_>, _>>()?;

        let asn_table =
            StaticAsnTable::from_entries(file.asn.into_iter().map(|e| (e.prefix, e.asn)))?;

        Ok(Self {
            config,
            log_key: dc.log_key.unwrap_or_default(),
            whitelist,
            asn_table,
        })
    }

    /// Group limits.
    pub fn diversity_config(&self) -> &DiversityConfig {
        &self.config
    }

    /// Diagnostic key for log events.
    pub fn log_key(&self) -> &str {
        &self.log_key
    }

    /// Peers to whitelist at startup.
    pub fn whitelist(&self) -> &[NodeId] {
        &self.whitelist
    }

    /// Configured IPv6 prefix-to-ASN table.
    pub fn asn_table(&self) -> &StaticAsnTable {
        &self.asn_table
    }
}

/// Errors that can occur during config loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("Failed to read {path}: {error}")]
    Io {
        /// Path of the file that failed to load.
        path: String,
        /// Error message from the I/O operation.
        error: String,
    },
    /// TOML parsing error.
    #[error("Failed to parse config: {0}")]
    Parse(String),
    /// Values parsed but are not usable.
    #[error("Invalid config: {0}")]
    Invalid(#[from] DiversityError),
}
