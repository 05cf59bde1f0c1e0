//! Run configuration
//!
//! Settings come from built-in defaults, optionally overridden by a TOML
//! file and then by command line flags. Everything is validated once, up
//! front, into an immutable [`Config`].

use crate::analyze::AnalysisConfig;
use crate::error::ConfigError;
use crate::fetch::DEFAULT_BASE_URL;
use serde::Deserialize;
use std::path::Path;

/// Field table used when the config file has no `[fields]` section
pub const DEFAULT_FIELDS: &[(&str, &str)] = &[
    ("accepted.date-parts", "presence"),
    ("author.given", "count"),
    ("author.family", "count"),
    ("author.sequence", "count"),
    ("author.ORCID", "count"),
    ("author.authenticated-orcid", "count"),
    ("DOI", "presence"),
    ("author.affiliation.name", "count"),
    ("author.affiliation.id.id", "count"),
    ("container-title", "presence"),
    ("ISSN", "presence"),
    ("volume_year", "presence"),
    ("issue", "presence"),
    ("issue_date", "presence"),
    ("volume", "presence"),
    ("title", "presence"),
    ("article-number", "presence"),
    ("alternative-id", "presence"),
    ("relation.has-preprint.id", "presence"),
    ("relation.has-preprint.id-type", "presence"),
    ("page", "raw"),
    ("abstract", "presence"),
    ("funder.award", "count"),
    ("funder.DOI", "count"),
    ("funder.name", "count"),
    ("assertion.value", "raw"),
];

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchSettings {
    /// Catalog root; records are read from `{base_url}/works/{id}`
    pub base_url: String,
    /// Number of concurrent requests
    pub workers: usize,
    /// Per-request timeout
    pub timeout_secs: u64,
    /// Contact address sent with every request
    pub mailto: Option<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        FetchSettings {
            base_url: String::from(DEFAULT_BASE_URL),
            workers: 20,
            timeout_secs: 10,
            mailto: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportSettings {
    /// Name of the first output column
    pub id_column: String,
    /// Column of the input file that holds the identifiers
    pub input_column: String,
    /// Text written for values whose path did not resolve
    pub absent_marker: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        ReportSettings {
            id_column: String::from("article"),
            input_column: String::from("doi"),
            absent_marker: String::new(),
        }
    }
}

/// The config file as written, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub fetch: FetchSettings,
    pub report: ReportSettings,
    pub fields: Option<toml::Table>,
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    pub fetch: FetchSettings,
    pub report: ReportSettings,
    pub fields: AnalysisConfig,
}

impl Config {
    /// Load from an optional TOML file; `None` gives the built-in defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let origin = path.display().to_string();
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: origin.clone(),
                    source,
                })?;
                Self::from_toml_str(&text, &origin)
            }
            None => Self::from_file_config(FileConfig::default()),
        }
    }

    /// Parse TOML text; `origin` names the source in error messages
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text).map_err(|source| ConfigError::Toml {
            path: origin.to_string(),
            source,
        })?;
        Self::from_file_config(file)
    }

    pub fn from_file_config(file: FileConfig) -> Result<Self, ConfigError> {
        let fields = match &file.fields {
            Some(table) => {
                let mut pairs = Vec::with_capacity(table.len());
                for (field, mode) in table {
                    let mode = mode.as_str().ok_or_else(|| ConfigError::ModeNotString {
                        field: field.clone(),
                    })?;
                    pairs.push((field.as_str(), mode));
                }
                AnalysisConfig::from_tags(pairs)?
            }
            None => AnalysisConfig::from_tags(DEFAULT_FIELDS.iter().copied())?,
        };

        let config = Config {
            fetch: file.fetch,
            report: file.report,
            fields,
        };
        config.validate()?;
        Ok(config)
    }

    /// Re-check invariants; call again after applying overrides
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fetch.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        Ok(())
    }
}
