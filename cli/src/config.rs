//! Configuration management for the CLI.

use contacts_engine::{BackendKind, RowPolicy, StoreConfig, FIELD_CAPACITY};
use std::env;
use std::path::PathBuf;

const DEFAULT_FILE: &str = "contacts.csv";

/// Smallest capacity that leaves room for one usable byte.
const MIN_FIELD_CAPACITY: usize = 2;

/// CLI configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// CSV file holding the contacts
    pub file: PathBuf,
    /// Backend used for the session
    pub backend: BackendKind,
    /// Engine tunables
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let file = lookup("CONTACTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FILE));

        let backend = match lookup("CONTACTS_BACKEND") {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidBackend(value))?,
            None => BackendKind::default(),
        };

        let field_capacity = match lookup("CONTACTS_FIELD_CAPACITY") {
            Some(value) => match value.trim().parse::<usize>() {
                Ok(capacity) if capacity >= MIN_FIELD_CAPACITY => capacity,
                _ => return Err(ConfigError::InvalidFieldCapacity(value)),
            },
            None => FIELD_CAPACITY,
        };

        let strict = parse_flag(&lookup, "CONTACTS_STRICT_LOAD")?;
        let unique_emails = parse_flag(&lookup, "CONTACTS_UNIQUE_EMAILS")?;

        let store = StoreConfig::default()
            .with_field_capacity(field_capacity)
            .with_row_policy(if strict {
                RowPolicy::Abort
            } else {
                RowPolicy::Skip
            })
            .with_unique_emails(unique_emails);

        Ok(Self {
            file,
            backend,
            store,
        })
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<bool, ConfigError> {
    let Some(value) = lookup(key) else {
        return Ok(false);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidFlag { key, value }),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid CONTACTS_BACKEND value '{0}' (expected array or list)")]
    InvalidBackend(String),

    #[error("Invalid CONTACTS_FIELD_CAPACITY value '{0}' (expected an integer >= 2)")]
    InvalidFieldCapacity(String),

    #[error("Invalid {key} value '{value}' (expected true or false)")]
    InvalidFlag { key: &'static str, value: String },
}
