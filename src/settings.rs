use std::path::Path;

// config lets you read a separate config file
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Literal format expected for date attributes.
    pub date_format: String,
    /// Literal format expected for date-time attributes.
    pub datetime_format: String,
    /// Upper bound on clauses per composed predicate, unbounded when absent.
    pub max_clauses: Option<usize>,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            date_format: String::from("%Y-%m-%d"),
            datetime_format: String::from("%Y-%m-%dT%H:%M:%S"),
            max_clauses: None,
            log_level: String::from("info"),
        }
    }
}

impl Settings {
    pub const ENV_PREFIX: &'static str = "NABAVKA";

    /// Defaults, overridden by the file at `path` (if given and present),
    /// overridden by `NABAVKA_*` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(false));
        }
        let config = builder
            .add_source(
                Environment::with_prefix(Self::ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
