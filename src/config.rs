//! Import configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use std::env;

use dotenv::dotenv;

use crate::constants::import::DEFAULT_MAX_FILE_BYTES;
use crate::constants::sniff::DEFAULT_PREFIX_BYTES;
use crate::error::{Error, Result};

/// Tunables for the import pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// Leading bytes handed to the sniffer.
    pub sniff_bytes: usize,
    /// Files larger than this are rejected before parsing.
    pub max_file_bytes: u64,
    /// Parse batch files on the rayon pool.
    pub parallel: bool,
    /// Title untitled songs after the file they came from.
    pub title_from_name_hint: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            sniff_bytes: DEFAULT_PREFIX_BYTES,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            parallel: true,
            title_from_name_hint: true,
        }
    }
}

impl ImportConfig {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();

        let mut config = Self::default();

        if let Some(bytes) = read_var("SONGPORT_SNIFF_BYTES", "set SONGPORT_SNIFF_BYTES to a byte count such as 4096")? {
            config.sniff_bytes = bytes;
        }
        if let Some(bytes) = read_var("SONGPORT_MAX_FILE_BYTES", "set SONGPORT_MAX_FILE_BYTES to a byte count such as 16777216")? {
            config.max_file_bytes = bytes;
        }
        if let Ok(value) = env::var("SONGPORT_PARALLEL") {
            config.parallel = parse_flag("SONGPORT_PARALLEL", &value)?;
        }
        if let Ok(value) = env::var("SONGPORT_TITLE_FROM_NAME") {
            config.title_from_name_hint = parse_flag("SONGPORT_TITLE_FROM_NAME", &value)?;
        }

        Ok(config)
    }
}

fn read_var<T: std::str::FromStr>(name: &str, hint: &'static str) -> Result<Option<T>> {
    let Ok(raw) = env::var(name) else {
        return Ok(None);
    };
    raw.trim()
        .parse()
        .map(Some)
        .map_err(|_| Error::config(format!("{name}={raw} is not a number"), hint))
}

fn parse_flag(name: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(Error::config(format!("{name}={value} is not a flag"), "use true or false")),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    #[test]
    fn defaults() {
        let config = ImportConfig::default();
        assert_eq!(config.sniff_bytes, 4096);
        assert_eq!(config.max_file_bytes, 16 * 1024 * 1024);
        assert!(config.parallel);
    }

    #[test]
    fn flags() {
        assert!(parse_flag("X", "Yes").unwrap());
        assert!(!parse_flag("X", " 0 ").unwrap());
        assert!(matches!(parse_flag("X", "maybe"), Err(Error::Config { .. })));
    }
}
