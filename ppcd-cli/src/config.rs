//! Decode settings from a YAML file and the command line.
//!
//! ```yaml
//! model: xenon
//! endianness: big
//! base_address: 0x82000000
//! offset: 0x400
//! length: 0x1000
//! ```

use std::path::Path;

use ppcd_isa::{Address, Endianness};
use ppcd_powerpc::Model;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Invalid config {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml::Error,
    },
}

/// Every key is optional; command-line flags take precedence.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub model: Option<Model>,
    pub endianness: Option<Endianness>,
    pub base_address: Option<u64>,
    pub offset: Option<u64>,
    pub length: Option<u64>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("{}: {e}", path.display())))?;
        Self::parse(&text).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        // An empty document is an empty config, not an error.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// Keys set in `overrides` replace ours.
    pub fn merge(self, overrides: Config) -> Config {
        Config {
            model: overrides.model.or(self.model),
            endianness: overrides.endianness.or(self.endianness),
            base_address: overrides.base_address.or(self.base_address),
            offset: overrides.offset.or(self.offset),
            length: overrides.length.or(self.length),
        }
    }

    /// Fill in defaults: ppc32, big endian, base 0, the whole file.
    pub fn resolve(&self) -> Settings {
        Settings {
            model: self.model.unwrap_or_default(),
            endianness: self.endianness.unwrap_or_default(),
            base: Address(self.base_address.unwrap_or(0)),
            offset: self.offset.unwrap_or(0),
            length: self.length,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub model: Model,
    pub endianness: Endianness,
    /// Address of the first byte of the file.
    pub base: Address,
    /// File offset where decoding starts.
    pub offset: u64,
    /// Bytes to decode; `None` runs to the end of the file.
    pub length: Option<u64>,
}

/// Decimal or `0x`-prefixed hexadecimal.
pub fn parse_number(s: &str) -> Result<u64, String> {
    let s = s.trim().replace('_', "");
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid number {s:?}: {e}"))
}
