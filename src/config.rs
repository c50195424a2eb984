// src/config.rs

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};
use tracing::debug;
use url::Url;

use crate::error::{RatesError, Result};

pub const DEFAULT_TABLE_TYPE: &str = "c";
pub const DEFAULT_BASE_URL: &str = "http://www.nbp.pl/kursy/xml/";
pub const DEFAULT_TIMEOUT_MS: u64 = 1000;
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Where tables come from and how they are read.
///
/// Every field has a default; a YAML file may override any of them, e.g.
///
/// ```yaml
/// table-type: c
/// base-url: http://www.nbp.pl/kursy/xml/
/// connect-timeout-ms: 2000
/// charset: windows-1250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    pub table_type: String,
    pub base_url: String,
    pub connect_timeout_ms: u64,
    pub read_timeout_ms: u64,
    pub charset: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            table_type: DEFAULT_TABLE_TYPE.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout_ms: DEFAULT_TIMEOUT_MS,
            read_timeout_ms: DEFAULT_TIMEOUT_MS,
            charset: DEFAULT_CHARSET.to_string(),
        }
    }
}

/// Per-field overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub table_type: Option<String>,
    pub base_url: Option<String>,
    pub connect_timeout_ms: Option<u64>,
    pub read_timeout_ms: Option<u64>,
    pub charset: Option<String>,
}

impl Config {
    /// Read a YAML config file. Missing keys keep their defaults.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| RatesError::Argument(format!("reading {}: {e}", path.display())))?;
        let config: Config = serde_yaml::from_str(&text)
            .map_err(|e| RatesError::Argument(format!("parsing {}: {e}", path.display())))?;
        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Defaults, then the file (if any), then the overrides; validated.
    pub fn load(path: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let mut config = match path {
            Some(p) => Self::from_yaml_file(p)?,
            None => Self::default(),
        };
        config.apply(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply(&mut self, o: Overrides) {
        if let Some(v) = o.table_type {
            self.table_type = v;
        }
        if let Some(v) = o.base_url {
            self.base_url = v;
        }
        if let Some(v) = o.connect_timeout_ms {
            self.connect_timeout_ms = v;
        }
        if let Some(v) = o.read_timeout_ms {
            self.read_timeout_ms = v;
        }
        if let Some(v) = o.charset {
            self.charset = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.table_type.is_empty() {
            return Err(RatesError::Argument("table-type must not be empty".into()));
        }
        if self.connect_timeout_ms == 0 || self.read_timeout_ms == 0 {
            return Err(RatesError::Argument("timeouts must be positive".into()));
        }
        self.base_url()?;
        self.encoding()?;
        Ok(())
    }

    /// Base URL as a folder: a trailing `/` is added so joins stay inside it.
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.base_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)
            .map_err(|e| RatesError::Argument(format!("base-url {:?}: {e}", self.base_url)))?;
        if url.cannot_be_a_base() {
            return Err(RatesError::Argument(format!(
                "base-url {:?} cannot hold files",
                self.base_url
            )));
        }
        Ok(url)
    }

    /// Character encoding of the index files.
    pub fn encoding(&self) -> Result<&'static Encoding> {
        Encoding::for_label(self.charset.trim().as_bytes())
            .ok_or_else(|| RatesError::Init(format!("unknown charset {:?}", self.charset)))
    }
}
