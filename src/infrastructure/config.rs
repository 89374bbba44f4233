//! Configuration management

use crate::error::{Result, TaggerError};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Environment variable naming the configuration file
pub const CONFIG_ENV: &str = "TAGGER_CONFIG";

/// Default sidecar file name
pub const DEFAULT_SIDECAR_NAME: &str = ".tag";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File name of the per-directory tag record
    pub sidecar_name: String,

    /// Depth applied to `find` and `clear` when none is given
    pub default_depth: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sidecar_name: DEFAULT_SIDECAR_NAME.to_string(),
            default_depth: None,
        }
    }
}

impl Config {
    /// Load config from the file named by `TAGGER_CONFIG`, or defaults when unset
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path)),
            None => Ok(Config::default()),
        }
    }

    /// Load config from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TaggerError::Config(format!("Config file not found: {}", path.display()))
            } else {
                TaggerError::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the sidecar name is a plain file name
    pub fn validate(&self) -> Result<()> {
        let name = self.sidecar_name.as_str();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(TaggerError::Config(format!(
                "Invalid sidecar name: '{}'",
                self.sidecar_name
            )));
        }
        Ok(())
    }
}
