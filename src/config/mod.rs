use serde::{Deserialize, Serialize};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::Result,
    utils::persistence::write_atomic,
};

fn default_bootstrap() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Dataset directory override; defaults to `<base>/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// Load the demo dataset when every table is empty at startup.
    #[serde(default = "default_bootstrap")]
    pub bootstrap_on_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            bootstrap_on_empty: default_bootstrap(),
        }
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        write_atomic(&self.path, |file| Ok(file.write_all(json.as_bytes())?))
    }

    /// Directory the CSV tables live in for `config`.
    pub fn dataset_dir(&self, config: &Config) -> PathBuf {
        config
            .data_dir
            .clone()
            .unwrap_or_else(|| PathResolver::data_dir_in(&self.base))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
