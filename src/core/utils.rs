use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".orchard_core";
const HOME_ENV: &str = "ORCHARD_CORE_HOME";
const DATA_DIR: &str = "data";
const CONFIG_FILE: &str = "config.json";

/// Resolves every on-disk location from one base directory.
pub struct PathResolver;

impl PathResolver {
    /// Application data directory, defaulting to `~/.orchard_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    /// Default dataset directory holding the CSV tables.
    pub fn data_dir_in(base: &Path) -> PathBuf {
        base.join(DATA_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        base.join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.as_os_str().is_empty() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
