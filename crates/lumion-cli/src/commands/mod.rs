//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod export;
pub mod list;
pub mod output;
pub mod process;
pub mod report;

use std::path::{Path, PathBuf};

use tracing::debug;

use lumion_core::models::config::LumionConfig;
use lumion_core::DirectoryStore;

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lumion")
        .join("config.json")
}

/// Configuration file in effect: `--config` if given, the default path otherwise.
pub fn config_file(config_path: Option<&str>) -> PathBuf {
    config_path.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load configuration, falling back to defaults when no file exists.
///
/// An explicitly passed file must exist.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<LumionConfig> {
    if let Some(path) = config_path {
        return Ok(LumionConfig::from_file(Path::new(path))?);
    }

    let path = default_config_path();
    if path.exists() {
        debug!("Loading configuration from {}", path.display());
        Ok(LumionConfig::from_file(&path)?)
    } else {
        Ok(LumionConfig::default())
    }
}

/// Open the record store configured in `config`.
pub fn open_store(config: &LumionConfig) -> anyhow::Result<DirectoryStore> {
    debug!("Using store at {}", config.store.data_dir.display());
    Ok(DirectoryStore::open(&config.store.data_dir)?)
}
