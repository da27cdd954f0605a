use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

/// Environment variable that points straight at a config file.
pub const CONFIG_ENV: &str = "FOODS_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP port to listen on.
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    pub log_level: String,

    /// Path to the JSON snapshot holding every food record.
    pub data_path: String,

    pub server_version: String,
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(serde_json::from_str::<AppConfig>(&file)?)
    }

    /// Find `config.json`: `$FOODS_CONFIG`, then the executable folder,
    /// then its parent, then the working directory.
    pub fn locate() -> Result<PathBuf, ConfigError> {
        if let Some(explicit) = env::var_os(CONFIG_ENV) {
            return Ok(PathBuf::from(explicit));
        }

        let mut candidates = Vec::new();
        if let Some(exe_dir) = env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
        {
            candidates.push(exe_dir.join("config.json"));
            candidates.push(exe_dir.join("..").join("config.json"));
        }
        candidates.push(PathBuf::from("config.json"));

        match candidates.iter().position(|path| path.exists()) {
            Some(found) => Ok(candidates.swap_remove(found)),
            None => Err(ConfigError::NotFound(candidates)),
        }
    }

    /// Map `log_level` onto a tracing filter, defaulting to INFO.
    pub fn level_filter(&self) -> tracing::level_filters::LevelFilter {
        use tracing::level_filters::LevelFilter;

        match self.log_level.to_lowercase().as_str() {
            "trace" => LevelFilter::TRACE,
            "debug" => LevelFilter::DEBUG,
            "info" => LevelFilter::INFO,
            "warn" => LevelFilter::WARN,
            "error" => LevelFilter::ERROR,
            _ => LevelFilter::INFO,
        }
    }
}
