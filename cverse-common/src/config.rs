//! Bootstrap configuration and root folder resolution
//!
//! The TOML file only carries bootstrap concerns: where the data lives, which
//! port to bind, the resolver profile and optional provider API keys. Keys set
//! through the settings API live in the database and take priority.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the SQLite file inside the root folder
pub const DATABASE_FILE_NAME: &str = "cverse.db";

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "CVERSE_ROOT_FOLDER";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Data folder holding `cverse.db`
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Resolver profile name (`legal` or `commercial`)
    #[serde(default)]
    pub profile: Option<String>,

    /// Per-request timeout for outbound provider calls
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub tmdb_api_key: Option<String>,
    #[serde(default)]
    pub unsplash_access_key: Option<String>,
    #[serde(default)]
    pub pixabay_api_key: Option<String>,
    #[serde(default)]
    pub pexels_api_key: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            profile: None,
            request_timeout_secs: default_request_timeout_secs(),
            logging: LoggingConfig::default(),
            tmdb_api_key: None,
            unsplash_access_key: None,
            pixabay_api_key: None,
            pexels_api_key: None,
        }
    }
}

fn default_port() -> u16 {
    5730
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load the platform config file, or defaults when none exists.
    ///
    /// A file that exists but fails to parse is an error.
    pub fn load_default() -> Result<Self> {
        match default_config_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "Loading bootstrap config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }
}

/// Locate the bootstrap config file.
///
/// Linux checks `~/.config/cverse/config.toml`, then `/etc/cverse/config.toml`.
/// Other platforms use the user config directory only.
pub fn default_config_path() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("cverse").join("config.toml"));
    if let Some(path) = user_config {
        if path.exists() {
            return Some(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/cverse/config.toml");
        if system_config.exists() {
            return Some(system_config);
        }
    }

    None
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. `CVERSE_ROOT_FOLDER` environment variable
/// 3. TOML `root_folder`
/// 4. OS-dependent default
pub fn resolve_root_folder(cli_arg: Option<&Path>, toml_config: &TomlConfig) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &toml_config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Create the root folder if missing and return the database path inside it
pub fn prepare_root_folder(root_folder: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root_folder).map_err(|e| {
        Error::Config(format!(
            "Failed to create root folder {}: {}",
            root_folder.display(),
            e
        ))
    })?;
    Ok(root_folder.join(DATABASE_FILE_NAME))
}

fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("cverse"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/cverse"))
    } else {
        // ~/.local/share/cverse on Linux, %LOCALAPPDATA%\cverse on Windows
        dirs::data_local_dir()
            .map(|d| d.join("cverse"))
            .unwrap_or_else(|| PathBuf::from("./cverse_data"))
    }
}
