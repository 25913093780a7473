use std::fmt;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{JiraFrogError, Result};

#[derive(Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    pub server: String,
    pub username: String,
    pub token: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("token", &"<redacted>")
            .finish()
    }
}

impl Config {
    /// Load the config file, running the first-run prompt when it is missing.
    pub fn load_or_init() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_or_init_at(&config_path, crate::commands::init::prompt)
    }

    /// An existing file is returned as-is; `prompt` only runs when there is no file,
    /// and its answers are written to `config_path` before returning.
    pub fn load_or_init_at<F>(config_path: &Path, prompt: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Config>,
    {
        if config_path.exists() {
            debug!(path = %config_path.display(), "loading config");
            return Self::load_from(config_path);
        }

        debug!(path = %config_path.display(), "no config file, prompting");
        let config = prompt()?;
        config.save_to(config_path)?;
        println!("Wrote config to {}", config_path.display());

        Ok(config)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(config_path).map_err(|e| JiraFrogError::ConfigRead {
                path: config_path.to_path_buf(),
                source: e,
            })?;

        toml::from_str(&contents).map_err(|e| JiraFrogError::ConfigParse {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| JiraFrogError::ConfigWrite {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        }

        let contents = toml::to_string(self)?;

        std::fs::write(config_path, contents).map_err(|e| JiraFrogError::ConfigWrite {
            path: config_path.to_path_buf(),
            source: e,
        })
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "jirafrog")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(JiraFrogError::NoConfigDir)
    }

    /// Server URL without trailing slashes, ready for path joins
    pub fn server_base(&self) -> &str {
        self.server.trim_end_matches('/')
    }

    /// Web link to an issue, e.g. `https://example.atlassian.net/browse/AB-1`
    pub fn browse_url(&self, key: &str) -> String {
        format!("{}/browse/{key}", self.server_base())
    }
}
