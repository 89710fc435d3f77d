//! Configuration handling for git-ignore.
//! Loads an optional configuration file, resolves defaults once and
//! assembles the client from the resulting settings.

use crate::client::Client;
use crate::constants::{APP_DIR, CONFIG_FILES, DEFAULT_REPO_URL, DEFAULT_SERVICE_URL};
use crate::error::{Error, Result};
use crate::provider::{FsProvider, GitProvider, HttpProvider, Provider, ReqwestFetcher};
use directories::BaseDirs;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Kinds of providers that can be assembled into a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Local clone of the upstream template repository
    Git,
    /// Directory with one cached file per option
    Fs,
    /// Remote template service
    Http,
}

/// Raw configuration file contents. Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub cache_dir: Option<PathBuf>,
    pub mirror_dir: Option<PathBuf>,
    pub repo_url: Option<String>,
    pub service_url: Option<String>,
    pub providers: Option<Vec<ProviderKind>>,
    pub sort: Option<bool>,
}

/// Fully resolved settings used to build the client.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub mirror_dir: PathBuf,
    pub repo_url: String,
    pub service_url: String,
    pub providers: Vec<ProviderKind>,
    pub sort: bool,
}

/// Loads configuration from a directory, trying multiple file formats.
/// Supports: config.json, config.yml, config.yaml
///
/// # Arguments
/// * `config_dir` - Directory containing the configuration file
/// * `config_files` - List of configuration files to try
///
/// # Returns
/// * `Result<Option<String>>` - Contents of the first found configuration file, if any
pub fn load_config<P: AsRef<Path>>(config_dir: P, config_files: &[&str]) -> Result<Option<String>> {
    for file in config_files {
        let config_path = config_dir.as_ref().join(file);
        if config_path.exists() {
            debug!("Loading configuration from {}", config_path.display());
            return Ok(Some(std::fs::read_to_string(&config_path)?));
        }
    }

    debug!("No configuration file found (tried: {})", config_files.join(", "));
    Ok(None)
}

/// Parses configuration content, trying JSON first and YAML second.
///
/// # Errors
/// * `Error::ConfigError` if the content is neither valid JSON nor valid YAML
pub fn parse_config(content: &str) -> Result<Config> {
    if content.trim().is_empty() {
        return Ok(Config::default());
    }

    match serde_json::from_str(content) {
        Ok(config) => Ok(config),
        Err(_) => serde_yaml::from_str(content)
            .map_err(|e| Error::ConfigError(format!("Invalid configuration format: {e}"))),
    }
}

impl Settings {
    /// Applies defaults for every value missing from `config`.
    ///
    /// # Arguments
    /// * `config` - Parsed configuration
    /// * `data_dir` - Directory holding the cache and the mirror by default
    pub fn resolve<P: AsRef<Path>>(config: Config, data_dir: P) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            cache_dir: config.cache_dir.unwrap_or_else(|| data_dir.join("cache")),
            mirror_dir: config.mirror_dir.unwrap_or_else(|| data_dir.join("gitignore")),
            repo_url: config.repo_url.unwrap_or_else(|| DEFAULT_REPO_URL.to_string()),
            service_url: config.service_url.unwrap_or_else(|| DEFAULT_SERVICE_URL.to_string()),
            providers: config
                .providers
                .unwrap_or_else(|| vec![ProviderKind::Git, ProviderKind::Fs, ProviderKind::Http]),
            sort: config.sort.unwrap_or(true),
        }
    }

    /// Loads settings from `config_path`, or from the user's config directory
    /// when no path is given.
    ///
    /// # Errors
    /// * `Error::ConfigError` if the user directories cannot be determined or
    ///   the configuration is invalid
    /// * `Error::IoError` if the configuration file cannot be read
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let dirs = BaseDirs::new().ok_or_else(|| {
            Error::ConfigError("unable to determine the user home directory".to_string())
        })?;

        let content = match config_path {
            Some(path) => {
                debug!("Loading configuration from {}", path.display());
                Some(std::fs::read_to_string(path)?)
            }
            None => load_config(dirs.config_dir().join(APP_DIR), &CONFIG_FILES)?,
        };
        let config = match content {
            Some(content) => parse_config(&content)?,
            None => Config::default(),
        };

        Ok(Self::resolve(config, dirs.data_dir().join(APP_DIR)))
    }

    /// Builds a client with one provider per configured kind, in order.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no provider is configured or the service URL is invalid
    pub fn build_client(&self) -> Result<Client> {
        if self.providers.is_empty() {
            return Err(Error::ConfigError("at least one provider must be configured".to_string()));
        }

        let mut providers: Vec<Box<dyn Provider>> = Vec::with_capacity(self.providers.len());
        for kind in &self.providers {
            let provider: Box<dyn Provider> = match kind {
                ProviderKind::Git => {
                    Box::new(GitProvider::new(&self.mirror_dir, self.repo_url.as_str()))
                }
                ProviderKind::Fs => Box::new(FsProvider::new(&self.cache_dir)),
                ProviderKind::Http => Box::new(HttpProvider::new(
                    &self.service_url,
                    Box::new(ReqwestFetcher::new()),
                )?),
            };
            providers.push(provider);
        }

        Ok(Client::new(providers).with_sorting(self.sort))
    }
}
