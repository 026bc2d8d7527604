use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use reqwest::Url;
use serde::Deserialize;

static DEFAULT_API_URL: &str = "http://127.0.0.1:8000";
static SETTINGS_FILE_NAME: &str = "config.json";
static ENV_API_URL: &str = "TASKSYNC_API_URL";
static ENV_TIMEOUT_SECS: &str = "TASKSYNC_TIMEOUT_SECS";
static ENV_CONFIG_DIR: &str = "TASKSYNC_CONFIG_DIR";

static PROJECT_DIRS: Lazy<Option<ProjectDirs>> =
    Lazy::new(|| ProjectDirs::from("dev", "tasksync", "tasksync"));

/// Values supplied on the command line; they win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub request_timeout: Option<Duration>,
    pub config_dir: Option<PathBuf>,
}

/// Optional on-disk settings, read from `config.json` in the config directory.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsFile {
    api_url: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_url: Url,
    request_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Construct [`ClientConfig`] by resolving each field from the provided overrides,
    /// environment variables, the settings file, and built-in defaults, in that order.
    pub fn discover(overrides: ConfigOverrides) -> Result<Self> {
        Self::discover_with(overrides, |key| env::var(key).ok())
    }

    fn discover_with<E>(overrides: ConfigOverrides, env_var: E) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let config_dir = overrides
            .config_dir
            .clone()
            .or_else(|| env_var(ENV_CONFIG_DIR).map(PathBuf::from))
            .or_else(default_config_dir);
        let settings = match config_dir {
            Some(dir) => load_settings(&dir)?,
            None => SettingsFile::default(),
        };

        let api_url = overrides
            .api_url
            .or_else(|| env_var(ENV_API_URL))
            .or(settings.api_url)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let request_timeout = match overrides.request_timeout {
            Some(timeout) => Some(timeout),
            None => match env_var(ENV_TIMEOUT_SECS) {
                Some(raw) => Some(parse_timeout_secs(&raw)?),
                None => settings.timeout_secs.map(Duration::from_secs),
            },
        };

        let mut config = Self::from_api_url(&api_url)?;
        config.request_timeout = request_timeout;
        Ok(config)
    }

    /// Construct [`ClientConfig`] directly from a base URL with no request timeout.
    pub fn from_api_url(api_url: &str) -> Result<Self> {
        Ok(Self {
            api_url: parse_api_url(api_url)?,
            request_timeout: None,
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

fn parse_api_url(raw: &str) -> Result<Url> {
    let trimmed = raw.trim();
    // Exactly one trailing slash: endpoint building pops a single empty segment
    // before appending, so extra slashes would leak into every request path.
    let normalized = format!("{}/", trimmed.trim_end_matches('/'));
    let url = Url::parse(&normalized)
        .with_context(|| format!("Invalid API base URL '{trimmed}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("Unsupported API URL scheme '{other}': expected http or https"),
    }
}

fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs: u64 = raw
        .trim()
        .parse()
        .with_context(|| format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds"))?;
    if secs == 0 {
        return Err(anyhow!("{ENV_TIMEOUT_SECS} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}

fn default_config_dir() -> Option<PathBuf> {
    PROJECT_DIRS
        .as_ref()
        .map(|project| project.config_dir().to_path_buf())
}

fn load_settings(dir: &Path) -> Result<SettingsFile> {
    let path = dir.join(SETTINGS_FILE_NAME);
    if !path.exists() {
        return Ok(SettingsFile::default());
    }
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read settings at {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse settings at {}", path.display()))
}
