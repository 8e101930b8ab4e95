use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::view::DateLocale;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Project URL of the hosted store, e.g. `https://<ref>.supabase.co`.
    pub supabase_url: Option<String>,
    /// Publishable (anon) key sent with every request.
    pub supabase_key: Option<String>,

    #[serde(default = "default_table")]
    pub table: String,

    /// Prefix both routes are mounted under, e.g. `/news-react-supabase`.
    #[serde(default)]
    pub base_path: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(default)]
    pub date_locale: DateLocale,

    #[serde(default = "default_log_file")]
    pub log_file: String,
}

fn default_table() -> String {
    "News".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_log_file() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("news-reader")
        .join("news-reader.log")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: None,
            supabase_key: None,
            table: default_table(),
            base_path: String::new(),
            request_timeout_secs: default_request_timeout(),
            date_locale: DateLocale::default(),
            log_file: default_log_file(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Reads the config at `path`, writing a default one there first if none exists.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("news-reader")
            .join("config.toml")
    }

    /// Applies connection settings given on the command line or through the environment.
    pub fn apply_overrides(&mut self, supabase_url: Option<String>, supabase_key: Option<String>) {
        if let Some(url) = supabase_url {
            self.supabase_url = Some(url);
        }
        if let Some(key) = supabase_key {
            self.supabase_key = Some(key);
        }
    }

    pub fn store_url(&self) -> Result<url::Url> {
        let raw = self
            .supabase_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing_setting("supabase_url"))?;
        Ok(url::Url::parse(raw)?)
    }

    pub fn store_key(&self) -> Result<&str> {
        self.supabase_key
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| missing_setting("supabase_key"))
    }
}

fn missing_setting(name: &str) -> AppError {
    AppError::Config(format!(
        "{name} is not set; add it to {} or pass --{}",
        Config::config_path().display(),
        name.replace('_', "-")
    ))
}
