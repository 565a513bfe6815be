use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::client::WeatherApiClient;

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// WeatherAPI.com API key.
    pub api_key: Option<String>,

    /// Endpoint base override; absent means the production endpoint.
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-tracker", "tracker")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

/// Construct the production client from config.
pub fn client_from_config(config: &Config) -> Result<WeatherApiClient> {
    let api_key = config.api_key.as_deref().filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        anyhow!(
            "No API key configured.\n\
             Hint: run `tracker configure` and enter your WeatherAPI.com key."
        )
    })?;

    let client = match &config.base_url {
        Some(base) => WeatherApiClient::with_base_url(api_key.to_owned(), base.clone()),
        None => WeatherApiClient::new(api_key.to_owned()),
    };

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_from_config_errors_without_api_key() {
        let cfg = Config::default();
        let err = client_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No API key configured"));
        assert!(err.to_string().contains("Hint: run `tracker configure`"));
    }

    #[test]
    fn client_from_config_rejects_blank_api_key() {
        let cfg = Config { api_key: Some("   ".to_string()), base_url: None };
        assert!(client_from_config(&cfg).is_err());
    }

    #[test]
    fn client_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());
        assert!(cfg.has_api_key());
        assert!(client_from_config(&cfg).is_ok());
    }

    #[test]
    fn config_toml_round_trips() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            base_url: Some("http://localhost:9001/v1".to_string()),
        };
        let toml = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&toml).expect("parse");
        assert_eq!(back.api_key.as_deref(), Some("KEY"));
        assert_eq!(back.base_url.as_deref(), Some("http://localhost:9001/v1"));
    }

    #[test]
    fn missing_fields_parse_as_defaults() {
        let cfg: Config = toml::from_str("").expect("empty config parses");
        assert!(!cfg.has_api_key());
        assert!(cfg.base_url.is_none());
    }
}
