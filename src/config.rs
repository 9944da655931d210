// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Configuration management for the insights engine and its data source

pub mod engine_config;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::constants::env_config;

pub use engine_config::EngineConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub data_source: DataSourceConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

/// Where check-ins are read from
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DataSourceConfig {
    /// Repository kind: "json_file" or "memory"
    pub kind: String,
    pub path: Option<String>,
}

impl Default for DataSourceConfig {
    fn default() -> Self {
        Self {
            kind: "json_file".to_string(),
            path: Some(env_config::checkins_path()),
        }
    }
}

fn default_config_path() -> String {
    dirs::config_dir()
        .map(|p| p.join("momentum-insights/config.toml"))
        .unwrap_or_else(|| "config.toml".into())
        .to_string_lossy()
        .to_string()
}

impl Config {
    pub fn load(path: Option<String>) -> Result<Self> {
        let config_path = path.unwrap_or_else(default_config_path);

        if Path::new(&config_path).exists() {
            let content = fs::read_to_string(&config_path).context("Failed to read config file")?;
            toml::from_str(&content).context("Failed to parse config file")
        } else {
            dotenv::dotenv().ok();

            let mut config = Config::default();
            config.engine.limits.history_limit = env_config::history_limit();
            if let Ok(kind) = std::env::var("CHECKINS_SOURCE") {
                config.data_source.kind = kind;
            }

            Ok(config)
        }
    }

    pub fn save(&self, path: Option<String>) -> Result<()> {
        let config_path = path.unwrap_or_else(default_config_path);

        let parent = Path::new(&config_path)
            .parent()
            .context("Invalid config path")?;
        fs::create_dir_all(parent)?;

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_temp_config_file(content: &str) -> (TempDir, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.toml");
        fs::write(&config_path, content).expect("Failed to write temp config");
        (temp_dir, config_path.to_string_lossy().to_string())
    }

    #[test]
    fn test_config_load_from_file() {
        let config_content = r#"
[data_source]
kind = "memory"

[engine.limits]
max_suggestions = 3
"#;

        let (_temp_dir, config_path) = create_temp_config_file(config_content);
        let config = Config::load(Some(config_path)).expect("Failed to load config");

        assert_eq!(config.data_source.kind, "memory");
        assert!(config.data_source.path.is_none());
        assert_eq!(config.engine.limits.max_suggestions, 3);
        assert_eq!(config.engine.limits.max_insights, 8);
    }

    #[test]
    fn test_config_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("nonexistent_config.toml");

        let config = Config::load(Some(missing.to_string_lossy().to_string()))
            .expect("Failed to load default config");

        assert_eq!(config.engine.limits.min_checkins, 3);
    }

    #[test]
    fn test_config_save_and_reload() {
        let mut config = Config::default();
        config.data_source.path = Some("/tmp/checkins.json".to_string());
        config.engine.cycles.weekly_variance = 0.8;

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested = temp_dir.path().join("nested").join("config.toml");
        let nested_str = nested.to_string_lossy().to_string();

        config.save(Some(nested_str.clone())).expect("Failed to save config");
        assert!(nested.exists());

        let loaded = Config::load(Some(nested_str)).expect("Failed to load saved config");
        assert_eq!(loaded.data_source, config.data_source);
        assert_eq!(loaded.engine.cycles.weekly_variance, 0.8);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let (_temp_dir, config_path) = create_temp_config_file("this is not valid toml [[[");

        let result = Config::load(Some(config_path));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to parse config file"));
    }
}
