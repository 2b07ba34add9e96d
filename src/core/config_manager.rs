// src/core/config_manager.rs
//! Directory client configuration: defaults, optional YAML file, environment

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CONFIG_FILE: &str = "agn-directory.yaml";
const DEFAULT_STORAGE_FILE: &str = "agn_storage.json";

/// Checked in order; the first one set wins.
const BASE_URL_VARS: [&str; 3] = ["AGN_API_URL", "VITE_API_URL", "REACT_APP_API_URL"];

#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub page_size: usize,
    pub export_page_size: usize,
    pub scroll_threshold_px: u32,
    pub storage_path: PathBuf,
}

/// Every field optional so a config file can override just a few.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    base_url: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<usize>,
    export_page_size: Option<usize>,
    scroll_threshold_px: Option<u32>,
    storage_path: Option<PathBuf>,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 60,
            page_size: 50,
            export_page_size: 500,
            scroll_threshold_px: 200,
            storage_path: PathBuf::from(DEFAULT_STORAGE_FILE),
        }
    }
}

impl DirectoryConfig {
    /// Load defaults, then the YAML file if present, then environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var("AGN_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let mut config = Self::default();
        if config_path.exists() {
            config = config.merge_file(&config_path)?;
        }
        config = config.merge_env(|key| std::env::var(key).ok())?;
        config.validate()?;

        info!("Directory API: {}", config.base_url);
        Ok(config)
    }

    fn merge_file(self, path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        info!("Loaded configuration from {}", path.display());
        Ok(self.apply(file))
    }

    fn apply(mut self, file: ConfigFile) -> Self {
        if let Some(url) = file.base_url {
            self.base_url = url;
        }
        if let Some(secs) = file.timeout_secs {
            self.timeout_secs = secs;
        }
        if let Some(size) = file.page_size {
            self.page_size = size;
        }
        if let Some(size) = file.export_page_size {
            self.export_page_size = size;
        }
        if let Some(px) = file.scroll_threshold_px {
            self.scroll_threshold_px = px;
        }
        if let Some(path) = file.storage_path {
            self.storage_path = path;
        }
        self
    }

    /// `lookup` is injected so tests don't have to touch process env.
    fn merge_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = BASE_URL_VARS.iter().find_map(|key| lookup(key)) {
            self.base_url = url;
        }
        if let Some(secs) = lookup("AGN_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("AGN_TIMEOUT_SECS must be a number, got {}", secs))?;
        }
        if let Some(path) = lookup("AGN_STORAGE_PATH") {
            self.storage_path = PathBuf::from(path);
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            anyhow::bail!("page_size must be greater than zero");
        }
        if self.export_page_size == 0 {
            anyhow::bail!("export_page_size must be greater than zero");
        }
        if self.timeout_secs == 0 {
            anyhow::bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DirectoryConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.page_size, 50);
        assert_eq!(config.timeout_secs, 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_url_precedence_and_trailing_slash() {
        let config = DirectoryConfig::default()
            .merge_env(env(&[
                ("VITE_API_URL", "http://vite:9000/"),
                ("REACT_APP_API_URL", "http://cra:9000"),
            ]))
            .unwrap();
        assert_eq!(config.base_url, "http://vite:9000");

        let config = DirectoryConfig::default()
            .merge_env(env(&[
                ("AGN_API_URL", "https://api.agn.example"),
                ("VITE_API_URL", "http://vite:9000"),
            ]))
            .unwrap();
        assert_eq!(config.base_url, "https://api.agn.example");
    }

    #[test]
    fn test_env_timeout_must_parse() {
        let err = DirectoryConfig::default()
            .merge_env(env(&[("AGN_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("AGN_TIMEOUT_SECS"));
    }

    #[test]
    fn test_yaml_file_overrides_subset() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agn.yaml");
        std::fs::write(&path, "base_url: http://staging:8000\npage_size: 25\n").unwrap();

        let config = DirectoryConfig::default().merge_file(&path).unwrap();
        assert_eq!(config.base_url, "http://staging:8000");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let config = DirectoryConfig {
            page_size: 0,
            ..DirectoryConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
