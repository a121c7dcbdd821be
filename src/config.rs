use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Words per masking chunk; each chunk contributes one lap batch.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_chunk_size() -> usize {
    6
}
fn default_data_dir() -> String {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("linedrill")
        .to_string_lossy()
        .to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("linedrill")
            .join("config.toml")
    }

    /// Clamp out-of-range values from hand-edited config files.
    pub fn validate(&mut self) {
        if self.chunk_size == 0 {
            self.chunk_size = default_chunk_size();
        }
        if self.chunk_size > 100 {
            self.chunk_size = 100;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.chunk_size, 6);
        assert!(!config.data_dir.is_empty());
    }

    #[test]
    fn test_validate_clamps_chunk_size() {
        let mut config = Config::default();
        config.chunk_size = 0;
        config.validate();
        assert_eq!(config.chunk_size, 6);

        config.chunk_size = 9999;
        config.validate();
        assert_eq!(config.chunk_size, 100);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str("chunk_size = 10").unwrap();
        assert_eq!(config.chunk_size, 10);
        assert_eq!(config.data_dir, default_data_dir());
    }
}
