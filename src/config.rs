use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::geonames::LoadOptions;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub dataset: DatasetConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatasetConfig {
    pub path: PathBuf,
    #[serde(flatten)]
    pub options: LoadOptions,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path).context("Failed to read config file")?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Combine an optional config file with a dataset path given on the
    /// command line. The command line path wins.
    pub fn resolve(config_path: Option<&Path>, file: Option<PathBuf>) -> Result<Self> {
        match (config_path, file) {
            (Some(path), file) => {
                let mut config = Self::load_from_file(path)
                    .with_context(|| format!("Failed to load {}", path.display()))?;
                if let Some(file) = file {
                    config.dataset.path = file;
                }
                Ok(config)
            }
            (None, Some(file)) => Ok(Self {
                dataset: DatasetConfig {
                    path: file,
                    options: LoadOptions::default(),
                },
                server: ServerConfig::default(),
            }),
            (None, None) => anyhow::bail!("Either --config or --file must be given"),
        }
    }
}
