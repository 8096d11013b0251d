use chrono::{Duration, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{RecordCodec, RecordFormat};
use crate::domain::{DEFAULT_CATEGORY, DEFAULT_DUE_DAYS, Item, Priority};
use crate::store::ItemStore;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub storage: StorageConfig,
    pub defaults: DefaultsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub directory: PathBuf,
    pub format: RecordFormat,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            directory: dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("priorit")
                .join("items"),
            format: RecordFormat::default(),
        }
    }
}

/// Field values for items created from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub priority: Priority,
    pub due_in_days: i64,
    pub category: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            priority: Priority::default(),
            due_in_days: DEFAULT_DUE_DAYS,
            category: DEFAULT_CATEGORY.to_string(),
        }
    }
}

impl DefaultsConfig {
    /// A fresh item carrying these defaults
    pub fn new_item(&self) -> Item {
        Item::new()
            .with_priority(self.priority)
            .with_due_date(Utc::now() + Duration::days(self.due_in_days))
            .with_categories([self.category.as_str()])
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        if let Some(config_dir) = dirs::config_dir() {
            let project_name = env!("CARGO_PKG_NAME");
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Open the configured store, optionally at another directory
    pub fn open_store(&self, directory: Option<&Path>) -> Result<ItemStore<Box<dyn RecordCodec>>> {
        let directory = directory.unwrap_or(&self.storage.directory);
        ItemStore::open_with_codec(directory, self.storage.format.codec())
            .with_context(|| format!("Failed to open item store at {}", directory.display()))
    }
}
