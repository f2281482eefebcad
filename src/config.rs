use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::storage::FileStore;

/// Configuration settings for Maintlytics
///
/// Stores user preferences that persist between runs, including:
/// - Data directory holding the activity log and metrics
/// - Default output format (enhanced/table/json)
/// - Default maintenance window duration
/// - Date format preferences
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    /// Custom data directory (default: platform data dir + maintlytics)
    pub data_dir: Option<PathBuf>,
    /// Default output format for reports
    pub default_output_format: OutputFormat,
    /// Default maintenance window duration in hours
    pub default_window_hours: u32,
    /// Date format string for display (strftime format)
    pub date_format: String,
}

/// Output format options for reports
#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum OutputFormat {
    /// Enhanced format with visual cards and summaries (default)
    Enhanced,
    /// Classic ASCII table format
    Table,
    /// JSON format for scripting and automation
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_output_format: OutputFormat::Enhanced,
            default_window_hours: 2,
            date_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = fs::read_to_string(&config_path)?;
            let config: Config = serde_yaml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_yaml::to_string(self)?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("maintlytics")
            .join("config.yaml"))
    }

    /// Directory holding the persisted activity log and metrics
    pub fn resolved_data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(FileStore::default_dir()?),
        }
    }

    pub fn set_data_dir(&mut self, dir: PathBuf) {
        self.data_dir = Some(dir);
    }

    pub fn reset(&mut self) {
        *self = Config::default();
    }
}
