//! Configuration management

use crate::db::{DEFAULT_BUSY_TIMEOUT, DEFAULT_ID_COLUMN, DEFAULT_TIMESTAMP_COLUMN};
use crate::error::{PruneError, Result};
use crate::prune::{DEFAULT_BLOCK_SIZE, DEFAULT_RETENTION_DAYS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Profile used when none is named.
pub const DEFAULT_PROFILE: &str = "batch";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Defaults applied to every table unless overridden
    #[serde(default)]
    pub defaults: PruneDefaults,

    /// Named connection profiles
    #[serde(default)]
    pub profiles: HashMap<String, ProfileConfig>,

    /// Per-table overrides keyed by table name
    #[serde(default)]
    pub tables: HashMap<String, TableOverride>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PruneDefaults {
    #[serde(default = "default_retention_days")]
    pub retention_days: u32,

    #[serde(default = "default_block_size")]
    pub block_size: u64,
}

impl Default for PruneDefaults {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            block_size: default_block_size(),
        }
    }
}

fn default_retention_days() -> u32 {
    DEFAULT_RETENTION_DAYS
}

fn default_block_size() -> u64 {
    DEFAULT_BLOCK_SIZE
}

/// Connection profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileConfig {
    /// Path to the SQLite database file
    pub database: PathBuf,

    /// How long a statement waits on a locked database
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl ProfileConfig {
    pub fn new(database: impl Into<PathBuf>) -> Self {
        Self {
            database: database.into(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }

    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT.as_millis() as u64
}

/// Column names and retention for one table
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TableOverride {
    #[serde(default)]
    pub retention_days: Option<u32>,

    #[serde(default)]
    pub block_size: Option<u64>,

    #[serde(default)]
    pub id_column: Option<String>,

    #[serde(default)]
    pub timestamp_column: Option<String>,
}

impl TableOverride {
    pub fn id_column(&self) -> &str {
        self.id_column.as_deref().unwrap_or(DEFAULT_ID_COLUMN)
    }

    pub fn timestamp_column(&self) -> &str {
        self.timestamp_column
            .as_deref()
            .unwrap_or(DEFAULT_TIMESTAMP_COLUMN)
    }
}

impl Config {
    /// Load config from default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path())
    }

    /// Load config from `path`; a missing file yields the defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_yaml(&content)
        } else {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    fn validate(&self) -> Result<()> {
        if self.defaults.block_size == 0 {
            return Err(PruneError::Config(
                "defaults.block_size must be positive".to_string(),
            ));
        }
        for (name, table) in &self.tables {
            if table.block_size == Some(0) {
                return Err(PruneError::Config(format!(
                    "tables.{}.block_size must be positive",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Look up a connection profile by name
    pub fn profile(&self, name: &str) -> Result<&ProfileConfig> {
        self.profiles
            .get(name)
            .ok_or_else(|| PruneError::ProfileNotFound(name.to_string()))
    }

    /// Overrides for `table`, or an empty set
    pub fn table(&self, table: &str) -> TableOverride {
        self.tables.get(table).cloned().unwrap_or_default()
    }

    pub fn retention_days_for(&self, table: &str) -> u32 {
        self.tables
            .get(table)
            .and_then(|t| t.retention_days)
            .unwrap_or(self.defaults.retention_days)
    }

    pub fn block_size_for(&self, table: &str) -> u64 {
        self.tables
            .get(table)
            .and_then(|t| t.block_size)
            .unwrap_or(self.defaults.block_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
defaults:
  retention_days: 14
profiles:
  batch:
    database: /var/lib/app/logs.sqlite
  reporting:
    database: /var/lib/app/reports.sqlite
    busy_timeout_ms: 250
tables:
  audit_log:
    retention_days: 365
    block_size: 100
    timestamp_column: logged_at
"#;

    #[test]
    fn test_parse_sample() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.defaults.retention_days, 14);
        assert_eq!(config.defaults.block_size, DEFAULT_BLOCK_SIZE);

        let batch = config.profile("batch").unwrap();
        assert_eq!(batch.database, PathBuf::from("/var/lib/app/logs.sqlite"));
        assert_eq!(batch.busy_timeout(), DEFAULT_BUSY_TIMEOUT);
        assert_eq!(
            config.profile("reporting").unwrap().busy_timeout(),
            Duration::from_millis(250)
        );
    }

    #[test]
    fn test_table_overrides() {
        let config = Config::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.retention_days_for("audit_log"), 365);
        assert_eq!(config.block_size_for("audit_log"), 100);
        assert_eq!(config.retention_days_for("access_log"), 14);
        assert_eq!(config.block_size_for("access_log"), DEFAULT_BLOCK_SIZE);

        let audit = config.table("audit_log");
        assert_eq!(audit.id_column(), "id");
        assert_eq!(audit.timestamp_column(), "logged_at");
    }

    #[test]
    fn test_missing_profile() {
        let config = Config::default();
        let err = config.profile("batch").unwrap_err();
        assert!(matches!(err, PruneError::ProfileNotFound(_)));
    }

    #[test]
    fn test_zero_block_size_rejected() {
        let err = Config::from_yaml("defaults:\n  block_size: 0\n").unwrap_err();
        assert!(matches!(err, PruneError::Config(_)));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(dir.path().join("config.yml")).unwrap();
        assert_eq!(config.defaults.retention_days, DEFAULT_RETENTION_DAYS);
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, SAMPLE).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.profiles.len(), 2);
    }
}
