//! ETL configuration file support
//!
//! Handles parsing of `dwh.toml` configuration files and environment
//! variable overrides. All four location/role keys are required: a file
//! missing any of them fails to parse, and catalog construction never sees
//! a partially resolved configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default configuration filename
pub const CONFIG_FILENAME: &str = "dwh.toml";

/// Default loader region for the bulk-load statements
pub const DEFAULT_REGION: &str = "us-west-2";

/// Environment variable for the access-role identifier
pub const ENV_IAM_ROLE_ARN: &str = "DWH_IAM_ROLE_ARN";

/// Environment variable for the event-log source location
pub const ENV_LOG_DATA: &str = "DWH_LOG_DATA";

/// Environment variable for the JSON-path mapping location
pub const ENV_LOG_JSONPATH: &str = "DWH_LOG_JSONPATH";

/// Environment variable for the song-metadata source location
pub const ENV_SONG_DATA: &str = "DWH_SONG_DATA";

/// Environment variable for the loader region
pub const ENV_REGION: &str = "DWH_REGION";

/// Error type for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file does not exist
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    /// Filesystem error while reading or writing
    #[error("IO error: {0}")]
    IoError(String),

    /// Configuration content failed to parse
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration failed to serialize
    #[error("Failed to serialize config: {0}")]
    SerializationError(String),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Access-role configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IamRoleSection {
    /// Role identifier the loader assumes when reading source objects
    pub arn: String,
}

/// Object-storage configuration section
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct S3Section {
    /// Event-log source location
    pub log_data: String,
    /// JSON-path mapping describing the event-log field layout
    pub log_jsonpath: String,
    /// Song-metadata source location
    pub song_data: String,
    /// Loader region
    #[serde(default = "default_region")]
    pub region: String,
}

fn default_region() -> String {
    DEFAULT_REGION.to_string()
}

/// Main configuration structure
///
/// Represents the `dwh.toml` configuration file format. There is no
/// `Default`: every key except the region must be supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EtlConfig {
    /// Access-role configuration
    pub iam_role: IamRoleSection,
    /// Object-storage locations
    pub s3: S3Section,
}

impl EtlConfig {
    /// Create a configuration from the four required values
    pub fn new(
        arn: impl Into<String>,
        log_data: impl Into<String>,
        log_jsonpath: impl Into<String>,
        song_data: impl Into<String>,
    ) -> Self {
        Self {
            iam_role: IamRoleSection { arn: arn.into() },
            s3: S3Section {
                log_data: log_data.into(),
                log_jsonpath: log_jsonpath.into(),
                song_data: song_data.into(),
                region: default_region(),
            },
        }
    }

    /// Load configuration from a workspace directory
    ///
    /// Looks for `dwh.toml` in the workspace directory and fails if it is
    /// absent. Environment variable overrides are applied after parsing.
    pub fn load(workspace_path: &Path) -> ConfigResult<Self> {
        let config_path = workspace_path.join(CONFIG_FILENAME);
        if !config_path.exists() {
            return Err(ConfigError::NotFound(config_path));
        }

        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| ConfigError::IoError(format!("Failed to read config: {}", e)))?;
        let mut config = Self::parse(&content)?;
        config.apply_env_overrides();
        debug!(path = %config_path.display(), "loaded warehouse configuration");
        Ok(config)
    }

    /// Parse configuration from TOML string
    ///
    /// Fails if any required key is missing.
    pub fn parse(content: &str) -> ConfigResult<Self> {
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save configuration to a workspace directory
    pub fn save(&self, workspace_path: &Path) -> ConfigResult<()> {
        let config_path = workspace_path.join(CONFIG_FILENAME);
        let content = self.to_toml()?;

        std::fs::write(&config_path, content)
            .map_err(|e| ConfigError::IoError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Convert configuration to TOML string
    pub fn to_toml(&self) -> ConfigResult<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializationError(e.to_string()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(arn) = std::env::var(ENV_IAM_ROLE_ARN) {
            self.iam_role.arn = arn;
        }
        if let Ok(location) = std::env::var(ENV_LOG_DATA) {
            self.s3.log_data = location;
        }
        if let Ok(location) = std::env::var(ENV_LOG_JSONPATH) {
            self.s3.log_jsonpath = location;
        }
        if let Ok(location) = std::env::var(ENV_SONG_DATA) {
            self.s3.song_data = location;
        }
        if let Ok(region) = std::env::var(ENV_REGION) {
            self.s3.region = region;
        }
    }

    /// Check if configuration exists in a workspace
    pub fn exists(workspace_path: &Path) -> bool {
        workspace_path.join(CONFIG_FILENAME).exists()
    }
}

/// Generate a sample configuration file content
pub fn sample_config() -> &'static str {
    r#"# Warehouse ETL configuration
# Locations and role consumed by the bulk-load statement templates.

[iam_role]
# Role the warehouse assumes to read the source buckets
arn = "arn:aws:iam::123456789012:role/dwhRole"

[s3]
# Raw event logs (JSON, one object per day of activity)
log_data = "s3://example-data/log_data"

# JSON-path mapping for the event-log field layout
log_jsonpath = "s3://example-data/log_json_path.json"

# Song metadata (JSON, field names match the staging columns)
song_data = "s3://example-data/song_data"

# Loader region; defaults to us-west-2 when omitted
region = "us-west-2"
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const FULL_CONFIG: &str = r#"
[iam_role]
arn = "arn:aws:iam::000000000000:role/loader"

[s3]
log_data = "s3://data/log_data"
log_jsonpath = "s3://data/log_json_path.json"
song_data = "s3://data/song_data"
"#;

    #[test]
    fn test_parse_full_config() {
        let config = EtlConfig::parse(FULL_CONFIG).unwrap();
        assert_eq!(config.iam_role.arn, "arn:aws:iam::000000000000:role/loader");
        assert_eq!(config.s3.log_data, "s3://data/log_data");
        assert_eq!(config.s3.log_jsonpath, "s3://data/log_json_path.json");
        assert_eq!(config.s3.song_data, "s3://data/song_data");
        assert_eq!(config.s3.region, DEFAULT_REGION);
    }

    #[test]
    fn test_missing_required_key_fails() {
        let without_song_data = r#"
[iam_role]
arn = "arn:aws:iam::000000000000:role/loader"

[s3]
log_data = "s3://data/log_data"
log_jsonpath = "s3://data/log_json_path.json"
"#;
        assert!(matches!(
            EtlConfig::parse(without_song_data),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_missing_section_fails() {
        let without_role = r#"
[s3]
log_data = "s3://data/log_data"
log_jsonpath = "s3://data/log_json_path.json"
song_data = "s3://data/song_data"
"#;
        assert!(EtlConfig::parse(without_role).is_err());
    }

    #[test]
    fn test_region_override_in_file() {
        let config = EtlConfig::parse(&format!("{}region = \"ap-southeast-2\"\n", FULL_CONFIG))
            .unwrap();
        assert_eq!(config.s3.region, "ap-southeast-2");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            EtlConfig::load(dir.path()),
            Err(ConfigError::NotFound(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let config = EtlConfig::new(
            "arn:aws:iam::000000000000:role/loader",
            "s3://data/log_data",
            "s3://data/log_json_path.json",
            "s3://data/song_data",
        );

        config.save(dir.path()).unwrap();
        assert!(EtlConfig::exists(dir.path()));

        let loaded = EtlConfig::load(dir.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_sample_config_is_valid() {
        let result = EtlConfig::parse(sample_config());
        assert!(result.is_ok(), "Sample config should be valid TOML");
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = EtlConfig::new("role", "s3://a", "s3://b", "s3://c");
        let toml = config.to_toml().unwrap();
        let back = EtlConfig::parse(&toml).unwrap();
        assert_eq!(config, back);
    }
}
