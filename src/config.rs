//! Merge configuration.
//!
//! Settings are loaded from a JSON file; every field is optional and falls
//! back to the values used for the standard booking export layout.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Directory name under the platform config dir.
pub const CONFIG_DIR_NAME: &str = "bkg-merger";

/// File name of the user config.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Settings for one merge run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MergerConfig {
    /// Text that identifies the header row.
    pub header_marker: String,

    /// How many leading rows are searched for the marker.
    pub header_scan_rows: usize,

    pub booking_column: String,
    pub container_column: String,
    pub port_column: String,

    /// Case-insensitive substring that marks a remark column.
    pub remark_key: String,

    /// Case-insensitive substring that marks the CS remark column.
    /// Checked before `remark_key`.
    pub remark_cs_key: String,

    /// Container tokens of any other length are dropped.
    pub container_length: usize,

    pub output_path: PathBuf,
    pub data_sheet: String,
    pub summary_sheet: String,
    pub write_summary: bool,

    /// Inclusive channel bounds for booking colors.
    pub pastel_min: u8,
    pub pastel_max: u8,

    /// Fixed seed for reproducible colors.
    pub color_seed: Option<u64>,

    /// Copy an existing output file aside before replacing it.
    pub backup_existing: bool,
}

impl Default for MergerConfig {
    fn default() -> Self {
        Self {
            header_marker: "BKG NO".to_string(),
            header_scan_rows: 10,
            booking_column: "BKG NO".to_string(),
            container_column: "CNTR NO".to_string(),
            port_column: "PORT".to_string(),
            remark_key: "REMARK".to_string(),
            remark_cs_key: "REMARK(CS)".to_string(),
            container_length: 11,
            output_path: PathBuf::from("merged_data.xlsx"),
            data_sheet: "Data".to_string(),
            summary_sheet: "Summary".to_string(),
            write_summary: false,
            pastel_min: 180,
            pastel_max: 255,
            color_seed: None,
            backup_existing: false,
        }
    }
}

impl MergerConfig {
    /// Load configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config: MergerConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, else the user config if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading config");
            return Self::from_file(path);
        }

        match Self::user_config_path() {
            Some(path) if path.is_file() => {
                tracing::debug!(path = %path.display(), "loading user config");
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config_dir>/bkg-merger/config.json`, when the platform has a config dir.
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.header_marker.trim().is_empty() {
            return Err(invalid("header_marker must not be empty"));
        }
        if self.container_length == 0 {
            return Err(invalid("container_length must be greater than zero"));
        }
        if self.pastel_min > self.pastel_max {
            return Err(invalid(format!(
                "pastel_min ({}) is greater than pastel_max ({})",
                self.pastel_min, self.pastel_max
            )));
        }
        if self.data_sheet == self.summary_sheet {
            return Err(invalid("data_sheet and summary_sheet must differ"));
        }
        Ok(())
    }
}

fn invalid(message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MergerConfig =
            serde_json::from_str(r#"{ "container_length": 10, "write_summary": true }"#).unwrap();

        assert_eq!(config.container_length, 10);
        assert!(config.write_summary);
        assert_eq!(config.header_marker, "BKG NO");
        assert_eq!(config.header_scan_rows, 10);
        assert_eq!(config.output_path, PathBuf::from("merged_data.xlsx"));
    }

    #[test]
    fn test_validate_rejects_inverted_pastel_range() {
        let config = MergerConfig {
            pastel_min: 250,
            pastel_max: 200,
            ..MergerConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn test_validate_rejects_zero_container_length() {
        let config = MergerConfig {
            container_length: 0,
            ..MergerConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(MergerConfig::default().validate().is_ok());
    }
}
