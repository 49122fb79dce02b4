// File: src/config.rs
// Purpose: Configuration parsing from rusty-forms.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub employee: EmployeeRulesConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Parameters of the employee rule catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeRulesConfig {
    /// Department codes accepted by the whitelist rule
    #[serde(default = "default_department_codes")]
    pub allowed_department_codes: Vec<String>,

    #[serde(default = "default_age_min")]
    pub age_min: i64,

    #[serde(default = "default_age_max")]
    pub age_max: i64,

    /// Department code that makes the employee number mandatory
    #[serde(default = "default_employee_number_department")]
    pub employee_number_department: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `error`, `warn`, `info`, `debug` or `trace`
    #[serde(default = "default_level")]
    pub level: String,
}

// Default values
fn default_department_codes() -> Vec<String> {
    vec!["1A".to_string(), "Z7".to_string(), "42".to_string()]
}

fn default_age_min() -> i64 {
    16
}

fn default_age_max() -> i64 {
    110
}

fn default_employee_number_department() -> String {
    "42".to_string()
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for EmployeeRulesConfig {
    fn default() -> Self {
        Self {
            allowed_department_codes: default_department_codes(),
            age_min: default_age_min(),
            age_max: default_age_max(),
            employee_number_department: default_employee_number_department(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Missing file: defaults
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;

        Ok(config)
    }

    /// Load configuration from default path (./rusty-forms.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("rusty-forms.toml")
    }
}
