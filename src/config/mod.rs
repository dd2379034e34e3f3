mod file_config;

pub use file_config::FileConfig;

use crate::server::{ErrorPolicy, RequestsLoggingLevel};
use anyhow::{bail, Result};
use clap::ValueEnum;
use std::path::PathBuf;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db_path: Option<PathBuf>,
    pub bind_address: String,
    pub port: u16,
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub error_policy: ErrorPolicy,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db_path: None,
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            metrics_port: 9091,
            logging_level: RequestsLoggingLevel::default(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind_address: String,
    pub port: u16,
    /// `0` disables the metrics listener.
    pub metrics_port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub error_policy: ErrorPolicy,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db_path
            .map(PathBuf::from)
            .or_else(|| cli.db_path.clone())
            .ok_or_else(|| {
                anyhow::anyhow!("db_path must be specified via --db-path or in config file")
            })?;

        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.is_dir() {
                bail!("Database directory does not exist: {:?}", parent);
            }
        }
        if db_path.is_dir() {
            bail!("db_path is a directory: {:?}", db_path);
        }

        let bind_address = file
            .bind_address
            .unwrap_or_else(|| cli.bind_address.clone());
        let port = file.port.unwrap_or(cli.port);
        let metrics_port = file.metrics_port.unwrap_or(cli.metrics_port);

        let logging_level = match file.logging_level {
            Some(s) => parse_value_enum::<RequestsLoggingLevel>("logging_level", &s)?,
            None => cli.logging_level.clone(),
        };
        let error_policy = match file.error_policy {
            Some(s) => parse_value_enum::<ErrorPolicy>("error_policy", &s)?,
            None => cli.error_policy,
        };

        if metrics_port != 0 && metrics_port == port {
            bail!("metrics_port must differ from port ({})", port);
        }

        Ok(Self {
            db_path,
            bind_address,
            port,
            metrics_port,
            logging_level,
            error_policy,
        })
    }

    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn metrics_address(&self) -> Option<String> {
        if self.metrics_port == 0 {
            None
        } else {
            Some(format!("{}:{}", self.bind_address, self.metrics_port))
        }
    }
}

/// Parses a TOML string value with the same (case-insensitive) names clap accepts.
fn parse_value_enum<T: ValueEnum>(key: &str, s: &str) -> Result<T> {
    T::from_str(s, true).map_err(|_| anyhow::anyhow!("Invalid value for {}: {:?}", key, s))
}
