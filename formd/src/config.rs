use std::fs;

use serde::{Deserialize, Serialize};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{Builder, Rotation};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::prelude::*;

const LOOPBACK_ADDRS: [&str; 3] = ["localhost", "127.0.0.1", "::1"];

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogRotation {
    #[default]
    Daily,
    Weekly,
    Never,
}

impl LogRotation {
    pub const fn to_rotation(self) -> Rotation {
        match self {
            Self::Daily => Rotation::DAILY,
            Self::Weekly => Rotation::WEEKLY,
            Self::Never => Rotation::NEVER,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

const fn default_max_log_files() -> usize {
    7
}

const fn default_port() -> u16 {
    8000
}

const fn default_max_body_bytes() -> usize {
    65_536
}

fn default_addr() -> String {
    "127.0.0.1".to_string()
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub logging: Logging,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Server {
    #[serde(default = "default_addr")]
    pub addr: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    #[serde(default)]
    pub allow_remote: bool,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            allow_remote: false,
        }
    }
}

impl Server {
    pub fn bind_addr(&self) -> String {
        if self.addr.contains(':') {
            format!("[{}]:{}", self.addr, self.port)
        } else {
            format!("{}:{}", self.addr, self.port)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Logging {
    /// Directory for rolling log files; stdout only when unset.
    #[serde(default)]
    pub dir: Option<String>,
    #[serde(default)]
    pub rotation: LogRotation,
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            dir: None,
            rotation: LogRotation::default(),
            max_log_files: default_max_log_files(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
    #[error("Failed to setup logging: {0}")]
    LoggingSetup(tracing_appender::rolling::InitError),
}

impl Config {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let config_file = fs::read_to_string(path)?;
        let cfg: Self = toml::from_str(&config_file)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "server.max_body_bytes must be greater than zero".to_string(),
            ));
        }
        if !self.server.allow_remote && !LOOPBACK_ADDRS.contains(&self.server.addr.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "server.addr must be one of: localhost, 127.0.0.1, ::1 (got '{}'); set server.allow_remote to listen elsewhere",
                self.server.addr
            )));
        }
        Ok(())
    }

    pub fn init_logger(&self) -> Result<(WorkerGuard, Option<WorkerGuard>), ConfigError> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());

        let (file_nb, file_guard) = match &self.logging.dir {
            Some(dir) => {
                let file_appender = Builder::new()
                    .rotation(self.logging.rotation.to_rotation())
                    .filename_prefix("formd")
                    .filename_suffix("log")
                    .max_log_files(self.logging.max_log_files)
                    .build(dir)
                    .map_err(ConfigError::LoggingSetup)?;
                let (nb, guard) = tracing_appender::non_blocking(file_appender);
                (Some(nb), Some(guard))
            }
            None => (None, None),
        };

        let registry = tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_fmt::layer().with_writer(stdout_nb));

        match self.logging.format {
            LogFormat::Text => {
                registry
                    .with(file_nb.map(|nb| tracing_fmt::layer().with_ansi(false).with_writer(nb)))
                    .init();
            }
            LogFormat::Json => {
                registry
                    .with(file_nb.map(|nb| tracing_fmt::layer().json().with_writer(nb)))
                    .init();
            }
        }

        Ok((stdout_guard, file_guard))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn load(content: &str) -> Result<Config, ConfigError> {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();
        Config::new(temp_file.path().to_str().unwrap())
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();

        let toml_string = toml::to_string(&config).unwrap();
        assert!(toml_string.contains("addr = \"127.0.0.1\""));
        assert!(toml_string.contains("port = 8000"));

        let deserialized: Config = toml::from_str(&toml_string).unwrap();
        assert_eq!(config.server.addr, deserialized.server.addr);
        assert_eq!(config.server.port, deserialized.server.port);
        assert_eq!(
            config.server.max_body_bytes,
            deserialized.server.max_body_bytes
        );
        assert!(deserialized.logging.dir.is_none());
    }

    #[test]
    fn test_config_new_valid_file() {
        let config = load(
            r#"
[server]
addr = "::1"
port = 9090
max_body_bytes = 1024

[logging]
dir = "/var/log/formd"
rotation = "weekly"
max_log_files = 24
format = "json"
"#,
        )
        .unwrap();

        assert_eq!(config.server.addr, "::1");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.server.max_body_bytes, 1024);
        assert_eq!(config.server.bind_addr(), "[::1]:9090");
        assert_eq!(config.logging.dir.as_deref(), Some("/var/log/formd"));
        assert_eq!(config.logging.rotation, LogRotation::Weekly);
        assert_eq!(config.logging.max_log_files, 24);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_config_empty_file_uses_defaults() {
        let config = load("").unwrap();
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.server.max_body_bytes, 65_536);
        assert!(!config.server.allow_remote);
        assert!(config.logging.dir.is_none());
        assert_eq!(config.logging.rotation, LogRotation::Daily);
        assert_eq!(config.logging.max_log_files, 7);
        assert_eq!(config.logging.format, LogFormat::Text);
    }

    #[test]
    fn test_config_new_invalid_toml() {
        let result = load("[server\nport = 1");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn test_config_missing_file() {
        let result = Config::new("/nonexistent/formd.toml");
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_config_rejects_remote_addr() {
        let result = load("[server]\naddr = \"0.0.0.0\"\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));

        let config = load("[server]\naddr = \"0.0.0.0\"\nallow_remote = true\n").unwrap();
        assert_eq!(config.server.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn test_config_rejects_zero_body_limit() {
        let result = load("[server]\nmax_body_bytes = 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_all_rotation_values() {
        for (raw, expected) in [
            ("daily", LogRotation::Daily),
            ("weekly", LogRotation::Weekly),
            ("never", LogRotation::Never),
        ] {
            let config = load(&format!("[logging]\nrotation = \"{raw}\"\n")).unwrap();
            assert_eq!(config.logging.rotation, expected);
            let _ = expected.to_rotation();
        }
    }

    #[test]
    fn test_unknown_format_rejected() {
        let result = load("[logging]\nformat = \"xml\"\n");
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }
}
