/// Configuration management for Outreach Service
///
/// Settings come from environment variables. A `.env` file is loaded first
/// when present, without overriding variables that are already set.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Service name reported in logs
    pub service_name: String,
}

/// Database configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
}

// The URL carries credentials.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .finish()
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("LOG_FORMAT must be 'json' or 'pretty', got '{other}'")),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directives
    pub filter: String,
    pub format: LogFormat,
}

const DEFAULT_LOG_FILTER: &str = "outreach_service=info,org_authz=info";

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let url = match std::env::var("DATABASE_URL") {
            Ok(value) => value,
            Err(_) if production => {
                return Err("DATABASE_URL must be set in production".to_string())
            }
            Err(_) => "postgres://localhost/outreach".to_string(),
        };

        let database = DatabaseConfig {
            url,
            max_connections: parse_env_or_default("DB_MAX_CONNECTIONS", 10)?,
            min_connections: parse_env_or_default("DB_MIN_CONNECTIONS", 1)?,
            connect_timeout_secs: parse_env_or_default("DB_CONNECT_TIMEOUT_SECS", 5)?,
            acquire_timeout_secs: parse_env_or_default("DB_ACQUIRE_TIMEOUT_SECS", 10)?,
            idle_timeout_secs: parse_env_or_default("DB_IDLE_TIMEOUT_SECS", 600)?,
            max_lifetime_secs: parse_env_or_default("DB_MAX_LIFETIME_SECS", 1800)?,
        };

        if database.min_connections > database.max_connections {
            return Err(format!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                database.min_connections, database.max_connections
            ));
        }

        let logging = LoggingConfig {
            filter: std::env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string()),
            format: match std::env::var("LOG_FORMAT") {
                Ok(value) => value.parse()?,
                Err(_) if production => LogFormat::Json,
                Err(_) => LogFormat::Pretty,
            },
        };

        Ok(Config {
            app: AppConfig {
                env: app_env,
                service_name: std::env::var("OUTREACH_SERVICE_NAME")
                    .unwrap_or_else(|_| "outreach-service".to_string()),
            },
            database,
            logging,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app.env.eq_ignore_ascii_case("production")
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("{key} has invalid value '{raw}': {e}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "OUTREACH_SERVICE_NAME",
        "DATABASE_URL",
        "DB_MAX_CONNECTIONS",
        "DB_MIN_CONNECTIONS",
        "DB_CONNECT_TIMEOUT_SECS",
        "DB_ACQUIRE_TIMEOUT_SECS",
        "DB_IDLE_TIMEOUT_SECS",
        "DB_MAX_LIFETIME_SECS",
        "RUST_LOG",
        "LOG_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_defaults_outside_production() {
        clear_env();
        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.service_name, "outreach-service");
        assert_eq!(config.database.url, "postgres://localhost/outreach");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.max_lifetime_secs, 1800);
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(!config.is_production());
    }

    #[test]
    #[serial]
    fn test_production_requires_database_url() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("DATABASE_URL"));

        std::env::set_var("DATABASE_URL", "postgres://db.internal/outreach");
        let config = Config::from_env().unwrap();
        assert!(config.is_production());
        assert_eq!(config.logging.format, LogFormat::Json);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_number_is_rejected() {
        clear_env();
        std::env::set_var("DB_MAX_CONNECTIONS", "lots");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("DB_MAX_CONNECTIONS"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_min_above_max_is_rejected() {
        clear_env();
        std::env::set_var("DB_MAX_CONNECTIONS", "2");
        std::env::set_var("DB_MIN_CONNECTIONS", "5");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn test_debug_redacts_database_url() {
        clear_env();
        std::env::set_var("DATABASE_URL", "postgres://admin:hunter2@db/outreach");
        let config = Config::from_env().unwrap();
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
        clear_env();
    }

    #[test]
    fn test_log_format_parse() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" pretty ".parse::<LogFormat>().unwrap(), LogFormat::Pretty);
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
