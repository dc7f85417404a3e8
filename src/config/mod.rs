//! Configuration module for the portal backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.
//! Credentials and API keys never live in source; they are read here and kept redacted.

use std::env;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration loading failure.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// A configuration value that must not show up in logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

/// Where the mirror collections are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Sqlite(PathBuf),
    Memory,
}

/// Output format of the log subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// The admin email/password pair.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub email: String,
    pub password: Secret,
}

/// Settings for the AI tutor.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    pub api_key: Option<Secret>,
    pub model: String,
    pub base_url: String,
    /// Contact line offered when students ask how to reach the professor
    pub professor_contact: Option<String>,
    /// Replaces the built-in system instruction when set
    pub instruction_path: Option<PathBuf>,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Admin credentials; admin login is disabled when absent
    pub admin: Option<AdminCredentials>,
    /// Mirror store backend
    pub storage: StorageBackend,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
    /// Author stamped on new posts
    pub author_name: String,
    /// Year assigned to every subject created through the admin surface
    pub new_subject_year: i32,
    pub assistant: AssistantConfig,
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let admin = match (
            non_empty_var("PORTAL_ADMIN_EMAIL"),
            non_empty_var("PORTAL_ADMIN_PASSWORD"),
        ) {
            (Some(email), Some(password)) => Some(AdminCredentials {
                email,
                password: Secret::new(password),
            }),
            _ => None,
        };

        let storage = match env::var("PORTAL_STORAGE")
            .unwrap_or_else(|_| "sqlite".to_string())
            .to_lowercase()
            .as_str()
        {
            "sqlite" => StorageBackend::Sqlite(
                env::var("PORTAL_DB_PATH")
                    .unwrap_or_else(|_| "./data/portal.sqlite".to_string())
                    .into(),
            ),
            "memory" => StorageBackend::Memory,
            other => {
                return Err(ConfigError::InvalidValue(
                    "PORTAL_STORAGE".to_string(),
                    format!("'{}' is not one of sqlite, memory", other),
                ))
            }
        };

        let bind_addr = env::var("PORTAL_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::InvalidValue("PORTAL_BIND_ADDR".to_string(), e.to_string())
            })?;

        let log_level = env::var("PORTAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = match env::var("PORTAL_LOG_FORMAT")
            .unwrap_or_else(|_| "text".to_string())
            .to_lowercase()
            .as_str()
        {
            "text" => LogFormat::Text,
            "json" => LogFormat::Json,
            other => {
                return Err(ConfigError::InvalidValue(
                    "PORTAL_LOG_FORMAT".to_string(),
                    format!("'{}' is not one of text, json", other),
                ))
            }
        };

        let author_name =
            non_empty_var("PORTAL_AUTHOR_NAME").unwrap_or_else(|| "Prof. Téo".to_string());

        let new_subject_year = match env::var("PORTAL_NEW_SUBJECT_YEAR") {
            Ok(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue(
                    "PORTAL_NEW_SUBJECT_YEAR".to_string(),
                    format!("'{}' is not a year", raw),
                )
            })?,
            Err(_) => 2026,
        };

        let assistant = AssistantConfig {
            api_key: non_empty_var("GEMINI_API_KEY").map(Secret::new),
            model: non_empty_var("PORTAL_GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            base_url: non_empty_var("PORTAL_GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            professor_contact: non_empty_var("PORTAL_PROFESSOR_CONTACT"),
            instruction_path: non_empty_var("PORTAL_ASSISTANT_INSTRUCTION_PATH").map(PathBuf::from),
        };

        Ok(Self {
            admin,
            storage,
            bind_addr,
            log_level,
            log_format,
            author_name,
            new_subject_year,
            assistant,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
