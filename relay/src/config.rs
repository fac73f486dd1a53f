use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

pub use config::ConfigError;

pub trait EnvConfig: Sized {
    fn from_env() -> Result<Self, ConfigError>;
    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError>;
}

impl<D> EnvConfig for D
where
    D: DeserializeOwned,
{
    fn from_env() -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default())
            .build()?
            .try_deserialize()
    }

    fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix(prefix))
            .build()?
            .try_deserialize()
    }
}

/// Process-wide settings, read once at startup and shared as `Arc<Config>`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub smtp_host: Option<String>,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Implicit TLS when true, STARTTLS otherwise.
    #[serde(default)]
    pub smtp_secure: bool,
    #[serde(default)]
    pub smtp_user: Option<String>,
    #[serde(default)]
    pub smtp_pass: Option<String>,
    #[serde(default = "default_from_name")]
    pub smtp_from_name: String,

    /// Internal mailbox receiving lead notifications.
    #[serde(default = "default_recipient")]
    pub contact_recipient: String,

    /// Comma separated list of CORS origins.
    #[serde(default = "default_origins")]
    pub allowed_origins: String,

    #[serde(default = "default_rate_limit_max")]
    pub rate_limit_max: u32,
    #[serde(default = "default_rate_limit_window")]
    pub rate_limit_window_secs: u64,
    #[serde(default)]
    pub trust_proxy: bool,
}

fn default_port() -> u16 {
    3001
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Contact Relay".to_string()
}

fn default_recipient() -> String {
    "contact@example.com".to_string()
}

fn default_origins() -> String {
    "http://localhost:5173".to_string()
}

fn default_rate_limit_max() -> u32 {
    100
}

fn default_rate_limit_window() -> u64 {
    15 * 60
}

/// Host and credentials for the SMTP transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub password: String,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn load() -> Result<Arc<Self>, ConfigError> {
        dotenvy::dotenv().ok();
        Ok(Arc::new(Self::from_env()?))
    }

    /// SMTP settings when host, user and password are all set. `None` selects test mode.
    pub fn smtp(&self) -> Option<SmtpSettings> {
        Some(SmtpSettings {
            host: non_blank(&self.smtp_host)?,
            port: self.smtp_port,
            secure: self.smtp_secure,
            user: non_blank(&self.smtp_user)?,
            password: non_blank(&self.smtp_pass)?,
        })
    }

    pub fn origins(&self) -> Vec<String> {
        self.allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: default_port(),
            smtp_host: None,
            smtp_port: default_smtp_port(),
            smtp_secure: false,
            smtp_user: None,
            smtp_pass: None,
            smtp_from_name: default_from_name(),
            contact_recipient: default_recipient(),
            allowed_origins: default_origins(),
            rate_limit_max: default_rate_limit_max(),
            rate_limit_window_secs: default_rate_limit_window(),
            trust_proxy: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smtp_requires_host_user_and_password() {
        let mut config = Config {
            smtp_host: Some("smtp.example.com".into()),
            smtp_user: Some("relay@example.com".into()),
            ..Config::default()
        };
        assert_eq!(config.smtp(), None);

        config.smtp_pass = Some("   ".into());
        assert_eq!(config.smtp(), None, "blank password counts as absent");

        config.smtp_pass = Some("hunter2".into());
        let smtp = config.smtp().unwrap();
        assert_eq!(smtp.host, "smtp.example.com");
        assert_eq!(smtp.port, 587);
        assert!(!smtp.secure);
    }

    #[test]
    fn origins_split_on_commas() {
        let config = Config {
            allowed_origins: "https://example.com, https://www.example.com,,".into(),
            ..Config::default()
        };
        assert_eq!(
            config.origins(),
            vec!["https://example.com", "https://www.example.com"]
        );
    }
}
