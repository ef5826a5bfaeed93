use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/117.0.0.0 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub scraper: ScraperConfig,
    pub scheduler: SchedulerConfig,
    pub notifications: NotificationsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    pub check_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub smtp: SmtpConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from_name: String,
    pub sender_email: Option<String>,
    pub sender_password: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000_i64)?
            .set_default("database.url", default_database_url(env::var_os("RENDER").is_some()))?
            .set_default("database.max_connections", 5_i64)?
            .set_default("scraper.user_agent", DEFAULT_USER_AGENT)?
            .set_default("scheduler.check_interval_secs", 3600_i64)?
            .set_default("notifications.smtp.host", "smtp.gmail.com")?
            .set_default("notifications.smtp.port", 465_i64)?
            .set_default("notifications.smtp.from_name", "DealRelay")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides (ignored by git)
            .add_source(File::with_name("config/local").required(false))
            .add_source(Environment::with_prefix("DEALRELAY").separator("__"))
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;

        // Mail credentials keep their plain names so existing deployments work unchanged
        if let Ok(sender_email) = env::var("SENDER_EMAIL") {
            config.notifications.smtp.sender_email = Some(sender_email);
        }
        if let Ok(sender_password) = env::var("SENDER_PASSWORD") {
            config.notifications.smtp.sender_password = Some(sender_password);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port must be greater than 0".into()));
        }

        if !self.database.url.starts_with("sqlite:") {
            return Err(ConfigError::Message("Database url must be a sqlite: url".into()));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Message("Database max_connections must be greater than 0".into()));
        }

        if self.scraper.user_agent.trim().is_empty() {
            return Err(ConfigError::Message("Scraper user_agent must not be empty".into()));
        }

        if self.scheduler.check_interval_secs == 0 {
            return Err(ConfigError::Message("Scheduler check_interval_secs must be greater than 0".into()));
        }

        if self.notifications.smtp.port == 0 {
            return Err(ConfigError::Message("SMTP port must be greater than 0".into()));
        }

        Ok(())
    }
}

impl SmtpConfig {
    /// Sender address and secret, only when both are present and non-empty.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let email = self.sender_email.as_deref().filter(|v| !v.is_empty())?;
        let password = self.sender_password.as_deref().filter(|v| !v.is_empty())?;
        Some((email, password))
    }
}

/// Managed hosting mounts a persistent disk at /data; locally the database lives under instance/.
pub fn default_database_url(managed_hosting: bool) -> String {
    if managed_hosting {
        "sqlite:///data/database.db".to_string()
    } else {
        "sqlite://instance/database.db".to_string()
    }
}
