use crate::pipeline_config::PipelineConfig;
use crate::ConfigError;

/// Login credentials for the platform session.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub instagram_username: Option<String>,
    pub instagram_password: Option<String>,
    pub log_level: String,
    pub headless: bool,
    pub user_agent: String,
    pub window_width: u32,
    pub window_height: u32,
    pub sentiment_url: Option<String>,
    pub sentiment_timeout_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub pipeline: PipelineConfig,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `DATABASE_URL` was not set.
    pub fn require_database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first absent
    /// credential variable.
    pub fn credentials(&self) -> Result<Credentials, ConfigError> {
        let username = self
            .instagram_username
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("INSTAGRAM_USERNAME".to_string()))?;
        let password = self
            .instagram_password
            .clone()
            .ok_or_else(|| ConfigError::MissingEnvVar("INSTAGRAM_PASSWORD".to_string()))?;
        Ok(Credentials { username, password })
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "database_url",
                &self.database_url.as_ref().map(|_| "[redacted]"),
            )
            .field("instagram_username", &self.instagram_username)
            .field(
                "instagram_password",
                &self.instagram_password.as_ref().map(|_| "[redacted]"),
            )
            .field("log_level", &self.log_level)
            .field("headless", &self.headless)
            .field("user_agent", &self.user_agent)
            .field("window_width", &self.window_width)
            .field("window_height", &self.window_height)
            .field("sentiment_url", &self.sentiment_url)
            .field("sentiment_timeout_secs", &self.sentiment_timeout_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field("pipeline", &self.pipeline)
            .finish()
    }
}
