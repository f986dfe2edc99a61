use crate::utils::AppError;
use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE: &str = "jobTracker";

/// Process configuration, read once at start-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub mongodb_uri: String,
    pub database_name: String,
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    /// Call `dotenv().ok()` first so a local `.env` file is honoured.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongodb_uri = lookup("MONGODB_URI")
            .filter(|uri| !uri.trim().is_empty())
            .ok_or_else(|| AppError::ConfigError("MONGODB_URI must be set".to_string()))?;

        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                AppError::ConfigError(format!("PORT '{}' is not a valid port: {}", raw, e))
            })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            mongodb_uri,
            database_name: lookup("MONGODB_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
