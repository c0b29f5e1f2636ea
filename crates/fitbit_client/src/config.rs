use crate::FitbitError;
use std::path::PathBuf;

pub const DEFAULT_BASE_URL: &str = "https://api.fitbit.com";
pub const DEFAULT_CONFIG_DIR: &str = "config";

#[derive(Clone, Debug)]
pub struct Config {
    pub client_id: String,
    /// Directory holding the persisted refresh token.
    pub config_dir: PathBuf,
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Self, FitbitError> {
        Self::from_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads configuration values using the provided
    /// function, so tests never touch the process environment.
    pub fn from_env_with<F>(mut get: F) -> Result<Self, FitbitError>
    where
        F: FnMut(&str) -> Option<String>,
    {
        let client_id = get("FITBIT_CLIENT_ID")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| FitbitError::Config("FITBIT_CLIENT_ID is not set".into()))?;
        let config_dir = get("FITBIT_CONFIG_DIR")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONFIG_DIR.into());
        let base_url = get("FITBIT_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        Ok(Self {
            client_id,
            config_dir: PathBuf::from(config_dir),
            base_url,
        })
    }
}
