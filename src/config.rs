use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

#[derive(Clone, Default)]
pub struct Config {
    pub digest_interval: Duration,
    pub db_url: String,
    pub db_path: String,
    pub logs_path: PathBuf,
    pub weather_api_url: String,
    pub weather_api_key: String,
    pub webhook_url: String,
}

impl Config {
    /// Reads configuration from the environment. Required keys fail with
    /// [`AppError::MissingConfig`]; everything else falls back to a default.
    pub fn load() -> Result<Self, AppError> {
        Ok(Self {
            digest_interval: std::env::var("DIGEST_INTERVAL")
                .unwrap_or("60".to_string())
                .parse::<u32>()
                .map_or(Duration::new(60, 0), |v| Duration::new(v.into(), 0)),
            db_url: std::env::var("DB_URL").unwrap_or("sqlite://data/meteo.db".to_string()),
            db_path: std::env::var("DB_PATH").unwrap_or("data/meteo.db".to_string()),
            logs_path: PathBuf::from(std::env::var("LOGS_PATH").unwrap_or("logs".to_string())),
            weather_api_url: std::env::var("WEATHERAPI_URL")
                .unwrap_or("https://api.weatherapi.com/v1".to_string()),
            weather_api_key: Self::required("WEATHERAPI_KEY")?,
            webhook_url: Self::required("WEBHOOK_URL")?,
        })
    }

    fn required(key: &str) -> Result<String, AppError> {
        std::env::var(key).map_err(|_| AppError::MissingConfig {
            key: key.to_string(),
        })
    }
}
