#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to parse API response: {0}")]
    JsonParseFailed(#[from] serde_json::Error),

    #[error("Weather API error: {message}")]
    ApiError { message: String },

    #[error("Invalid data from API: missing field `{field}`.")]
    MissingField { field: String },

    #[error("Invalid time format received: {time}.")]
    InvalidTime { time: String },
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::RequestFailed(Box::new(e))
    }
}
