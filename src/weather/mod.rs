//! Weather data gateway: domain types and the fetch trait.
//!
//! `Ok(None)` from a fetch means "data unavailable right now"; callers must
//! treat it as skip-this-occurrence, never as a trigger.

use async_trait::async_trait;
use chrono::NaiveDateTime;

pub mod aqi;
pub mod error;
pub mod weatherapi;

use crate::weather::error::WeatherError;

/// Coarse condition classes used for advice and emoji selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionKind {
    Thunderstorm,
    Drizzle,
    Rain,
    Snow,
    Fog,
    Clear,
    Clouds,
}

impl ConditionKind {
    /// Maps a WeatherAPI condition code onto a coarse class.
    /// See https://www.weatherapi.com/docs/weather_conditions.json
    pub fn from_weatherapi_code(code: i64) -> Self {
        match code {
            1087 | 1273 | 1276 | 1279 | 1282 => Self::Thunderstorm,
            1063 | 1072 | 1150 | 1153 | 1168 | 1171 | 1180 | 1183 | 1186 | 1189 | 1198 | 1201
            | 1240 => Self::Drizzle,
            1192 | 1195 | 1243 | 1246 => Self::Rain,
            1066 | 1069 | 1114 | 1117 | 1204 | 1207 | 1210 | 1213 | 1216 | 1219 | 1222 | 1225
            | 1237 | 1249 | 1252 | 1255 | 1258 | 1261 | 1264 => Self::Snow,
            1030 | 1135 | 1147 => Self::Fog,
            1000 => Self::Clear,
            _ => Self::Clouds,
        }
    }

    /// True for classes that call for an umbrella.
    pub fn is_wet(&self) -> bool {
        matches!(self, Self::Thunderstorm | Self::Drizzle | Self::Rain)
    }
}

#[derive(Debug, Clone)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: i64,
    pub condition: ConditionKind,
    pub condition_text: String,
    pub wind_speed_ms: f64,
}

/// One hour of forecast, stamped in the location's local time.
#[derive(Debug, Clone)]
pub struct ForecastHour {
    pub time: NaiveDateTime,
    pub temp_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: i64,
    pub condition: ConditionKind,
    pub condition_text: String,
    pub wind_speed_ms: f64,
    pub rain_chance_pct: i64,
    pub will_rain: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Forecast {
    pub hourly: Vec<ForecastHour>,
}

impl Forecast {
    /// The entry covering the given local wall-clock time, if any.
    pub fn hour_at(&self, local: NaiveDateTime) -> Option<&ForecastHour> {
        self.hourly
            .iter()
            .filter(|h| h.time <= local)
            .max_by_key(|h| h.time)
    }
}

#[derive(Debug, Clone)]
pub struct AirQuality {
    pub pm2_5: f64,
}

impl AirQuality {
    pub fn estimated_aqi(&self) -> u32 {
        aqi::pm25_to_aqi(self.pm2_5)
    }
}

/// An active severe-weather advisory for a location.
#[derive(Debug, Clone)]
pub struct SevereAlert {
    pub event_name: String,
    pub description: String,
}

#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Option<Forecast>, WeatherError>;
    async fn current(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Option<CurrentConditions>, WeatherError>;
    async fn uv_index(&self, location: &str) -> Result<Option<u32>, WeatherError>;
    async fn air_quality(&self, location: &str) -> Result<Option<AirQuality>, WeatherError>;
    async fn severe_alerts(&self, location: &str) -> Result<Vec<SevereAlert>, WeatherError>;
}
