use std::time::Duration;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use serde::Serialize;
use sqlx::FromRow;

use crate::streak::StreakState;

/// Closed set of alert categories evaluated by the scheduler.
///
/// Each category carries its own cadence and minimum re-fire window; the
/// cadence controls how often the evaluator ticks, the window suppresses
/// repeat sends while a predicate stays true across consecutive ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertCategory {
    Rain,
    Uv,
    AirQuality,
    SevereWeather,
}

impl AlertCategory {
    pub const ALL: [AlertCategory; 4] = [
        AlertCategory::Rain,
        AlertCategory::Uv,
        AlertCategory::AirQuality,
        AlertCategory::SevereWeather,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Uv => "uv",
            Self::AirQuality => "air_quality",
            Self::SevereWeather => "severe_weather",
        }
    }

    /// Interval between evaluator ticks.
    pub fn cadence(&self) -> Duration {
        match self {
            Self::Rain => Duration::from_secs(3600),
            Self::Uv => Duration::from_secs(10800),
            Self::AirQuality => Duration::from_secs(21600),
            Self::SevereWeather => Duration::from_secs(3600),
        }
    }

    /// Minimum elapsed time since the last successful send before the
    /// category may fire again, regardless of cadence.
    pub fn refire_window(&self) -> chrono::Duration {
        match self {
            Self::Uv => chrono::Duration::hours(20),
            _ => chrono::Duration::hours(6),
        }
    }
}

/// Temperature sensitivity profile shifting clothing advice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sensitivity {
    ColdSensitive,
    #[default]
    Normal,
    HeatSensitive,
}

impl Sensitivity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColdSensitive => "cold_sensitive",
            Self::Normal => "normal",
            Self::HeatSensitive => "heat_sensitive",
        }
    }

    /// Unknown stored values degrade to `Normal`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "cold_sensitive" => Self::ColdSensitive,
            "heat_sensitive" => Self::HeatSensitive,
            _ => Self::Normal,
        }
    }

    /// Offset applied to the air temperature before picking clothing advice.
    pub fn offset_c(&self) -> f64 {
        match self {
            Self::ColdSensitive => -5.0,
            Self::Normal => 0.0,
            Self::HeatSensitive => 5.0,
        }
    }
}

#[derive(FromRow, Debug, Clone, Serialize)]
pub struct SubscriberModel {
    pub id: i64, // Chat user id
    pub name: String,
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>, // IANA identifier
    pub notify_time: String,      // Local "HH:MM"
    pub temperature_sensitivity: String,
    pub is_active: bool,
    pub alerts_enabled: bool,
    pub last_digest: Option<DateTime<Utc>>,
    pub current_streak: i64,
    pub best_streak: i64,
    pub last_check_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

impl SubscriberModel {
    pub fn sensitivity(&self) -> Sensitivity {
        Sensitivity::parse(&self.temperature_sensitivity)
    }

    pub fn streak(&self) -> StreakState {
        StreakState {
            current: self.current_streak,
            best: self.best_streak,
            last_check_date: self.last_check_date,
        }
    }
}

impl Default for SubscriberModel {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            city_name: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            timezone: None,
            notify_time: "07:00".to_string(),
            temperature_sensitivity: Sensitivity::Normal.as_str().to_string(),
            is_active: true,
            alerts_enabled: true,
            last_digest: None,
            current_streak: 0,
            best_streak: 0,
            last_check_date: None,
            created_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

/// Per-subscriber alert toggles and per-category dedup timestamps.
///
/// Toggle and last-fired access goes through [`AlertCategory`] so the
/// evaluators stay generic over categories.
#[derive(FromRow, Debug, Clone, Serialize)]
pub struct AlertPrefsModel {
    pub subscriber_id: i64,
    pub daily_forecast: bool,
    pub rain_alerts: bool,
    pub temp_change_alerts: bool,
    pub uv_alerts: bool,
    pub air_quality_alerts: bool,
    pub perfect_weather_alerts: bool,
    pub severe_weather_alerts: bool,
    pub last_rain_alert: Option<DateTime<Utc>>,
    pub last_uv_alert: Option<DateTime<Utc>>,
    pub last_air_quality_alert: Option<DateTime<Utc>>,
    pub last_severe_alert: Option<DateTime<Utc>>,
}

impl AlertPrefsModel {
    pub fn for_subscriber(subscriber_id: i64) -> Self {
        Self {
            subscriber_id,
            ..Self::default()
        }
    }

    pub fn is_enabled(&self, category: AlertCategory) -> bool {
        match category {
            AlertCategory::Rain => self.rain_alerts,
            AlertCategory::Uv => self.uv_alerts,
            AlertCategory::AirQuality => self.air_quality_alerts,
            AlertCategory::SevereWeather => self.severe_weather_alerts,
        }
    }

    pub fn last_fired(&self, category: AlertCategory) -> Option<DateTime<Utc>> {
        match category {
            AlertCategory::Rain => self.last_rain_alert,
            AlertCategory::Uv => self.last_uv_alert,
            AlertCategory::AirQuality => self.last_air_quality_alert,
            AlertCategory::SevereWeather => self.last_severe_alert,
        }
    }

    pub fn set_last_fired(&mut self, category: AlertCategory, ts: DateTime<Utc>) {
        match category {
            AlertCategory::Rain => self.last_rain_alert = Some(ts),
            AlertCategory::Uv => self.last_uv_alert = Some(ts),
            AlertCategory::AirQuality => self.last_air_quality_alert = Some(ts),
            AlertCategory::SevereWeather => self.last_severe_alert = Some(ts),
        }
    }
}

impl Default for AlertPrefsModel {
    fn default() -> Self {
        Self {
            subscriber_id: 0,
            daily_forecast: true,
            rain_alerts: true,
            temp_change_alerts: true,
            uv_alerts: true,
            air_quality_alerts: true,
            perfect_weather_alerts: true,
            severe_weather_alerts: true,
            last_rain_alert: None,
            last_uv_alert: None,
            last_air_quality_alert: None,
            last_severe_alert: None,
        }
    }
}

/// One day of aggregated weather for a subscriber's primary city.
#[derive(FromRow, Debug, Clone, Serialize, Default)]
pub struct WeatherHistoryModel {
    pub id: i64,
    pub subscriber_id: i64,
    pub city_name: String,
    pub date: Option<NaiveDate>,
    pub temp_avg: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub condition: String,
    pub wind_speed_ms: f64,
}
