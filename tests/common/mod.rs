use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use meteo_bot::clock::Clock;
use meteo_bot::database::Database;
use meteo_bot::database::model::SubscriberModel;
use meteo_bot::dispatch::DispatchError;
use meteo_bot::dispatch::Dispatcher;
use meteo_bot::weather::AirQuality;
use meteo_bot::weather::ConditionKind;
use meteo_bot::weather::CurrentConditions;
use meteo_bot::weather::Forecast;
use meteo_bot::weather::ForecastHour;
use meteo_bot::weather::SevereAlert;
use meteo_bot::weather::WeatherGateway;
use meteo_bot::weather::error::WeatherError;
use uuid::Uuid;

pub async fn setup_db() -> (Arc<Database>, PathBuf) {
    let uuid = Uuid::new_v4();
    let db_path = std::env::temp_dir().join(format!("meteo-bot-test-{}.db", uuid));
    let db_url = format!("sqlite://{}", db_path.to_str().unwrap());

    let db = Database::new(&db_url, db_path.to_str().unwrap())
        .await
        .expect("Failed to create database");

    db.create_all_tables()
        .await
        .expect("Failed to create tables");

    (Arc::new(db), db_path)
}

pub async fn teardown_db(db_path: PathBuf) {
    if db_path.exists() {
        let _ = std::fs::remove_file(db_path);
    }
}

/// Subscriber fixture. Coordinates and city name are derived from the id so
/// per-subscriber fetch failures can be targeted in tests.
#[allow(dead_code)]
pub fn test_subscriber(id: i64, timezone: &str, notify_time: &str) -> SubscriberModel {
    SubscriberModel {
        id,
        name: format!("User{id}"),
        city_name: format!("City{id}"),
        latitude: id as f64,
        longitude: id as f64,
        timezone: Some(timezone.to_string()),
        notify_time: notify_time.to_string(),
        created_at: Utc::now(),
        ..SubscriberModel::default()
    }
}

/// Cache key the evaluators use for a subscriber's coordinates.
#[allow(dead_code)]
pub fn location_key(subscriber: &SubscriberModel) -> String {
    format!("{:.3},{:.3}", subscriber.latitude, subscriber.longitude)
}

#[allow(dead_code)]
pub fn forecast_hour(
    date: NaiveDate,
    hour: u32,
    temp_c: f64,
    rain_chance_pct: i64,
    will_rain: bool,
) -> ForecastHour {
    ForecastHour {
        time: date.and_hms_opt(hour, 0, 0).unwrap(),
        temp_c,
        feels_like_c: temp_c - 1.0,
        humidity_pct: 60,
        condition: if will_rain {
            ConditionKind::Rain
        } else {
            ConditionKind::Clear
        },
        condition_text: "test".to_string(),
        wind_speed_ms: 3.0,
        rain_chance_pct,
        will_rain,
    }
}

/// A clear 24-hour forecast for the given local date.
#[allow(dead_code)]
pub fn clear_forecast(date: NaiveDate) -> Forecast {
    Forecast {
        hourly: (0..24).map(|h| forecast_hour(date, h, 18.0, 0, false)).collect(),
    }
}

/// A forecast where every hour predicts rain.
#[allow(dead_code)]
pub fn rainy_forecast(date: NaiveDate) -> Forecast {
    Forecast {
        hourly: (0..24).map(|h| forecast_hour(date, h, 12.0, 90, true)).collect(),
    }
}

// MOCK GATEWAY

#[derive(Default)]
pub struct MockGatewayState {
    pub forecast: Option<Forecast>,
    pub uv: Option<u32>,
    pub air_quality: Option<f64>, // pm2_5
    pub severe: Vec<SevereAlert>,
    /// Location keys (coordinates or city names) whose fetches fail.
    pub fail_locations: HashSet<String>,
    pub forecast_calls: usize,
}

#[derive(Default)]
pub struct MockGateway {
    pub state: RwLock<MockGatewayState>,
}

#[allow(dead_code)]
impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_forecast(&self, forecast: Option<Forecast>) {
        self.state.write().unwrap().forecast = forecast;
    }

    pub fn set_uv(&self, uv: Option<u32>) {
        self.state.write().unwrap().uv = uv;
    }

    pub fn set_air_quality(&self, pm2_5: Option<f64>) {
        self.state.write().unwrap().air_quality = pm2_5;
    }

    pub fn set_severe(&self, severe: Vec<SevereAlert>) {
        self.state.write().unwrap().severe = severe;
    }

    pub fn fail_location(&self, key: &str) {
        self.state.write().unwrap().fail_locations.insert(key.to_string());
    }

    pub fn forecast_calls(&self) -> usize {
        self.state.read().unwrap().forecast_calls
    }

    fn check_failure(&self, key: &str) -> Result<(), WeatherError> {
        if self.state.read().unwrap().fail_locations.contains(key) {
            return Err(WeatherError::ApiError {
                message: format!("injected failure for {key}"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl WeatherGateway for MockGateway {
    async fn forecast(&self, lat: f64, lon: f64) -> Result<Option<Forecast>, WeatherError> {
        let key = format!("{lat:.3},{lon:.3}");
        self.state.write().unwrap().forecast_calls += 1;
        self.check_failure(&key)?;
        Ok(self.state.read().unwrap().forecast.clone())
    }

    async fn current(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Option<CurrentConditions>, WeatherError> {
        let key = format!("{lat:.3},{lon:.3}");
        self.check_failure(&key)?;
        Ok(None)
    }

    async fn uv_index(&self, location: &str) -> Result<Option<u32>, WeatherError> {
        self.check_failure(location)?;
        Ok(self.state.read().unwrap().uv)
    }

    async fn air_quality(&self, location: &str) -> Result<Option<AirQuality>, WeatherError> {
        self.check_failure(location)?;
        Ok(self
            .state
            .read()
            .unwrap()
            .air_quality
            .map(|pm2_5| AirQuality { pm2_5 }))
    }

    async fn severe_alerts(&self, location: &str) -> Result<Vec<SevereAlert>, WeatherError> {
        self.check_failure(location)?;
        Ok(self.state.read().unwrap().severe.clone())
    }
}

// MOCK DISPATCHER

#[derive(Default)]
pub struct MockDispatcher {
    pub sent: RwLock<Vec<(i64, String)>>,
    pub fail_ids: RwLock<HashSet<i64>>,
}

#[allow(dead_code)]
impl MockDispatcher {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_for(&self, subscriber_id: i64) {
        self.fail_ids.write().unwrap().insert(subscriber_id);
    }

    pub fn clear_failures(&self) {
        self.fail_ids.write().unwrap().clear();
    }

    pub fn sent_count(&self) -> usize {
        self.sent.read().unwrap().len()
    }

    pub fn sent_to(&self, subscriber_id: i64) -> Vec<String> {
        self.sent
            .read()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == subscriber_id)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

#[async_trait]
impl Dispatcher for MockDispatcher {
    async fn dispatch(&self, subscriber_id: i64, text: &str) -> Result<(), DispatchError> {
        if self.fail_ids.read().unwrap().contains(&subscriber_id) {
            return Err(DispatchError::Rejected {
                subscriber_id,
                status: 403,
            });
        }
        self.sent
            .write()
            .unwrap()
            .push((subscriber_id, text.to_string()));
        Ok(())
    }
}

// FIXED CLOCK

pub struct FixedClock {
    now: RwLock<DateTime<Utc>>,
}

#[allow(dead_code)]
impl FixedClock {
    pub fn new(now: DateTime<Utc>) -> Arc<Self> {
        Arc::new(Self {
            now: RwLock::new(now),
        })
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap() = now;
    }

    pub fn advance(&self, duration: chrono::Duration) {
        let mut now = self.now.write().unwrap();
        *now += duration;
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap()
    }
}
