//! Category alert evaluators: rain, UV, air quality, severe weather.
//!
//! One generic job per [`AlertCategory`]. Each category has its own timer,
//! its own trigger predicate and its own dedup timestamp, so toggling or
//! breaking one category never affects the others.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDateTime;
use chrono::Utc;
use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::clock::Clock;
use crate::database::model::AlertCategory;
use crate::database::model::SubscriberModel;
use crate::dispatch::Dispatcher;
use crate::render;
use crate::service::Services;
use crate::task::Job;
use crate::timezone;
use crate::weather::Forecast;
use crate::weather::ForecastHour;
use crate::weather::WeatherGateway;

/// How far ahead the rain predicate looks.
const RAIN_LOOKAHEAD_HOURS: i64 = 2;
/// Rain probability above this triggers the rain alert, in percent.
const RAIN_CHANCE_THRESHOLD: i64 = 60;
/// UV index at or above this triggers the UV alert.
const UV_ALERT_THRESHOLD: u32 = 6;
/// Estimated AQI above this triggers the air-quality alert.
const AQI_ALERT_THRESHOLD: u32 = 100;

pub struct WeatherAlertJob {
    category: AlertCategory,
    services: Arc<Services>,
    gateway: Arc<dyn WeatherGateway>,
    dispatcher: Arc<dyn Dispatcher>,
    clock: Arc<dyn Clock>,
}

/// Per-tick forecast cache so subscribers sharing a location don't trigger
/// duplicate fetches within one fan-out. Dropped when the tick ends.
#[derive(Default)]
struct TickCache {
    forecasts: HashMap<String, Option<Forecast>>,
}

impl WeatherAlertJob {
    pub fn new(
        category: AlertCategory,
        services: Arc<Services>,
        gateway: Arc<dyn WeatherGateway>,
        dispatcher: Arc<dyn Dispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            category,
            services,
            gateway,
            dispatcher,
            clock,
        }
    }

    async fn evaluate(
        &self,
        subscriber: &SubscriberModel,
        utc_now: DateTime<Utc>,
        cache: &mut TickCache,
    ) -> anyhow::Result<()> {
        if !subscriber.alerts_enabled {
            return Ok(());
        }

        let prefs = self.services.subscribers.alert_prefs(subscriber.id).await?;
        if !prefs.is_enabled(self.category) {
            return Ok(());
        }

        // Cadence alone cannot rate-limit a predicate that stays true for
        // hours; the re-fire window is the real limit, checked before any
        // fetch happens.
        if let Some(last) = prefs.last_fired(self.category)
            && utc_now - last < self.category.refire_window()
        {
            debug!(
                "{} alert suppressed for subscriber {}: last fired {} minutes ago.",
                self.category.as_str(),
                subscriber.id,
                (utc_now - last).num_minutes()
            );
            return Ok(());
        }

        let Some(message) = self.check_trigger(subscriber, utc_now, cache).await else {
            return Ok(());
        };

        match self.dispatcher.dispatch(subscriber.id, &message).await {
            Ok(()) => {
                self.services
                    .subscribers
                    .mark_alert_sent(subscriber.id, self.category, utc_now)
                    .await?;
                info!(
                    "{} alert delivered to subscriber {}.",
                    self.category.as_str(),
                    subscriber.id
                );
            }
            Err(e) => {
                error!(
                    "Failed to dispatch {} alert to subscriber {}: {e}",
                    self.category.as_str(),
                    subscriber.id
                );
            }
        }

        Ok(())
    }

    /// Returns the rendered message when the category's predicate holds.
    /// Absent or failed data reads as "no trigger", never as "trigger".
    async fn check_trigger(
        &self,
        subscriber: &SubscriberModel,
        utc_now: DateTime<Utc>,
        cache: &mut TickCache,
    ) -> Option<String> {
        match self.category {
            AlertCategory::Rain => self.check_rain(subscriber, utc_now, cache).await,
            AlertCategory::Uv => self.check_uv(subscriber).await,
            AlertCategory::AirQuality => self.check_air_quality(subscriber).await,
            AlertCategory::SevereWeather => self.check_severe(subscriber).await,
        }
    }

    async fn check_rain(
        &self,
        subscriber: &SubscriberModel,
        utc_now: DateTime<Utc>,
        cache: &mut TickCache,
    ) -> Option<String> {
        let key = format!("{:.3},{:.3}", subscriber.latitude, subscriber.longitude);
        if !cache.forecasts.contains_key(&key) {
            let fetched = match self
                .gateway
                .forecast(subscriber.latitude, subscriber.longitude)
                .await
            {
                Ok(forecast) => forecast,
                Err(e) => {
                    warn!(
                        "Forecast fetch failed for subscriber {}: {e}",
                        subscriber.id
                    );
                    None
                }
            };
            cache.forecasts.insert(key.clone(), fetched);
        }

        let forecast = cache.forecasts.get(&key)?.as_ref()?;
        let local_now = timezone::local_time(subscriber.timezone.as_deref(), utc_now).naive_local();
        let hour = upcoming_rain(forecast, local_now)?;
        Some(render::alerts::rain_alert(&subscriber.name, hour))
    }

    async fn check_uv(&self, subscriber: &SubscriberModel) -> Option<String> {
        let uv = match self.gateway.uv_index(&subscriber.city_name).await {
            Ok(uv) => uv?,
            Err(e) => {
                warn!("UV fetch failed for subscriber {}: {e}", subscriber.id);
                return None;
            }
        };
        (uv >= UV_ALERT_THRESHOLD).then(|| render::alerts::uv_alert(&subscriber.name, uv))
    }

    async fn check_air_quality(&self, subscriber: &SubscriberModel) -> Option<String> {
        let air = match self.gateway.air_quality(&subscriber.city_name).await {
            Ok(air) => air?,
            Err(e) => {
                warn!(
                    "Air quality fetch failed for subscriber {}: {e}",
                    subscriber.id
                );
                return None;
            }
        };
        let aqi = air.estimated_aqi();
        (aqi > AQI_ALERT_THRESHOLD).then(|| render::alerts::air_quality_alert(aqi))
    }

    async fn check_severe(&self, subscriber: &SubscriberModel) -> Option<String> {
        let alerts = match self.gateway.severe_alerts(&subscriber.city_name).await {
            Ok(alerts) => alerts,
            Err(e) => {
                warn!(
                    "Severe alert fetch failed for subscriber {}: {e}",
                    subscriber.id
                );
                return None;
            }
        };

        // Only the first active advisory goes out per occurrence, to bound
        // message volume.
        alerts.first().map(render::alerts::severe_alert)
    }
}

/// First forecast hour overlapping the lookahead window that predicts rain.
fn upcoming_rain(forecast: &Forecast, local_now: NaiveDateTime) -> Option<&ForecastHour> {
    let window_end = local_now + chrono::Duration::hours(RAIN_LOOKAHEAD_HOURS);
    forecast.hourly.iter().find(|hour| {
        let hour_end = hour.time + chrono::Duration::hours(1);
        let overlaps = hour.time < window_end && hour_end > local_now;
        overlaps && (hour.rain_chance_pct > RAIN_CHANCE_THRESHOLD || hour.will_rain)
    })
}

#[async_trait]
impl Job for WeatherAlertJob {
    fn name(&self) -> &'static str {
        match self.category {
            AlertCategory::Rain => "rain-alerts",
            AlertCategory::Uv => "uv-alerts",
            AlertCategory::AirQuality => "air-quality-alerts",
            AlertCategory::SevereWeather => "severe-weather-alerts",
        }
    }

    async fn run_tick(&self) -> anyhow::Result<()> {
        let subscribers = self.services.subscribers.list_active().await?;
        debug!(
            "Evaluating {} for {} subscribers.",
            self.name(),
            subscribers.len()
        );
        let utc_now = self.clock.now_utc();
        let mut cache = TickCache::default();

        for subscriber in subscribers {
            if let Err(e) = self.evaluate(&subscriber, utc_now, &mut cache).await {
                error!(
                    "Error processing subscriber {} in {}: {e:?}",
                    subscriber.id,
                    self.name()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::weather::ConditionKind;

    fn hour(h: u32, chance: i64, will_rain: bool) -> ForecastHour {
        ForecastHour {
            time: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
            temp_c: 15.0,
            feels_like_c: 15.0,
            humidity_pct: 70,
            condition: ConditionKind::Clouds,
            condition_text: "Cloudy".to_string(),
            wind_speed_ms: 3.0,
            rain_chance_pct: chance,
            will_rain,
        }
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_upcoming_rain_inside_window() {
        let forecast = Forecast {
            hourly: vec![hour(12, 10, false), hour(13, 80, false), hour(14, 0, false)],
        };
        let found = upcoming_rain(&forecast, at(12, 0)).unwrap();
        assert_eq!(found.rain_chance_pct, 80);
    }

    #[test]
    fn test_upcoming_rain_outside_window() {
        // Rain at 16:00 is beyond a 2-hour window starting at 12:30.
        let forecast = Forecast {
            hourly: vec![hour(12, 0, false), hour(13, 0, false), hour(16, 90, true)],
        };
        assert!(upcoming_rain(&forecast, at(12, 30)).is_none());
    }

    #[test]
    fn test_upcoming_rain_will_rain_flag() {
        let forecast = Forecast {
            hourly: vec![hour(12, 30, true)],
        };
        assert!(upcoming_rain(&forecast, at(12, 15)).is_some());
    }

    #[test]
    fn test_upcoming_rain_ignores_past_hours() {
        let forecast = Forecast {
            hourly: vec![hour(8, 100, true), hour(12, 0, false)],
        };
        assert!(upcoming_rain(&forecast, at(12, 0)).is_none());
    }

    #[test]
    fn test_upcoming_rain_threshold_is_strict() {
        let forecast = Forecast {
            hourly: vec![hour(12, 60, false)],
        };
        assert!(upcoming_rain(&forecast, at(12, 0)).is_none());
    }
}
