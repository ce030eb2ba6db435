//! Daily weather history aggregation job.
//!
//! Once a day, the day's forecast for each subscriber's primary city is
//! reduced to min/max/avg temperature and stored keyed by the subscriber's
//! local date. The upsert makes re-runs for the same day harmless.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use log::debug;
use log::error;
use log::warn;

use crate::clock::Clock;
use crate::database::model::SubscriberModel;
use crate::database::model::WeatherHistoryModel;
use crate::service::Services;
use crate::task::Job;
use crate::timezone;
use crate::weather::WeatherGateway;

pub struct HistoryRecorderJob {
    services: Arc<Services>,
    gateway: Arc<dyn WeatherGateway>,
    clock: Arc<dyn Clock>,
}

impl HistoryRecorderJob {
    pub fn new(
        services: Arc<Services>,
        gateway: Arc<dyn WeatherGateway>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            services,
            gateway,
            clock,
        }
    }

    async fn evaluate(
        &self,
        subscriber: &SubscriberModel,
        utc_now: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let forecast = match self
            .gateway
            .forecast(subscriber.latitude, subscriber.longitude)
            .await
        {
            Ok(Some(forecast)) if !forecast.hourly.is_empty() => forecast,
            Ok(_) => {
                debug!(
                    "No forecast available for subscriber {}; skipping history entry.",
                    subscriber.id
                );
                return Ok(());
            }
            Err(e) => {
                warn!(
                    "Forecast fetch failed for subscriber {}: {e}",
                    subscriber.id
                );
                return Ok(());
            }
        };

        let temps: Vec<f64> = forecast.hourly.iter().map(|h| h.temp_c).collect();
        let temp_min = temps.iter().copied().fold(f64::INFINITY, f64::min);
        let temp_max = temps.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let temp_avg = temps.iter().sum::<f64>() / temps.len() as f64;

        let Some(first) = forecast.hourly.first() else {
            return Ok(());
        };
        let date = timezone::local_time(subscriber.timezone.as_deref(), utc_now).date_naive();

        let model = WeatherHistoryModel {
            id: 0,
            subscriber_id: subscriber.id,
            city_name: subscriber.city_name.clone(),
            date: Some(date),
            temp_avg,
            temp_min,
            temp_max,
            condition: first.condition_text.clone(),
            wind_speed_ms: first.wind_speed_ms,
        };
        self.services.subscribers.record_history(&model).await?;
        debug!(
            "Recorded weather history for subscriber {} on {}.",
            subscriber.id, date
        );

        Ok(())
    }
}

#[async_trait]
impl Job for HistoryRecorderJob {
    fn name(&self) -> &'static str {
        "history-recorder"
    }

    async fn run_tick(&self) -> anyhow::Result<()> {
        let subscribers = self.services.subscribers.list_active().await?;
        debug!(
            "Recording weather history for {} subscribers.",
            subscribers.len()
        );
        let utc_now = self.clock.now_utc();

        for subscriber in subscribers {
            if let Err(e) = self.evaluate(&subscriber, utc_now).await {
                error!(
                    "Error recording history for subscriber {}: {e:?}",
                    subscriber.id
                );
            }
        }

        Ok(())
    }
}
