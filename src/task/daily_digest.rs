//! Daily digest evaluator.
//!
//! Once per tick, each active subscriber's local wall-clock time is compared
//! against their preferred delivery minute. The HH:MM comparison comes first
//! because it is free; the dedup read, the forecast fetch and the dispatch
//! only happen for subscribers whose minute matches.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Timelike;
use chrono::Utc;
use log::debug;
use log::error;
use log::info;
use log::warn;

use crate::clock::Clock;
use crate::database::model::SubscriberModel;
use crate::dispatch::Dispatcher;
use crate::render;
use crate::service::Services;
use crate::streak;
use crate::task::Job;
use crate::timezone;
use crate::weather::WeatherGateway;

pub struct DailyDigestJob {
    services: Arc<Services>,
    gateway: Arc<dyn WeatherGateway>,
    dispatcher: Arc<dyn Dispatcher>,
    clock: Arc<dyn Clock>,
}

impl DailyDigestJob {
    pub fn new(
        services: Arc<Services>,
        gateway: Arc<dyn WeatherGateway>,
        dispatcher: Arc<dyn Dispatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
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
    ) -> anyhow::Result<()> {
        let zone = timezone::resolve_zone(subscriber.timezone.as_deref()).zone();
        let local_now = utc_now.with_timezone(&zone);

        if local_now.format("%H:%M").to_string() != subscriber.notify_time {
            return Ok(());
        }

        // Dedup on the subscriber's local calendar date, not the UTC date.
        if let Some(last) = subscriber.last_digest
            && last.with_timezone(&zone).date_naive() == local_now.date_naive()
        {
            debug!("Digest already sent to subscriber {} today.", subscriber.id);
            return Ok(());
        }

        info!("Sending daily digest to subscriber {}...", subscriber.id);

        let forecast = match self
            .gateway
            .forecast(subscriber.latitude, subscriber.longitude)
            .await
        {
            Ok(Some(forecast)) if !forecast.hourly.is_empty() => forecast,
            Ok(_) => {
                debug!(
                    "No forecast available for subscriber {}; skipping occurrence.",
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

        // Enrichment only; a missing UV or AQI reading never blocks the digest.
        let uv = match self.gateway.uv_index(&subscriber.city_name).await {
            Ok(uv) => uv,
            Err(e) => {
                warn!("UV fetch failed for subscriber {}: {e}", subscriber.id);
                None
            }
        };
        let aqi = match self.gateway.air_quality(&subscriber.city_name).await {
            Ok(air) => air.map(|air| air.estimated_aqi()),
            Err(e) => {
                warn!(
                    "Air quality fetch failed for subscriber {}: {e}",
                    subscriber.id
                );
                None
            }
        };

        let today = local_now.date_naive();
        let advance = streak::advance(&subscriber.streak(), today);

        let body = render::digest::body(
            &subscriber.city_name,
            &subscriber.name,
            subscriber.sensitivity(),
            local_now.naive_local(),
            &forecast,
            uv,
            aqi,
            advance.changed.then_some(&advance),
        );
        let message = format!(
            "{}\n\n{}",
            render::greeting(&subscriber.name, local_now.hour()),
            body
        );

        match self.dispatcher.dispatch(subscriber.id, &message).await {
            Ok(()) => {
                self.services
                    .subscribers
                    .mark_digest_sent(subscriber.id, utc_now)
                    .await?;
                let recorded = self
                    .services
                    .subscribers
                    .advance_streak(subscriber.id, today)
                    .await?;
                info!(
                    "Daily digest delivered to subscriber {} (streak {}).",
                    subscriber.id, recorded.current
                );
            }
            Err(e) => {
                // No dedup write: the send was not confirmed, so the next
                // matching tick may retry.
                error!(
                    "Failed to dispatch digest to subscriber {}: {e}",
                    subscriber.id
                );
            }
        }

        Ok(())
    }
}

#[async_trait]
impl Job for DailyDigestJob {
    fn name(&self) -> &'static str {
        "daily-digest"
    }

    async fn run_tick(&self) -> anyhow::Result<()> {
        let subscribers = self.services.subscribers.list_active().await?;
        debug!(
            "Evaluating daily digest for {} subscribers.",
            subscribers.len()
        );
        let utc_now = self.clock.now_utc();

        for subscriber in subscribers {
            if let Err(e) = self.evaluate(&subscriber, utc_now).await {
                error!("Error processing subscriber {}: {e:?}", subscriber.id);
            }
        }

        Ok(())
    }
}
