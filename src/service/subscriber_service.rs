//! Subscriber store operations used by the evaluators.

use std::sync::Arc;

use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use log::debug;

use crate::database::Database;
use crate::database::model::AlertCategory;
use crate::database::model::AlertPrefsModel;
use crate::database::model::SubscriberModel;
use crate::database::model::WeatherHistoryModel;
use crate::database::table::Table;
use crate::service::error::ServiceError;
use crate::streak;
use crate::streak::StreakAdvance;

/// Service over the subscriber, alert-preference and history tables.
///
/// All mutation is single-row; the evaluators call these after a confirmed
/// dispatch, never before.
pub struct SubscriberService {
    pub db: Arc<Database>,
}

impl SubscriberService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Registers a subscriber with default preferences. Owned by the
    /// onboarding surface; kept here so tests and tooling share one path.
    pub async fn register(&self, model: &SubscriberModel) -> Result<(), ServiceError> {
        self.db.subscribers_table.insert(model).await?;
        self.db
            .alert_prefs_table
            .insert(&AlertPrefsModel::for_subscriber(model.id))
            .await?;
        Ok(())
    }

    pub async fn list_active(&self) -> Result<Vec<SubscriberModel>, ServiceError> {
        Ok(self.db.subscribers_table.select_all_active().await?)
    }

    pub async fn get(&self, subscriber_id: i64) -> Result<SubscriberModel, ServiceError> {
        self.db
            .subscribers_table
            .select(&subscriber_id)
            .await?
            .ok_or(ServiceError::UnknownSubscriber { subscriber_id })
    }

    /// Alert preferences for a subscriber. A missing row degrades to the
    /// defaults (everything enabled, nothing fired) instead of erroring so
    /// one malformed subscriber cannot abort a fan-out.
    pub async fn alert_prefs(&self, subscriber_id: i64) -> Result<AlertPrefsModel, ServiceError> {
        match self.db.alert_prefs_table.select(&subscriber_id).await? {
            Some(prefs) => Ok(prefs),
            None => {
                debug!("Subscriber {subscriber_id} has no alert_prefs row; using defaults.");
                Ok(AlertPrefsModel::for_subscriber(subscriber_id))
            }
        }
    }

    pub async fn update_prefs(&self, prefs: &AlertPrefsModel) -> Result<(), ServiceError> {
        Ok(self.db.alert_prefs_table.update(prefs).await?)
    }

    /// Marks the daily digest as delivered at `ts`.
    pub async fn mark_digest_sent(
        &self,
        subscriber_id: i64,
        ts: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        Ok(self
            .db
            .subscribers_table
            .update_last_digest(subscriber_id, ts)
            .await?)
    }

    /// Marks a category alert as delivered at `ts`. Inserts the preferences
    /// row first when absent so the timestamp is never lost.
    pub async fn mark_alert_sent(
        &self,
        subscriber_id: i64,
        category: AlertCategory,
        ts: DateTime<Utc>,
    ) -> Result<(), ServiceError> {
        if self.db.alert_prefs_table.select(&subscriber_id).await?.is_none() {
            self.db
                .alert_prefs_table
                .insert(&AlertPrefsModel::for_subscriber(subscriber_id))
                .await?;
        }
        self.db
            .alert_prefs_table
            .update_last_fired(subscriber_id, category, ts)
            .await?;
        Ok(())
    }

    /// Advances the engagement streak for the subscriber's local `today`.
    /// Same-day calls are no-ops and do not touch the row.
    pub async fn advance_streak(
        &self,
        subscriber_id: i64,
        today: NaiveDate,
    ) -> Result<StreakAdvance, ServiceError> {
        let subscriber = self.get(subscriber_id).await?;
        let advance = streak::advance(&subscriber.streak(), today);

        if advance.changed {
            self.db
                .subscribers_table
                .update_streak(subscriber_id, advance.current, advance.best, today)
                .await?;
        }

        Ok(advance)
    }

    pub async fn record_history(&self, model: &WeatherHistoryModel) -> Result<(), ServiceError> {
        Ok(self.db.weather_history_table.upsert(model).await?)
    }
}
