use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::SqlitePool;

use super::BaseTable;
use super::Table;
use crate::database::error::DatabaseError;
use crate::database::model::AlertCategory;
use crate::database::model::AlertPrefsModel;

const SELECT_COLUMNS: &str = "subscriber_id, daily_forecast, rain_alerts, temp_change_alerts, \
     uv_alerts, air_quality_alerts, perfect_weather_alerts, severe_weather_alerts, \
     last_rain_alert, last_uv_alert, last_air_quality_alert, last_severe_alert";

pub struct AlertPrefsTable {
    base: BaseTable,
}

impl AlertPrefsTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Records a successful send for one category. The column set is fixed
    /// per category so no SQL is built from runtime strings.
    pub async fn update_last_fired(
        &self,
        subscriber_id: i64,
        category: AlertCategory,
        ts: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        let query = match category {
            AlertCategory::Rain => {
                "UPDATE alert_prefs SET last_rain_alert = ? WHERE subscriber_id = ?"
            }
            AlertCategory::Uv => {
                "UPDATE alert_prefs SET last_uv_alert = ? WHERE subscriber_id = ?"
            }
            AlertCategory::AirQuality => {
                "UPDATE alert_prefs SET last_air_quality_alert = ? WHERE subscriber_id = ?"
            }
            AlertCategory::SevereWeather => {
                "UPDATE alert_prefs SET last_severe_alert = ? WHERE subscriber_id = ?"
            }
        };

        sqlx::query(query)
            .bind(ts)
            .bind(subscriber_id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Table<AlertPrefsModel, i64> for AlertPrefsTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS alert_prefs (
                subscriber_id INTEGER PRIMARY KEY,
                daily_forecast INTEGER NOT NULL DEFAULT 1,
                rain_alerts INTEGER NOT NULL DEFAULT 1,
                temp_change_alerts INTEGER NOT NULL DEFAULT 1,
                uv_alerts INTEGER NOT NULL DEFAULT 1,
                air_quality_alerts INTEGER NOT NULL DEFAULT 1,
                perfect_weather_alerts INTEGER NOT NULL DEFAULT 1,
                severe_weather_alerts INTEGER NOT NULL DEFAULT 1,
                last_rain_alert TEXT,
                last_uv_alert TEXT,
                last_air_quality_alert TEXT,
                last_severe_alert TEXT,
                FOREIGN KEY (subscriber_id) REFERENCES subscribers(id)
                    ON DELETE CASCADE
                    ON UPDATE CASCADE
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS alert_prefs")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<AlertPrefsModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, AlertPrefsModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM alert_prefs"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM alert_prefs")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select(&self, id: &i64) -> Result<Option<AlertPrefsModel>, DatabaseError> {
        let model = sqlx::query_as::<_, AlertPrefsModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM alert_prefs WHERE subscriber_id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(model)
    }

    async fn insert(&self, model: &AlertPrefsModel) -> Result<i64, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO alert_prefs (
                subscriber_id, daily_forecast, rain_alerts, temp_change_alerts,
                uv_alerts, air_quality_alerts, perfect_weather_alerts,
                severe_weather_alerts, last_rain_alert, last_uv_alert,
                last_air_quality_alert, last_severe_alert
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(model.subscriber_id)
        .bind(model.daily_forecast)
        .bind(model.rain_alerts)
        .bind(model.temp_change_alerts)
        .bind(model.uv_alerts)
        .bind(model.air_quality_alerts)
        .bind(model.perfect_weather_alerts)
        .bind(model.severe_weather_alerts)
        .bind(model.last_rain_alert)
        .bind(model.last_uv_alert)
        .bind(model.last_air_quality_alert)
        .bind(model.last_severe_alert)
        .execute(&self.base.pool)
        .await?;
        Ok(model.subscriber_id)
    }

    async fn update(&self, model: &AlertPrefsModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE alert_prefs SET
                daily_forecast = ?, rain_alerts = ?, temp_change_alerts = ?,
                uv_alerts = ?, air_quality_alerts = ?, perfect_weather_alerts = ?,
                severe_weather_alerts = ?, last_rain_alert = ?, last_uv_alert = ?,
                last_air_quality_alert = ?, last_severe_alert = ?
            WHERE subscriber_id = ?
            "#,
        )
        .bind(model.daily_forecast)
        .bind(model.rain_alerts)
        .bind(model.temp_change_alerts)
        .bind(model.uv_alerts)
        .bind(model.air_quality_alerts)
        .bind(model.perfect_weather_alerts)
        .bind(model.severe_weather_alerts)
        .bind(model.last_rain_alert)
        .bind(model.last_uv_alert)
        .bind(model.last_air_quality_alert)
        .bind(model.last_severe_alert)
        .bind(model.subscriber_id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM alert_prefs WHERE subscriber_id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
