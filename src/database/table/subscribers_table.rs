use async_trait::async_trait;
use chrono::DateTime;
use chrono::NaiveDate;
use chrono::Utc;
use sqlx::SqlitePool;

use super::BaseTable;
use super::Table;
use crate::database::error::DatabaseError;
use crate::database::model::SubscriberModel;

const SELECT_COLUMNS: &str = "id, name, city_name, latitude, longitude, timezone, notify_time, \
     temperature_sensitivity, is_active, alerts_enabled, last_digest, current_streak, \
     best_streak, last_check_date, created_at";

pub struct SubscribersTable {
    base: BaseTable,
}

impl SubscribersTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Subscribers that receive the daily digest and are visible to the
    /// alert evaluators. Deactivation is a flag flip owned by onboarding.
    pub async fn select_all_active(&self) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM subscribers WHERE is_active = 1"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    pub async fn update_last_digest(
        &self,
        id: i64,
        ts: DateTime<Utc>,
    ) -> Result<(), DatabaseError> {
        sqlx::query("UPDATE subscribers SET last_digest = ? WHERE id = ?")
            .bind(ts)
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    pub async fn update_streak(
        &self,
        id: i64,
        current: i64,
        best: i64,
        last_check_date: NaiveDate,
    ) -> Result<(), DatabaseError> {
        sqlx::query(
            "UPDATE subscribers SET current_streak = ?, best_streak = ?, last_check_date = ? \
             WHERE id = ?",
        )
        .bind(current)
        .bind(best)
        .bind(last_check_date)
        .bind(id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Table<SubscriberModel, i64> for SubscribersTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS subscribers (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                city_name TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                timezone TEXT,
                notify_time TEXT NOT NULL DEFAULT '07:00',
                temperature_sensitivity TEXT NOT NULL DEFAULT 'normal',
                is_active INTEGER NOT NULL DEFAULT 1,
                alerts_enabled INTEGER NOT NULL DEFAULT 1,
                last_digest TEXT,
                current_streak INTEGER NOT NULL DEFAULT 0,
                best_streak INTEGER NOT NULL DEFAULT 0,
                last_check_date TEXT,
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn drop_table(&self) -> Result<(), DatabaseError> {
        sqlx::query("DROP TABLE IF EXISTS subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<SubscriberModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM subscribers"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select(&self, id: &i64) -> Result<Option<SubscriberModel>, DatabaseError> {
        let model = sqlx::query_as::<_, SubscriberModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM subscribers WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(model)
    }

    async fn insert(&self, model: &SubscriberModel) -> Result<i64, DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO subscribers (
                id, name, city_name, latitude, longitude, timezone, notify_time,
                temperature_sensitivity, is_active, alerts_enabled, last_digest,
                current_streak, best_streak, last_check_date, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(model.id)
        .bind(&model.name)
        .bind(&model.city_name)
        .bind(model.latitude)
        .bind(model.longitude)
        .bind(&model.timezone)
        .bind(&model.notify_time)
        .bind(&model.temperature_sensitivity)
        .bind(model.is_active)
        .bind(model.alerts_enabled)
        .bind(model.last_digest)
        .bind(model.current_streak)
        .bind(model.best_streak)
        .bind(model.last_check_date)
        .bind(model.created_at)
        .execute(&self.base.pool)
        .await?;
        Ok(model.id)
    }

    async fn update(&self, model: &SubscriberModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE subscribers SET
                name = ?, city_name = ?, latitude = ?, longitude = ?, timezone = ?,
                notify_time = ?, temperature_sensitivity = ?, is_active = ?,
                alerts_enabled = ?, last_digest = ?, current_streak = ?,
                best_streak = ?, last_check_date = ?, created_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&model.name)
        .bind(&model.city_name)
        .bind(model.latitude)
        .bind(model.longitude)
        .bind(&model.timezone)
        .bind(&model.notify_time)
        .bind(&model.temperature_sensitivity)
        .bind(model.is_active)
        .bind(model.alerts_enabled)
        .bind(model.last_digest)
        .bind(model.current_streak)
        .bind(model.best_streak)
        .bind(model.last_check_date)
        .bind(model.created_at)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM subscribers WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
