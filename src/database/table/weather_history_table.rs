use async_trait::async_trait;
use sqlx::SqlitePool;

use super::BaseTable;
use super::Table;
use crate::database::error::DatabaseError;
use crate::database::model::WeatherHistoryModel;

const SELECT_COLUMNS: &str =
    "id, subscriber_id, city_name, date, temp_avg, temp_min, temp_max, condition, wind_speed_ms";

pub struct WeatherHistoryTable {
    base: BaseTable,
}

impl WeatherHistoryTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            base: BaseTable::new(pool),
        }
    }

    /// Inserts or replaces the aggregate for (subscriber, city, date).
    /// Re-recording the same local day must not duplicate rows.
    pub async fn upsert(&self, model: &WeatherHistoryModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            INSERT INTO weather_history (
                subscriber_id, city_name, date, temp_avg, temp_min, temp_max,
                condition, wind_speed_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(subscriber_id, city_name, date) DO UPDATE SET
                temp_avg = excluded.temp_avg,
                temp_min = excluded.temp_min,
                temp_max = excluded.temp_max,
                condition = excluded.condition,
                wind_speed_ms = excluded.wind_speed_ms
            "#,
        )
        .bind(model.subscriber_id)
        .bind(&model.city_name)
        .bind(model.date)
        .bind(model.temp_avg)
        .bind(model.temp_min)
        .bind(model.temp_max)
        .bind(&model.condition)
        .bind(model.wind_speed_ms)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    pub async fn select_all_by_subscriber(
        &self,
        subscriber_id: i64,
    ) -> Result<Vec<WeatherHistoryModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, WeatherHistoryModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM weather_history WHERE subscriber_id = ? ORDER BY date"
        ))
        .bind(subscriber_id)
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }
}

#[async_trait]
impl Table<WeatherHistoryModel, i64> for WeatherHistoryTable {
    async fn create_table(&self) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS weather_history (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subscriber_id INTEGER NOT NULL,
                city_name TEXT NOT NULL,
                date TEXT NOT NULL,
                temp_avg REAL NOT NULL,
                temp_min REAL NOT NULL,
                temp_max REAL NOT NULL,
                condition TEXT NOT NULL,
                wind_speed_ms REAL NOT NULL,
                UNIQUE(subscriber_id, city_name, date),
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
        sqlx::query("DROP TABLE IF EXISTS weather_history")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select_all(&self) -> Result<Vec<WeatherHistoryModel>, DatabaseError> {
        let ret = sqlx::query_as::<_, WeatherHistoryModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM weather_history"
        ))
        .fetch_all(&self.base.pool)
        .await?;
        Ok(ret)
    }

    async fn delete_all(&self) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM weather_history")
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }

    async fn select(&self, id: &i64) -> Result<Option<WeatherHistoryModel>, DatabaseError> {
        let model = sqlx::query_as::<_, WeatherHistoryModel>(&format!(
            "SELECT {SELECT_COLUMNS} FROM weather_history WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.base.pool)
        .await?;
        Ok(model)
    }

    async fn insert(&self, model: &WeatherHistoryModel) -> Result<i64, DatabaseError> {
        let res = sqlx::query(
            r#"
            INSERT INTO weather_history (
                subscriber_id, city_name, date, temp_avg, temp_min, temp_max,
                condition, wind_speed_ms
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(model.subscriber_id)
        .bind(&model.city_name)
        .bind(model.date)
        .bind(model.temp_avg)
        .bind(model.temp_min)
        .bind(model.temp_max)
        .bind(&model.condition)
        .bind(model.wind_speed_ms)
        .execute(&self.base.pool)
        .await?;
        Ok(res.last_insert_rowid())
    }

    async fn update(&self, model: &WeatherHistoryModel) -> Result<(), DatabaseError> {
        sqlx::query(
            r#"
            UPDATE weather_history SET
                subscriber_id = ?, city_name = ?, date = ?, temp_avg = ?,
                temp_min = ?, temp_max = ?, condition = ?, wind_speed_ms = ?
            WHERE id = ?
            "#,
        )
        .bind(model.subscriber_id)
        .bind(&model.city_name)
        .bind(model.date)
        .bind(model.temp_avg)
        .bind(model.temp_min)
        .bind(model.temp_max)
        .bind(&model.condition)
        .bind(model.wind_speed_ms)
        .bind(model.id)
        .execute(&self.base.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: &i64) -> Result<(), DatabaseError> {
        sqlx::query("DELETE FROM weather_history WHERE id = ?")
            .bind(id)
            .execute(&self.base.pool)
            .await?;
        Ok(())
    }
}
