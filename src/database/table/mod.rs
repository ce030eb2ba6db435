pub mod alert_prefs_table;
pub mod subscribers_table;
pub mod weather_history_table;

use async_trait::async_trait;
use sqlx::SqlitePool;

pub use alert_prefs_table::AlertPrefsTable;
pub use subscribers_table::SubscribersTable;
pub use weather_history_table::WeatherHistoryTable;

use crate::database::error::DatabaseError;

pub struct BaseTable {
    pub pool: SqlitePool,
}

impl BaseTable {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
pub trait Table<T, ID> {
    async fn create_table(&self) -> Result<(), DatabaseError>;
    async fn drop_table(&self) -> Result<(), DatabaseError>;
    async fn select_all(&self) -> Result<Vec<T>, DatabaseError>;
    async fn delete_all(&self) -> Result<(), DatabaseError>;
    async fn insert(&self, model: &T) -> Result<ID, DatabaseError>;
    async fn select(&self, id: &ID) -> Result<Option<T>, DatabaseError>;
    async fn update(&self, model: &T) -> Result<(), DatabaseError>;
    async fn delete(&self, id: &ID) -> Result<(), DatabaseError>;
}
