use std::str::FromStr;

use log::debug;
use log::info;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;

use crate::database::table::AlertPrefsTable;
use crate::database::table::SubscribersTable;
use crate::database::table::Table;
use crate::database::table::WeatherHistoryTable;

pub mod error;
pub mod model;
pub mod table;

pub struct Database {
    pub pool: SqlitePool,
    pub subscribers_table: SubscribersTable,
    pub alert_prefs_table: AlertPrefsTable,
    pub weather_history_table: WeatherHistoryTable,
}

impl Database {
    pub async fn new(db_url: &str, db_path: &str) -> anyhow::Result<Self> {
        let path = std::path::Path::new(db_path);
        if !path.exists() {
            debug!("Database path {db_path} does not exist. Creating...");
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, "")?;
            info!("Created {db_path}");
        }

        debug!("Connecting to db...");
        let opts = SqliteConnectOptions::from_str(db_url)?.foreign_keys(true);
        let pool = SqlitePool::connect_with(opts).await?;
        info!("Connected to db.");

        let subscribers_table = SubscribersTable::new(pool.clone());
        let alert_prefs_table = AlertPrefsTable::new(pool.clone());
        let weather_history_table = WeatherHistoryTable::new(pool.clone());

        Ok(Self {
            pool,
            subscribers_table,
            alert_prefs_table,
            weather_history_table,
        })
    }

    pub async fn create_all_tables(&self) -> anyhow::Result<()> {
        self.subscribers_table.create_table().await?;
        self.alert_prefs_table.create_table().await?;
        self.weather_history_table.create_table().await?;
        Ok(())
    }

    pub async fn drop_all_tables(&self) -> anyhow::Result<()> {
        self.weather_history_table.drop_table().await?;
        self.alert_prefs_table.drop_table().await?;
        self.subscribers_table.drop_table().await?;
        Ok(())
    }

    pub async fn delete_all_tables(&self) -> anyhow::Result<()> {
        self.weather_history_table.delete_all().await?;
        self.alert_prefs_table.delete_all().await?;
        self.subscribers_table.delete_all().await?;
        Ok(())
    }
}
