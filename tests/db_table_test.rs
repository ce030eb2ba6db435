//! Store-layer behavior: CRUD, dedup columns, history upsert.

use chrono::NaiveDate;
use chrono::TimeZone;
use chrono::Utc;
use meteo_bot::database::model::AlertCategory;
use meteo_bot::database::model::AlertPrefsModel;
use meteo_bot::database::model::WeatherHistoryModel;
use meteo_bot::database::table::Table;

mod common;

#[tokio::test]
async fn test_subscriber_roundtrip() {
    let (db, db_path) = common::setup_db().await;

    let mut subscriber = common::test_subscriber(42, "Asia/Novosibirsk", "08:30");
    db.subscribers_table.insert(&subscriber).await.unwrap();

    let stored = db.subscribers_table.select(&42).await.unwrap().unwrap();
    assert_eq!(stored.name, "User42");
    assert_eq!(stored.timezone.as_deref(), Some("Asia/Novosibirsk"));
    assert_eq!(stored.notify_time, "08:30");
    assert!(stored.is_active);
    assert_eq!(stored.last_digest, None);

    subscriber.notify_time = "09:15".to_string();
    subscriber.is_active = false;
    db.subscribers_table.update(&subscriber).await.unwrap();

    let stored = db.subscribers_table.select(&42).await.unwrap().unwrap();
    assert_eq!(stored.notify_time, "09:15");
    assert!(!stored.is_active);
    assert!(db.subscribers_table.select_all_active().await.unwrap().is_empty());

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_last_digest_roundtrip() {
    let (db, db_path) = common::setup_db().await;

    let subscriber = common::test_subscriber(1, "UTC", "07:00");
    db.subscribers_table.insert(&subscriber).await.unwrap();

    let ts = Utc.with_ymd_and_hms(2024, 6, 10, 4, 0, 0).unwrap();
    db.subscribers_table.update_last_digest(1, ts).await.unwrap();

    let stored = db.subscribers_table.select(&1).await.unwrap().unwrap();
    assert_eq!(stored.last_digest, Some(ts));

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_alert_prefs_last_fired_columns_are_independent() {
    let (db, db_path) = common::setup_db().await;

    let subscriber = common::test_subscriber(1, "UTC", "07:00");
    db.subscribers_table.insert(&subscriber).await.unwrap();
    db.alert_prefs_table
        .insert(&AlertPrefsModel::for_subscriber(1))
        .await
        .unwrap();

    let ts = Utc.with_ymd_and_hms(2024, 6, 10, 4, 0, 0).unwrap();
    db.alert_prefs_table
        .update_last_fired(1, AlertCategory::Rain, ts)
        .await
        .unwrap();

    let prefs = db.alert_prefs_table.select(&1).await.unwrap().unwrap();
    assert_eq!(prefs.last_fired(AlertCategory::Rain), Some(ts));
    for category in [
        AlertCategory::Uv,
        AlertCategory::AirQuality,
        AlertCategory::SevereWeather,
    ] {
        assert_eq!(prefs.last_fired(category), None);
    }

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_history_upsert_never_duplicates() {
    let (db, db_path) = common::setup_db().await;

    let subscriber = common::test_subscriber(1, "UTC", "07:00");
    db.subscribers_table.insert(&subscriber).await.unwrap();

    let mut entry = WeatherHistoryModel {
        id: 0,
        subscriber_id: 1,
        city_name: "City1".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 10),
        temp_avg: 17.5,
        temp_min: 11.0,
        temp_max: 24.0,
        condition: "Sunny".to_string(),
        wind_speed_ms: 3.0,
    };
    db.weather_history_table.upsert(&entry).await.unwrap();

    entry.temp_max = 26.0;
    db.weather_history_table.upsert(&entry).await.unwrap();

    let rows = db
        .weather_history_table
        .select_all_by_subscriber(1)
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].temp_max, 26.0);

    common::teardown_db(db_path).await;
}

#[tokio::test]
async fn test_deleting_subscriber_cascades() {
    let (db, db_path) = common::setup_db().await;

    let subscriber = common::test_subscriber(1, "UTC", "07:00");
    db.subscribers_table.insert(&subscriber).await.unwrap();
    db.alert_prefs_table
        .insert(&AlertPrefsModel::for_subscriber(1))
        .await
        .unwrap();

    db.subscribers_table.delete(&1).await.unwrap();
    assert!(db.alert_prefs_table.select(&1).await.unwrap().is_none());

    common::teardown_db(db_path).await;
}
