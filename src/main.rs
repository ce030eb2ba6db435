//! Application entry point for meteo-bot.
//!
//! Initializes all components and starts the notification scheduler.

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use anyhow::Result;
use dotenv::dotenv;
use log::debug;
use log::info;

use meteo_bot::clock::Clock;
use meteo_bot::clock::SystemClock;
use meteo_bot::config::Config;
use meteo_bot::database::Database;
use meteo_bot::database::model::AlertCategory;
use meteo_bot::dispatch::Dispatcher;
use meteo_bot::dispatch::webhook::WebhookDispatcher;
use meteo_bot::logging::setup_logging;
use meteo_bot::service::Services;
use meteo_bot::task::daily_digest::DailyDigestJob;
use meteo_bot::task::history_recorder::HistoryRecorderJob;
use meteo_bot::task::scheduler::Scheduler;
use meteo_bot::task::weather_alerts::WeatherAlertJob;
use meteo_bot::weather::WeatherGateway;
use meteo_bot::weather::weatherapi::WeatherApiGateway;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let init_start = Instant::now();
    let config = load_config()?;

    let db = setup_database(&config, init_start).await?;
    let services = Arc::new(Services::new(db.clone()));

    let gateway: Arc<dyn WeatherGateway> = Arc::new(WeatherApiGateway::new(
        config.weather_api_url.clone(),
        config.weather_api_key.clone(),
    ));
    let dispatcher: Arc<dyn Dispatcher> =
        Arc::new(WebhookDispatcher::new(config.webhook_url.clone()));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let scheduler = setup_scheduler(&config, services, gateway, dispatcher, clock, init_start);

    run(&scheduler, init_start).await
}

fn load_config() -> Result<Arc<Config>> {
    debug!("Loading configuration...");
    let config = Arc::new(Config::load()?);
    setup_logging(&config)?;
    info!("Starting meteo-bot...");
    Ok(config)
}

async fn setup_database(config: &Config, init_start: Instant) -> Result<Arc<Database>> {
    debug!("Setting up Database...");
    let db = Arc::new(Database::new(&config.db_url, &config.db_path).await?);

    info!("Creating database tables...");
    db.create_all_tables().await?;
    info!(
        "Database setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );

    Ok(db)
}

fn setup_scheduler(
    config: &Config,
    services: Arc<Services>,
    gateway: Arc<dyn WeatherGateway>,
    dispatcher: Arc<dyn Dispatcher>,
    clock: Arc<dyn Clock>,
    init_start: Instant,
) -> Scheduler {
    debug!("Setting up Scheduler...");
    let scheduler = Scheduler::new();

    // The digest ticks every minute because it matches against a local
    // HH:MM; its grace window is under a minute so a stale tick can never
    // land in the wrong minute.
    scheduler.register_job(
        config.digest_interval,
        Duration::from_secs(10),
        Duration::from_secs(30),
        Arc::new(DailyDigestJob::new(
            services.clone(),
            gateway.clone(),
            dispatcher.clone(),
            clock.clone(),
        )),
    );

    for category in AlertCategory::ALL {
        scheduler.register_job(
            category.cadence(),
            Duration::from_secs(30),
            Duration::from_secs(300),
            Arc::new(WeatherAlertJob::new(
                category,
                services.clone(),
                gateway.clone(),
                dispatcher.clone(),
                clock.clone(),
            )),
        );
    }

    scheduler.register_job(
        Duration::from_secs(86_400),
        Duration::from_secs(60),
        Duration::from_secs(3600),
        Arc::new(HistoryRecorderJob::new(services, gateway, clock)),
    );

    info!(
        "Scheduler setup complete ({:.2}s).",
        init_start.elapsed().as_secs_f64()
    );
    scheduler
}

async fn run(scheduler: &Scheduler, init_start: Instant) -> Result<()> {
    info!(
        "meteo-bot is up in {:.2}s. Press Ctrl+C to stop.",
        init_start.elapsed().as_secs_f64()
    );

    tokio::signal::ctrl_c().await?;
    info!("Ctrl+C received, shutting down.");
    scheduler.stop();

    Ok(())
}
