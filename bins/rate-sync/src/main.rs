//! Hornero rate sync
//!
//! Stores the BCV rate of a day unless it is already cached. Meant to run from
//! a scheduler shortly after the central bank publishes.
//!
//! Usage:
//!   rate-sync              - today in the business time zone
//!   rate-sync 2024-03-15   - a specific day

use std::sync::Arc;

use anyhow::Context;
use chrono::NaiveDate;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use hornero_core::exchange::{Clock, ExchangeRateService, SystemClock};
use hornero_db::{MongoRateRepository, MongoStore};
use hornero_integrations::BcvRateClient;
use hornero_shared::AppConfig;
use hornero_shared::config::LoggingConfig;

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hornero={0},rate_sync={0}", logging.level)));
    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("failed to load configuration")?;
    init_tracing(&config.logging);

    let store = MongoStore::connect(&config.database).await?;
    store.initialize_indexes().await?;

    let clock = SystemClock::from_name(&config.business.timezone)?;
    let date = match std::env::args().nth(1) {
        Some(arg) => NaiveDate::parse_from_str(&arg, "%Y-%m-%d")
            .with_context(|| format!("expected a YYYY-MM-DD day, got {arg:?}"))?,
        None => clock.today(),
    };

    let rates = ExchangeRateService::new(
        Arc::new(MongoRateRepository::new(&store)),
        Arc::new(BcvRateClient::new(&config.rates)?),
        Arc::new(clock),
    );

    let rate = rates.fetch_and_save_if_missing(date).await?;
    info!(%date, rate = %rate.rate, origin = ?rate.origin, "Rate available");

    Ok(())
}
