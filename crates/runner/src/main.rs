//! Reference-data service entry point
//!
//! Loads the catalog once at startup, then keeps it fresh on a fixed
//! interval. A failed refresh is logged and leaves the published state
//! untouched; the next tick tries again.

use log::{error, info};
use std::process::ExitCode;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use themis_refdata::{JsonFileSource, SecurityCatalog, TzDatabase};

mod config;

use config::RunnerConfig;

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/runner.json".to_string());
    let config = match RunnerConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            error!("failed to load config {}: {}", config_path, e);
            return ExitCode::FAILURE;
        }
    };

    let catalog = SecurityCatalog::new();
    let source = JsonFileSource::new(&config.data_file);
    let offsets = TzDatabase::new();

    match catalog.load_from(&source, &offsets).await {
        Ok(stats) => info!(
            "initial load: {} exchanges, {} securities, checksum {}",
            stats.exchanges,
            stats.securities,
            catalog.checksum()
        ),
        Err(e) => {
            error!("initial load failed: {}", e);
            return ExitCode::FAILURE;
        }
    }

    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_secs.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker.tick().await; // the first tick completes immediately

    loop {
        ticker.tick().await;
        let before = catalog.checksum();
        match catalog.load_from(&source, &offsets).await {
            Ok(stats) => {
                let after = catalog.checksum();
                if *after != *before {
                    info!("security universe changed, checksum {}", after);
                }
                if stats.unresolved_exchanges > 0 || stats.unresolved_underlyings > 0 {
                    info!(
                        "refresh done with {} unresolved exchange and {} unresolved underlying references",
                        stats.unresolved_exchanges, stats.unresolved_underlyings
                    );
                }
            }
            Err(e) => error!("refresh failed, keeping published data: {}", e),
        }
    }
}
