pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::currency::FxConverter;
use crate::core::error::EngineError;
use crate::core::portfolio;
use crate::core::valuation::Valuator;
use crate::providers::tefas::TefasProvider;
use crate::providers::yahoo_finance::{YahooCurrencyProvider, YahooQuoteProvider};
use crate::store::csv::{CsvHistoryLog, CsvRegistry};
use crate::store::{HistoryStore, RegistryStore};
use anyhow::Result;
use chrono::Local;
use std::time::Duration;
use tracing::{debug, error, info, warn};

pub enum AppCommand {
    Run,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    match command {
        AppCommand::Run => run(config_path).await,
    }
}

/// One daily valuation run: read the registry and prior history, value
/// every asset, report, then persist today's snapshot.
async fn run(config_path: Option<&str>) -> Result<()> {
    info!("Portfolio valuation starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let registry = CsvRegistry::new(&config.registry_path, &config.home_currency);
    let records = registry.read_all().map_err(EngineError::RegistryUnreadable)?;

    let history_log = CsvHistoryLog::new(&config.history_path);
    let prior_history = match history_log.read_all() {
        Ok(history) => history,
        Err(e) => {
            let err = EngineError::HistoryUnreadable(e);
            warn!(error = %err, "Proceeding with empty history; trailing returns will be zero");
            Vec::new()
        }
    };

    let currency_provider = YahooCurrencyProvider::new(config.yahoo_base_url());
    let fx = FxConverter::new(&currency_provider, &config.home_currency);
    let quote_provider = YahooQuoteProvider::new(config.yahoo_base_url());
    let fund_provider = TefasProvider::new(config.tefas_base_url());

    let today = Local::now().date_naive();
    let valuator = Valuator::new(
        &quote_provider,
        &fund_provider,
        &fx,
        today,
        Duration::from_millis(config.throttle_ms),
    );

    let pb = cli::ui::new_progress_bar(records.len() as u64, true);
    pb.set_message("Valuing assets...");
    let daily_run =
        portfolio::run_daily_valuation(&records, &valuator, &prior_history, &|| pb.inc(1)).await?;
    pb.finish_and_clear();

    println!("{}", cli::report::render(&daily_run, &config.home_currency, today));

    // The report above stands on its own; a failed write must not undo it.
    if let Err(e) = history_log.replace_day(today, &daily_run.snapshot) {
        let err = EngineError::PersistenceFailure(e);
        error!(error = %err, "The reported values are computed correctly; only persistence failed");
        return Err(err.into());
    }

    info!(
        "History log updated with {} snapshots for {}",
        daily_run.snapshot.len(),
        today
    );
    Ok(())
}
