//! Calibration maintenance and validation script.
//!
//! Computes, persists, validates, and health-checks confidence calibration
//! curves against the advisor database.

use advisor_core::config::Config;
use advisor_core::db;
use calibration_engine::{CalibrationService, PgCalibrationStore, DEFAULT_STALE_AGE_DAYS};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "calibrate",
    about = "Compute, validate, and inspect confidence calibrations"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fit a calibration curve from recent trade history.
    Compute {
        /// Market to calibrate (e.g. BTC).
        market: String,
        /// Lookback window in days (defaults to CALIBRATION_WINDOW_DAYS).
        #[arg(long)]
        window_days: Option<i64>,
        /// Persist the computed curve as a new history row.
        #[arg(long)]
        save: bool,
    },
    /// Re-score recent history through the latest stored curve.
    Validate {
        market: String,
        #[arg(long)]
        window_days: Option<i64>,
    },
    /// Report health and staleness of the latest stored curve.
    Health { market: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "calibration_engine=info,advisor_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database).await?;
    db::run_migrations(&pool).await?;

    let service = CalibrationService::new(PgCalibrationStore::new(pool));

    match cli.command {
        Command::Compute {
            market,
            window_days,
            save,
        } => {
            let window = window_days.unwrap_or(config.calibration.default_window_days);
            let data = service.compute_calibration(&market, window).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);

            if save {
                let id = service.save_calibration(&data).await?;
                println!("saved calibration record {id}");
            }
        }
        Command::Validate {
            market,
            window_days,
        } => {
            let window = window_days.unwrap_or(config.calibration.default_window_days);
            let Some(data) = service.latest_calibration(&market).await? else {
                anyhow::bail!(
                    "no stored calibration for {market}; run `calibrate compute --save` first"
                );
            };

            let report = service.validate_calibration(&data, window).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Health { market } => {
            let health = service.calibration_health(&market).await?;
            let stale = service
                .is_calibration_stale(&market, DEFAULT_STALE_AGE_DAYS)
                .await?;
            println!("{market}: {health:?} (stale: {stale})");
        }
    }

    Ok(())
}
