//! Forecast commands: hourly predictions, dips and summaries.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use moodcast_core::{
    render_forecast_chart, Config, ForecastSummary, Forecaster, PatternStore, PredictionPoint,
};

use crate::common::{load_samples, FilePatternStore};

/// Inputs shared by every forecast command.
#[derive(Args)]
pub struct ForecastArgs {
    /// JSON file holding an array of samples
    #[arg(long)]
    samples: PathBuf,
    /// Use patterns stored by `patterns show --save` instead of recomputing
    #[arg(long)]
    patterns: Option<PathBuf>,
    /// Hours to forecast (defaults to forecast.default_horizon_hours)
    #[arg(long)]
    hours: Option<u32>,
    /// Seed for reproducible noise (defaults to forecast.seed)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum ForecastAction {
    /// Show the hourly forecast
    Show {
        #[command(flatten)]
        args: ForecastArgs,
        /// Print prediction points as JSON
        #[arg(long)]
        json: bool,
    },
    /// List forecast hours with an energy dip
    Dips {
        #[command(flatten)]
        args: ForecastArgs,
        /// Print dips as JSON
        #[arg(long)]
        json: bool,
    },
    /// Summarize the forecast as JSON
    Summary {
        #[command(flatten)]
        args: ForecastArgs,
    },
}

pub fn run(action: ForecastAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    match action {
        ForecastAction::Show { args, json } => {
            let points = forecast(&config, &args)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&points)?);
            } else {
                println!("{}", render_forecast_chart(&points, config.time_basis));
            }
        }
        ForecastAction::Dips { args, json } => {
            let points = forecast(&config, &args)?;
            let dips = config.dip_finder().find_energy_dips(&points);
            if json {
                println!("{}", serde_json::to_string_pretty(&dips)?);
            } else if dips.is_empty() {
                println!("No energy dips in the next {} hours", points.len());
            } else {
                for dip in &dips {
                    let label = dip
                        .at()
                        .map(|at| at.format("%Y-%m-%d %H:%M UTC").to_string())
                        .unwrap_or_else(|| dip.timestamp.to_string());
                    println!("{label}  energy {:>3}", dip.energy);
                }
            }
        }
        ForecastAction::Summary { args } => {
            let points = forecast(&config, &args)?;
            let summary = ForecastSummary::from_points(&points, &config.dip_finder())
                .ok_or("forecast is empty")?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }
    Ok(())
}

fn forecast(
    config: &Config,
    args: &ForecastArgs,
) -> Result<Vec<PredictionPoint>, Box<dyn std::error::Error>> {
    let samples = load_samples(&args.samples)?;

    let stored = match &args.patterns {
        Some(path) => FilePatternStore::new(path).load_patterns()?,
        None => None,
    };
    let patterns = match stored {
        Some(patterns) => patterns,
        None => config.analyzer().analyze(&samples)?,
    };

    let mut forecast_config = config.forecast.clone();
    if args.seed.is_some() {
        forecast_config.seed = args.seed;
    }
    let hours = args.hours.unwrap_or(forecast_config.default_horizon_hours);
    let forecaster = Forecaster::with_config(forecast_config, config.baseline_table())
        .with_time_basis(config.time_basis);

    Ok(forecaster.predict(&samples, &patterns.daily, &patterns.weekly, hours)?)
}
