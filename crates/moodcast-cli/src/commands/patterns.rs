//! Pattern commands: summarize a sample file by hour and weekday.

use std::path::PathBuf;

use clap::Subcommand;
use moodcast_core::{Config, PatternStore, PatternSummary};

use crate::common::{load_samples, parse_day, FilePatternStore, DAY_NAMES};

#[derive(Subcommand)]
pub enum PatternsAction {
    /// Show the daily chart and weekly levels
    Show {
        /// JSON file holding an array of samples
        #[arg(long)]
        samples: PathBuf,
        /// Print the pattern summary as JSON
        #[arg(long)]
        json: bool,
        /// Store the computed patterns in this file
        #[arg(long)]
        save: Option<PathBuf>,
    },
    /// List hours whose blended energy reaches a threshold
    Hours {
        /// JSON file holding an array of samples
        #[arg(long)]
        samples: PathBuf,
        /// Minimum blended energy (0-100)
        #[arg(long, default_value_t = 60)]
        min_energy: u8,
    },
    /// Show the blended level for one weekday
    Day {
        /// JSON file holding an array of samples
        #[arg(long)]
        samples: PathBuf,
        /// Day of week (0-6 or sun/mon/tue/wed/thu/fri/sat)
        day: String,
    },
}

pub fn run(action: PatternsAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PatternsAction::Show {
            samples,
            json,
            save,
        } => {
            let summary = analyze(&samples)?;
            if let Some(path) = save {
                FilePatternStore::new(&path).save_patterns(&summary)?;
                eprintln!("patterns saved to {}", path.display());
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_summary(&summary);
            }
        }
        PatternsAction::Hours {
            samples,
            min_energy,
        } => {
            let summary = analyze(&samples)?;
            let hours = summary.high_energy_hours(min_energy);
            if hours.is_empty() {
                println!("No hours with energy >= {min_energy}");
            }
            for hour in hours {
                if let Some(pattern) = summary.hour(hour) {
                    println!(
                        "{:02}:00  energy {:>3}  mood {:>3}  ({} entries)",
                        hour, pattern.average_energy, pattern.average_mood, pattern.entry_count
                    );
                }
            }
        }
        PatternsAction::Day { samples, day } => {
            let day_of_week = parse_day(&day).ok_or_else(|| {
                format!("Invalid day: '{day}'. Use 0-6 or sun/mon/tue/wed/thu/fri/sat")
            })?;
            let summary = analyze(&samples)?;
            let pattern = summary
                .day(day_of_week)
                .ok_or_else(|| format!("no pattern for day {day_of_week}"))?;
            println!(
                "{}: energy {} mood {} ({} entries)",
                DAY_NAMES[day_of_week as usize],
                pattern.average_energy,
                pattern.average_mood,
                pattern.entry_count
            );
        }
    }
    Ok(())
}

fn analyze(samples_path: &std::path::Path) -> Result<PatternSummary, Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let samples = load_samples(samples_path)?;
    Ok(config.analyzer().analyze(&samples)?)
}

fn print_summary(summary: &PatternSummary) {
    println!("{}", summary.render_daily_chart());

    println!("Weekly:");
    for pattern in &summary.weekly {
        println!(
            "  {:<9} energy {:>3}  mood {:>3}  ({} entries)",
            DAY_NAMES[pattern.day_of_week as usize % 7],
            pattern.average_energy,
            pattern.average_mood,
            pattern.entry_count
        );
    }

    let total: u64 = summary.daily.iter().map(|p| p.entry_count).sum();
    let hours_with_data = summary.daily.iter().filter(|p| p.entry_count > 0).count();
    println!("\nSummary:");
    println!("  Samples analyzed: {total}");
    println!("  Hours with data: {hours_with_data}/24");
    if let Some(best) = summary.best_day() {
        println!(
            "  Best day: {} (energy {})",
            DAY_NAMES[best.day_of_week as usize % 7],
            best.average_energy
        );
    }
}
