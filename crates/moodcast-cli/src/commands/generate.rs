//! Synthetic journal generation for demos and manual testing.

use std::fs;
use std::path::PathBuf;

use chrono::{Duration, DurationRound, Utc};
use clap::Args;
use moodcast_core::{BaselineTable, Sample};
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Mcg128Xsl64;

/// Waking hours samples are drawn from.
const FIRST_HOUR: i64 = 7;
const LAST_HOUR: i64 = 23;

/// Spread of generated levels around the baseline.
const JITTER: i32 = 12;

/// Upper bound on one generated journal.
const MAX_SAMPLES: u32 = 1_000_000;

#[derive(Args)]
pub struct GenerateArgs {
    /// Days of history ending today
    #[arg(long, default_value_t = 14)]
    days: u32,
    /// Samples per day
    #[arg(long, default_value_t = 4)]
    per_day: u32,
    /// Seed for reproducible journals
    #[arg(long)]
    seed: Option<u64>,
    /// Write to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.days == 0 || args.per_day == 0 {
        return Err("--days and --per-day must be greater than zero".into());
    }

    let mut rng = match args.seed {
        Some(seed) => Mcg128Xsl64::seed_from_u64(seed),
        None => Mcg128Xsl64::from_entropy(),
    };
    let samples = generate(&mut rng, args.days, args.per_day)?;
    tracing::debug!(count = samples.len(), "generated samples");

    let json = serde_json::to_string_pretty(&samples)?;
    match args.output {
        Some(path) => {
            fs::write(&path, json)?;
            eprintln!("wrote {} samples to {}", samples.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

/// Draw samples around the default baseline, oldest day first.
fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    days: u32,
    per_day: u32,
) -> Result<Vec<Sample>, Box<dyn std::error::Error>> {
    let baseline = BaselineTable::default();
    let today = Utc::now().duration_trunc(Duration::days(1))?;
    let total = days
        .checked_mul(per_day)
        .filter(|total| *total <= MAX_SAMPLES)
        .ok_or_else(|| format!("--days times --per-day must not exceed {MAX_SAMPLES}"))?;
    let mut samples = Vec::with_capacity(total as usize);

    for day in (1..=days as i64).rev() {
        let midnight = today - Duration::days(day);
        for _ in 0..per_day {
            let hour = rng.gen_range(FIRST_HOUR..=LAST_HOUR);
            let minute = rng.gen_range(0..60);
            let at = midnight + Duration::hours(hour) + Duration::minutes(minute);

            let level = baseline.hourly_or_neutral(hour as u8);
            let mood = jitter(rng, level.mood);
            let energy = jitter(rng, level.energy);
            samples.push(Sample::new(at.timestamp_millis(), mood, energy));
        }
    }

    samples.sort_by_key(|s| s.timestamp);
    Ok(samples)
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, level: u8) -> u8 {
    (level as i32 + rng.gen_range(-JITTER..=JITTER)).clamp(0, 100) as u8
}
