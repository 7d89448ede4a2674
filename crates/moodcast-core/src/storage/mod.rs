//! Configuration files and the pattern store seam.

mod config;
pub mod pattern_store;

pub use config::Config;
pub use pattern_store::{MemoryPatternStore, PatternStore, DAILY_PATTERNS_KEY, WEEKLY_PATTERNS_KEY};

use std::path::PathBuf;

/// Returns `~/.config/moodcast[-dev]/` based on MOODCAST_ENV.
///
/// Set MOODCAST_ENV=dev to use the development data directory, or
/// MOODCAST_HOME to point at an explicit directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("MOODCAST_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("MOODCAST_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("moodcast-dev")
            } else {
                base_dir.join("moodcast")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
