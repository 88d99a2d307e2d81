/// Config file loading and creation for the courtshuffle CLI.
///
/// Config lives at ~/.config/courtshuffle/config.toml.
/// All fields are optional — CLI args override config values.
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::bail;

#[derive(Deserialize, Default)]
pub struct CourtshuffleConfig {
    pub courts: Option<usize>,
    pub rounds: Option<usize>,
    pub max_gap: Option<usize>,
    pub max_repeats: Option<u32>,
    pub repeat_tail: Option<usize>,
    pub round_minutes: Option<u32>,
}

const DEFAULT_CONFIG_TEMPLATE: &str = "\
# courtshuffle configuration
# All values here can be overridden by CLI flags.

# Courts available per round
# courts = 2

# Rounds to schedule
# rounds = 5

# Largest allowed rank gap within a match
# max_gap = 10

# How many times a matchup may repeat beyond its first occurrence
# max_repeats = 1

# How many closing rounds tolerate repeat matchups
# repeat_tail = 2

# Minutes per round, used for the time labels in text output
# round_minutes = 12
";

/// Returns the default config path: ~/.config/courtshuffle/config.toml
pub fn config_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| bail("HOME environment variable not set"));
    PathBuf::from(home)
        .join(".config")
        .join("courtshuffle")
        .join("config.toml")
}

/// Load config from a file path. Returns default (all None) if file doesn't exist.
pub fn load_config(path: &Path) -> CourtshuffleConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content)
            .unwrap_or_else(|e| bail(format!("Failed to parse config at {}: {e}", path.display()))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => CourtshuffleConfig::default(),
        Err(e) => bail(format!("Failed to read config at {}: {e}", path.display())),
    }
}

/// Create the default config file. Errors if it already exists.
pub fn create_default_config() -> PathBuf {
    let path = config_path();

    if path.exists() {
        bail(format!("Config file already exists at {}", path.display()));
    }

    // Create parent directories
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .unwrap_or_else(|e| bail(format!("Failed to create directory {}: {e}", parent.display())));
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .unwrap_or_else(|e| bail(format!("Failed to write config to {}: {e}", path.display())));

    path
}
