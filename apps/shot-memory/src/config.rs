use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::insights::policy::DEFAULT_REFERENCE_DISTANCE;

const DEFAULT_STORE_PATH: &str = "data/shots.json";

/// Shot memory configuration loaded from environment variables.
/// Every variable is optional.
#[derive(Debug, Clone)]
pub struct Config {
    /// JSON document holding every shot record.
    pub store_path: PathBuf,
    pub rust_log: String,
    /// Carry distance club averages are compared against.
    pub club_reference_distance: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            rust_log: "info".to_string(),
            club_reference_distance: DEFAULT_REFERENCE_DISTANCE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let club_reference_distance = match lookup("CLUB_REFERENCE_DISTANCE") {
            Some(raw) => {
                let distance = raw
                    .trim()
                    .parse::<u32>()
                    .context("CLUB_REFERENCE_DISTANCE must be a positive whole number")?;
                if distance == 0 {
                    bail!("CLUB_REFERENCE_DISTANCE must be greater than zero");
                }
                distance
            }
            None => defaults.club_reference_distance,
        };

        Ok(Config {
            store_path: lookup("SHOT_STORE_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.store_path),
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
            club_reference_distance,
        })
    }
}
