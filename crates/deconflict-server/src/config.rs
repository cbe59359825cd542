//! Server configuration from environment.

use deconflict_core::{DetectionStrategy, SeparationRules};
use deconflict_core::rules::{DEFAULT_SAFE_DISTANCE, DEFAULT_TIME_WINDOW};
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    /// Default minimum separation in metres
    pub safe_distance: f64,
    /// Default time window in seconds
    pub time_window: f64,
    pub strategy: DetectionStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            safe_distance: DEFAULT_SAFE_DISTANCE,
            time_window: DEFAULT_TIME_WINDOW,
            strategy: DetectionStrategy::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("DECONFLICT_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.server_port),
            safe_distance: env::var("DECONFLICT_SAFE_DISTANCE_M")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.safe_distance),
            time_window: env::var("DECONFLICT_TIME_WINDOW_S")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.time_window),
            strategy: env::var("DECONFLICT_STRATEGY")
                .ok()
                .and_then(|s| match s.parse() {
                    Ok(strategy) => Some(strategy),
                    Err(err) => {
                        tracing::warn!("Ignoring DECONFLICT_STRATEGY: {}", err);
                        None
                    }
                })
                .unwrap_or(defaults.strategy),
        }
    }

    /// Rules applied when a request carries none.
    pub fn rules(&self) -> SeparationRules {
        SeparationRules::new(self.safe_distance, self.time_window)
    }
}
