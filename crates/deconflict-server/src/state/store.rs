use chrono::{DateTime, Utc};
use deconflict_core::{ConflictDetector, DetectionStrategy, SeparationRules};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::Config;

/// Application state - configured detector plus request counters.
pub struct AppState {
    detector: ConflictDetector,
    checks_run: AtomicU64,
    conflicts_found: AtomicU64,
    started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StatsSnapshot {
    pub checks_run: u64,
    pub conflicts_found: u64,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self::with_detector(ConflictDetector::new(config.rules(), config.strategy))
    }

    pub fn with_detector(detector: ConflictDetector) -> Self {
        Self {
            detector,
            checks_run: AtomicU64::new(0),
            conflicts_found: AtomicU64::new(0),
            started_at: Utc::now(),
        }
    }

    /// Default rules and strategy applied to every request.
    pub fn detector(&self) -> &ConflictDetector {
        &self.detector
    }

    /// Detector for one request, honouring per-request overrides.
    pub fn detector_for(
        &self,
        rules: Option<&SeparationRules>,
        strategy: Option<DetectionStrategy>,
    ) -> ConflictDetector {
        let mut detector = self.detector.clone();
        if let Some(rules) = rules {
            detector = detector.with_rules(rules.clone());
        }
        if let Some(strategy) = strategy {
            detector = detector.with_strategy(strategy);
        }
        detector
    }

    /// Record one completed check.
    pub fn record_check(&self, conflicts: usize) {
        self.checks_run.fetch_add(1, Ordering::Relaxed);
        self.conflicts_found
            .fetch_add(conflicts as u64, Ordering::Relaxed);
    }

    pub fn stats(&self) -> StatsSnapshot {
        StatsSnapshot {
            checks_run: self.checks_run.load(Ordering::Relaxed),
            conflicts_found: self.conflicts_found.load(Ordering::Relaxed),
            started_at: self.started_at,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
