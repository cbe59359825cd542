//! Loading scenario files and writing results.

use anyhow::{Context, Result};
use deconflict_core::{ConflictReport, MissionPlot, Scenario};
use std::fs;
use std::path::Path;

/// Read and parse a scenario document.
pub fn load_scenario(path: &Path) -> Result<Scenario> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read scenario file {}", path.display()))?;
    let scenario = Scenario::from_json_str(&text)
        .with_context(|| format!("invalid scenario file {}", path.display()))?;
    tracing::debug!(
        path = %path.display(),
        primary = %scenario.primary.drone_id,
        others = scenario.others.len(),
        "scenario loaded"
    );
    Ok(scenario)
}

/// Merge command-line thresholds into the scenario's rules.
///
/// Flags win over the document's `rules`, which win over the defaults.
/// The merged rules must be finite and strictly positive.
pub fn apply_threshold_overrides(
    scenario: &mut Scenario,
    safe_distance: Option<f64>,
    time_window: Option<f64>,
) -> Result<()> {
    if safe_distance.is_none() && time_window.is_none() {
        return Ok(());
    }

    let mut rules = scenario.rules_or_default();
    if let Some(safe_distance) = safe_distance {
        rules.safe_distance = safe_distance;
    }
    if let Some(time_window) = time_window {
        rules.time_window = time_window;
    }
    rules.validate().context("invalid threshold override")?;

    scenario.rules = Some(rules);
    Ok(())
}

/// Write the plot description for `scenario` and its conflicts.
pub fn write_plot(path: &Path, scenario: &Scenario, report: &ConflictReport<'_>) -> Result<()> {
    let plot = MissionPlot::build(&scenario.primary, &scenario.others, &report.conflicts);
    let json = plot.to_json_pretty().context("failed to encode plot")?;
    fs::write(path, json).with_context(|| format!("failed to write plot to {}", path.display()))?;
    tracing::info!(
        path = %path.display(),
        markers = plot.markers.len(),
        skipped = plot.skipped_conflicts,
        "plot written"
    );
    Ok(())
}

/// Render the report as printed on stdout.
pub fn render_report(report: &ConflictReport<'_>, json: bool) -> Result<String> {
    if json {
        return serde_json::to_string_pretty(report).context("failed to encode report");
    }
    Ok(report.summary_line())
}
