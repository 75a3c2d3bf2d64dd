//! Cycle-length prediction
//!
//! Supplies a length estimate for cycles whose true length is not yet known.
//! The forward-looking current cycle weights recent cycles more; backward
//! reconstruction of historical gaps uses the stable long-run average.

use crate::config::CycleConfig;
use crate::types::{CycleStatus, PeriodCycle};

/// Effective length in days for `target`.
///
/// A recorded length wins verbatim. Otherwise the current cycle gets the
/// rounded mean of up to `recent_window` most recent *other* known lengths,
/// and any other cycle (historical gap or projection) gets the rounded mean
/// of all known lengths. Falls back to the configured default when no length
/// is known at all.
pub fn predicted_length(
    cycles: &[PeriodCycle],
    target: &PeriodCycle,
    config: &CycleConfig,
) -> i64 {
    if let Some(length) = target.cycle_length {
        return length;
    }

    match target.status {
        CycleStatus::Current => recent_average_length(cycles, target, config),
        CycleStatus::Historical | CycleStatus::Projected => average_cycle_length(cycles, config),
    }
}

/// Rounded mean of all known cycle lengths, or the configured default when
/// none are known.
pub fn average_cycle_length(cycles: &[PeriodCycle], config: &CycleConfig) -> i64 {
    let known: Vec<i64> = cycles.iter().filter_map(|c| c.cycle_length).collect();
    rounded_mean(&known).unwrap_or(config.default_cycle_length)
}

/// Rounded mean of the most recent known lengths, excluding the target itself.
fn recent_average_length(
    cycles: &[PeriodCycle],
    target: &PeriodCycle,
    config: &CycleConfig,
) -> i64 {
    let known: Vec<i64> = cycles
        .iter()
        .filter(|c| c.id != target.id)
        .filter_map(|c| c.cycle_length)
        .collect();

    // Cycles are chronological, so the window is the tail of the known list
    let window_start = known.len().saturating_sub(config.recent_window);
    rounded_mean(&known[window_start..]).unwrap_or(config.default_cycle_length)
}

fn rounded_mean(values: &[i64]) -> Option<i64> {
    if values.is_empty() {
        return None;
    }
    let sum: i64 = values.iter().sum();
    Some((sum as f64 / values.len() as f64).round() as i64)
}
