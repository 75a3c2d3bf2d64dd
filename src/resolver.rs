//! Date resolution against detected cycles
//!
//! Answers the point query "what cycle/day/phase is date D in?". Dates inside
//! a known cycle span resolve directly; dates before the first cycle, between
//! cycles, or beyond the last cycle resolve against an on-the-fly projected
//! cycle extrapolated from the nearest real one. Resolution is a pure
//! function of its inputs; nothing is cached between queries.

use chrono::{Duration, NaiveDate};

use crate::config::CycleConfig;
use crate::predictor::{average_cycle_length, predicted_length};
use crate::types::{CycleInfo, CycleStatus, PeriodCycle, Phase, SymptomMap};

/// Days before predicted ovulation where the fertile window opens
pub const FERTILE_WINDOW_DAYS_BEFORE: i64 = 5;

/// Days after predicted ovulation where the fertile window closes
pub const FERTILE_WINDOW_DAYS_AFTER: i64 = 1;

/// Fraction of the predicted length where the follicular phase ends
const FOLLICULAR_END_FRACTION: f64 = 0.5;

/// Fraction of the predicted length where the ovulation phase ends
const OVULATION_END_FRACTION: f64 = 0.6;

/// Resolve `query` against the detected cycle set.
///
/// Returns `None` only when `cycles` is empty (cold start). `today` bounds
/// the forward-looking period prediction: dates at or before it are never
/// marked predicted.
pub fn resolve(
    cycles: &[PeriodCycle],
    records: &SymptomMap,
    query: NaiveDate,
    today: NaiveDate,
    config: &CycleConfig,
) -> Option<CycleInfo> {
    let cycle = locate_owner(cycles, query, config)?;
    let length = predicted_length(cycles, &cycle, config);
    let cycle_day = (query - cycle.start_date).num_days() + 1;
    let phase = classify_phase(cycle_day, cycle.period_days as i64, length);

    let record = records.get(&query);
    let is_actual_period_day = record.map(|r| r.is_period_day()).unwrap_or(false);

    // Never predict over a recorded flow observation (an explicit "none"
    // included); predictions are forward-looking only.
    let flow_recorded = record.map(|r| r.flow.is_some()).unwrap_or(false);
    let is_predicted_period_day =
        !flow_recorded && query > today && cycle_day <= cycle.period_days as i64;

    let (is_fertile_window, is_ovulation_day) =
        fertility_markers(cycles, query, cycle_day, length, config);

    Some(CycleInfo {
        cycle_day,
        cycle,
        phase,
        is_actual_period_day,
        is_predicted_period_day,
        is_fertile_window,
        is_ovulation_day,
    })
}

/// Date the next period is predicted to start: the last detected cycle's
/// start plus its predicted length.
pub fn next_predicted_period_start(
    cycles: &[PeriodCycle],
    config: &CycleConfig,
) -> Option<NaiveDate> {
    let last = cycles
        .iter()
        .rev()
        .find(|c| c.status != CycleStatus::Projected)?;
    let length = predicted_length(cycles, last, config);
    Some(last.start_date + Duration::days(length))
}

/// Start date of the first recorded period, if any cycle was detected.
pub fn first_recorded_period_start(cycles: &[PeriodCycle]) -> Option<NaiveDate> {
    cycles
        .iter()
        .find(|c| c.status != CycleStatus::Projected)
        .map(|c| c.start_date)
}

/// Find the cycle whose effective span contains `query`, or project one.
fn locate_owner(
    cycles: &[PeriodCycle],
    query: NaiveDate,
    config: &CycleConfig,
) -> Option<PeriodCycle> {
    for cycle in cycles {
        let length = predicted_length(cycles, cycle, config);
        let span_end = cycle.start_date + Duration::days(length - 1);
        if query >= cycle.start_date && query <= span_end {
            return Some(cycle.clone());
        }
    }
    project_cycle(cycles, query, config)
}

/// Synthesize a cycle for a date outside all known spans.
///
/// Extrapolates from the chronologically closest cycle by whole
/// average-length steps (signed floor division, so past dates step
/// backwards).
fn project_cycle(
    cycles: &[PeriodCycle],
    query: NaiveDate,
    config: &CycleConfig,
) -> Option<PeriodCycle> {
    let closest = cycles
        .iter()
        .min_by_key(|c| (query - c.start_date).num_days().abs())?;

    let average_length = average_cycle_length(cycles, config).max(1);
    let day_gap = (query - closest.start_date).num_days();
    let steps = day_gap.div_euclid(average_length);
    let start_date = closest.start_date + Duration::days(steps * average_length);

    Some(PeriodCycle {
        id: format!("projected-{start_date}"),
        status: CycleStatus::Projected,
        start_date,
        end_date: start_date + Duration::days(closest.period_days as i64 - 1),
        period_days: closest.period_days,
        cycle_length: Some(average_length),
    })
}

/// Proportional phase model over `(cycle day, period length, predicted length)`.
fn classify_phase(cycle_day: i64, period_days: i64, predicted_length: i64) -> Phase {
    let follicular_end = (predicted_length as f64 * FOLLICULAR_END_FRACTION).floor() as i64;
    let ovulation_end = (predicted_length as f64 * OVULATION_END_FRACTION).floor() as i64;

    if cycle_day <= period_days {
        Phase::Menstrual
    } else if cycle_day <= follicular_end {
        Phase::Follicular
    } else if cycle_day <= ovulation_end {
        Phase::Ovulation
    } else {
        Phase::Luteal
    }
}

/// Fertile-window and ovulation flags for a resolved date.
///
/// Both are suppressed for dates before the first recorded period start:
/// there is no backward extrapolation before real history begins. Ovulation
/// is modeled as predicted length minus a fixed luteal phase.
fn fertility_markers(
    cycles: &[PeriodCycle],
    query: NaiveDate,
    cycle_day: i64,
    predicted_length: i64,
    config: &CycleConfig,
) -> (bool, bool) {
    match first_recorded_period_start(cycles) {
        Some(first_start) if query >= first_start => {
            let ovulation_day = predicted_length - config.luteal_days;
            let is_fertile = cycle_day >= ovulation_day - FERTILE_WINDOW_DAYS_BEFORE
                && cycle_day <= ovulation_day + FERTILE_WINDOW_DAYS_AFTER;
            (is_fertile, cycle_day == ovulation_day)
        }
        _ => (false, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::detect_cycles;
    use crate::types::SymptomRecord;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn flow_record(d: NaiveDate, flow: &str) -> SymptomRecord {
        let mut record = SymptomRecord::new(d);
        record.flow = Some(flow.to_string());
        record
    }

    /// One 5-day period starting 2024-01-01; predicted length defaults to 28.
    fn single_cycle_fixture() -> (Vec<PeriodCycle>, SymptomMap) {
        let mut records = SymptomMap::new();
        for offset in 0..5 {
            let d = date(2024, 1, 1) + Duration::days(offset);
            records.insert(d, flow_record(d, "medium"));
        }
        let cycles = detect_cycles(&records, &CycleConfig::default()).cycles;
        (cycles, records)
    }

    /// Three detected cycles: starts 01-01, 01-29, 02-26 (two known 28-day lengths).
    fn multi_cycle_fixture() -> (Vec<PeriodCycle>, SymptomMap) {
        let mut records = SymptomMap::new();
        for start in [date(2024, 1, 1), date(2024, 1, 29), date(2024, 2, 26)] {
            for offset in 0..4 {
                let d = start + Duration::days(offset);
                records.insert(d, flow_record(d, "heavy"));
            }
        }
        let cycles = detect_cycles(&records, &CycleConfig::default()).cycles;
        (cycles, records)
    }

    #[test]
    fn test_empty_cycles_resolve_to_none() {
        let config = CycleConfig::default();
        let result = resolve(
            &[],
            &SymptomMap::new(),
            date(2024, 1, 1),
            date(2024, 1, 1),
            &config,
        );
        assert_eq!(result, None);
    }

    #[test]
    fn test_cycle_day_is_one_based() {
        let (cycles, records) = single_cycle_fixture();
        let config = CycleConfig::default();

        let info = resolve(&cycles, &records, date(2024, 1, 1), date(2024, 1, 5), &config)
            .unwrap();
        assert_eq!(info.cycle_day, 1);
        assert_eq!(info.cycle.id, "cycle-1");
    }

    #[test]
    fn test_phase_boundaries() {
        // period_days = 5, predicted length 28: follicular ends day 14,
        // ovulation ends day 16 (floor of 16.8)
        let (cycles, records) = single_cycle_fixture();
        let config = CycleConfig::default();
        let today = date(2024, 1, 5);
        let start = date(2024, 1, 1);

        let phase_on = |day: i64| {
            resolve(&cycles, &records, start + Duration::days(day - 1), today, &config)
                .unwrap()
                .phase
        };

        assert_eq!(phase_on(5), Phase::Menstrual);
        assert_eq!(phase_on(6), Phase::Follicular);
        assert_eq!(phase_on(14), Phase::Follicular);
        assert_eq!(phase_on(15), Phase::Ovulation);
        assert_eq!(phase_on(16), Phase::Ovulation);
        assert_eq!(phase_on(17), Phase::Luteal);
    }

    #[test]
    fn test_actual_period_day_from_record() {
        let (cycles, records) = single_cycle_fixture();
        let config = CycleConfig::default();

        let info = resolve(&cycles, &records, date(2024, 1, 3), date(2024, 1, 5), &config)
            .unwrap();
        assert!(info.is_actual_period_day);
        assert!(!info.is_predicted_period_day);
    }

    #[test]
    fn test_actual_overrides_predicted_even_in_future() {
        let (cycles, mut records) = single_cycle_fixture();
        let config = CycleConfig::default();
        let today = date(2024, 1, 10);

        // A recorded bleeding day beyond "today" within the projected next period
        let future = date(2024, 1, 29);
        records.insert(future, flow_record(future, "light"));

        let info = resolve(&cycles, &records, future, today, &config).unwrap();
        assert!(info.is_actual_period_day);
        assert!(!info.is_predicted_period_day);
    }

    #[test]
    fn test_predicted_period_only_strictly_future() {
        let (cycles, records) = single_cycle_fixture();
        let config = CycleConfig::default();

        // Next period projects to start 28 days after 01-01, i.e. 01-29
        let predicted_day = date(2024, 1, 29);

        let info = resolve(&cycles, &records, predicted_day, date(2024, 1, 10), &config)
            .unwrap();
        assert!(info.is_predicted_period_day);
        assert_eq!(info.cycle.status, CycleStatus::Projected);

        // Same date no longer strictly future: no prediction
        let info = resolve(&cycles, &records, predicted_day, predicted_day, &config)
            .unwrap();
        assert!(!info.is_predicted_period_day);
    }

    #[test]
    fn test_explicit_none_flow_suppresses_prediction() {
        let (cycles, mut records) = single_cycle_fixture();
        let config = CycleConfig::default();
        let future = date(2024, 1, 29);
        records.insert(future, flow_record(future, "None"));

        let info = resolve(&cycles, &records, future, date(2024, 1, 10), &config).unwrap();
        assert!(!info.is_actual_period_day);
        assert!(!info.is_predicted_period_day);
    }

    #[test]
    fn test_fertile_window_and_ovulation_day() {
        // Predicted length 28, luteal 14: ovulation day 14, window days 9..=15
        let (cycles, records) = single_cycle_fixture();
        let config = CycleConfig::default();
        let today = date(2024, 1, 5);
        let start = date(2024, 1, 1);

        let marks_on = |day: i64| {
            let info =
                resolve(&cycles, &records, start + Duration::days(day - 1), today, &config)
                    .unwrap();
            (info.is_fertile_window, info.is_ovulation_day)
        };

        assert_eq!(marks_on(8), (false, false));
        assert_eq!(marks_on(9), (true, false));
        assert_eq!(marks_on(14), (true, true));
        assert_eq!(marks_on(15), (true, false));
        assert_eq!(marks_on(16), (false, false));
    }

    #[test]
    fn test_no_fertility_markers_before_history() {
        let (cycles, records) = multi_cycle_fixture();
        let config = CycleConfig::default();
        let today = date(2024, 3, 1);

        // Sweep well before the first recorded period start
        for offset in 1..120 {
            let query = date(2024, 1, 1) - Duration::days(offset);
            let info = resolve(&cycles, &records, query, today, &config).unwrap();
            assert!(!info.is_fertile_window, "fertile at {query}");
            assert!(!info.is_ovulation_day, "ovulation at {query}");
        }
    }

    #[test]
    fn test_every_date_resolvable() {
        let (cycles, records) = multi_cycle_fixture();
        let config = CycleConfig::default();
        let today = date(2024, 3, 1);

        // Two years around the recorded history, including the gap between
        // spans and far extrapolation both directions
        let mut query = date(2023, 3, 1);
        while query < date(2025, 3, 1) {
            let info = resolve(&cycles, &records, query, today, &config);
            assert!(info.is_some(), "unresolvable date {query}");
            query += Duration::days(1);
        }
    }

    #[test]
    fn test_projection_into_far_future() {
        let (cycles, records) = multi_cycle_fixture();
        let config = CycleConfig::default();

        // ~3 average cycles after the last start (02-26): 28-day steps land
        // on 03-25, 04-22, 05-20
        let info = resolve(&cycles, &records, date(2024, 5, 21), date(2024, 3, 1), &config)
            .unwrap();
        assert_eq!(info.cycle.status, CycleStatus::Projected);
        assert_eq!(info.cycle.start_date, date(2024, 5, 20));
        assert_eq!(info.cycle_day, 2);
        assert_eq!(info.cycle.id, "projected-2024-05-20");
        // Projected cycle inherits the closest cycle's period span
        assert_eq!(info.cycle.period_days, 4);
    }

    #[test]
    fn test_projection_into_past_uses_floor_division() {
        let (cycles, records) = multi_cycle_fixture();
        let config = CycleConfig::default();

        // 10 days before the first start: one 28-day step back from 01-01
        // lands on 2023-12-04, making the query day 19 of that cycle
        let info = resolve(&cycles, &records, date(2023, 12, 22), date(2024, 3, 1), &config)
            .unwrap();
        assert_eq!(info.cycle.status, CycleStatus::Projected);
        assert_eq!(info.cycle.start_date, date(2023, 12, 4));
        assert_eq!(info.cycle_day, 19);
    }

    #[test]
    fn test_resolution_is_idempotent() {
        let (cycles, records) = multi_cycle_fixture();
        let config = CycleConfig::default();
        let query = date(2024, 2, 10);
        let today = date(2024, 3, 1);

        let first = resolve(&cycles, &records, query, today, &config);
        let second = resolve(&cycles, &records, query, today, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_next_predicted_period_start() {
        let (cycles, _) = multi_cycle_fixture();
        let config = CycleConfig::default();

        // Last cycle starts 02-26; both known lengths are 28
        assert_eq!(
            next_predicted_period_start(&cycles, &config),
            Some(date(2024, 3, 25))
        );
        assert_eq!(next_predicted_period_start(&[], &config), None);
    }

    #[test]
    fn test_first_recorded_period_start() {
        let (cycles, _) = multi_cycle_fixture();
        assert_eq!(first_recorded_period_start(&cycles), Some(date(2024, 1, 1)));
        assert_eq!(first_recorded_period_start(&[]), None);
    }
}
