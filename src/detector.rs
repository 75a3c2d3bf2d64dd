//! Bleeding-episode detection
//!
//! This module groups raw bleeding-observation dates into discrete period
//! cycles and computes known inter-cycle lengths. Grouping is greedy and
//! chronological; gaps up to the merge tolerance stay inside one episode.

use chrono::NaiveDate;

use crate::config::CycleConfig;
use crate::types::{CycleStatus, DetectionFlag, PeriodCycle, SymptomMap};

/// Output of one detection run over a symptom snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    /// Detected cycles in chronological order by start date
    pub cycles: Vec<PeriodCycle>,
    /// Data-quality flags raised while computing cycle lengths
    pub flags: Vec<DetectionFlag>,
}

impl Detection {
    fn empty() -> Self {
        Self {
            cycles: Vec::new(),
            flags: Vec::new(),
        }
    }
}

/// Detect period cycles from the full sparse record mapping.
///
/// Returns cycles in chronological order; the last one is tagged
/// [`CycleStatus::Current`]. An empty mapping or one with no bleeding
/// observations yields an empty detection, a legitimate cold-start state,
/// not an error.
pub fn detect_cycles(records: &SymptomMap, config: &CycleConfig) -> Detection {
    let bleeding_dates: Vec<NaiveDate> = records
        .values()
        .filter(|record| record.is_period_day())
        .map(|record| record.date)
        .collect();

    if bleeding_dates.is_empty() {
        return Detection::empty();
    }

    // BTreeMap iteration is date-ordered, so bleeding_dates is already sorted
    let episodes = group_episodes(&bleeding_dates, config.merge_gap_days);

    let mut flags = Vec::new();
    let last_index = episodes.len() - 1;

    let cycles = episodes
        .iter()
        .enumerate()
        .map(|(i, episode)| {
            let id = format!("cycle-{}", i + 1);

            let cycle_length = if i < last_index {
                let gap_days = (episodes[i + 1].start - episode.start).num_days();
                if config.is_plausible_length(gap_days) {
                    Some(gap_days)
                } else {
                    flags.push(DetectionFlag::ImplausibleGap {
                        from_cycle: id.clone(),
                        gap_days,
                    });
                    None
                }
            } else {
                None
            };

            let status = if i == last_index {
                CycleStatus::Current
            } else {
                CycleStatus::Historical
            };

            PeriodCycle {
                id,
                status,
                start_date: episode.start,
                end_date: episode.end,
                period_days: episode.bleeding_days,
                cycle_length,
            }
        })
        .collect();

    Detection { cycles, flags }
}

struct Episode {
    start: NaiveDate,
    end: NaiveDate,
    bleeding_days: u32,
}

/// Greedy chronological grouping of sorted bleeding dates into episodes.
fn group_episodes(sorted_dates: &[NaiveDate], merge_gap_days: i64) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = Vec::new();

    for &date in sorted_dates {
        match episodes.last_mut() {
            Some(current) if (date - current.end).num_days() <= merge_gap_days => {
                current.end = date;
                current.bleeding_days += 1;
            }
            _ => episodes.push(Episode {
                start: date,
                end: date,
                bleeding_days: 1,
            }),
        }
    }

    episodes
}
