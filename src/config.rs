//! Detection and resolution policy
//!
//! The merge gap and the plausibility band have no single correct value;
//! every constant here is carried on [`CycleConfig`] with the reference
//! defaults below.

use serde::{Deserialize, Serialize};

/// Default merge-gap tolerance in days: bleeding dates at most this many days
/// apart belong to the same episode
pub const DEFAULT_MERGE_GAP_DAYS: i64 = 2;

/// Default lower bound of the plausible cycle-length band (days)
pub const DEFAULT_MIN_CYCLE_LENGTH: i64 = 20;

/// Default upper bound of the plausible cycle-length band (days)
pub const DEFAULT_MAX_CYCLE_LENGTH: i64 = 45;

/// Default cycle length when no recorded length is available (days)
pub const DEFAULT_CYCLE_LENGTH: i64 = 28;

/// Default number of most recent cycles averaged for the current cycle
pub const DEFAULT_RECENT_WINDOW: usize = 3;

/// Default modeled luteal-phase length (days)
pub const DEFAULT_LUTEAL_DAYS: i64 = 14;

/// Tunable policy for cycle detection and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Maximum day gap inside one bleeding episode
    pub merge_gap_days: i64,
    /// Inter-cycle gaps below this are discarded as noise
    pub min_cycle_length: i64,
    /// Inter-cycle gaps above this are discarded as noise
    pub max_cycle_length: i64,
    /// Fallback cycle length when nothing is known
    pub default_cycle_length: i64,
    /// How many recent known lengths feed the current-cycle estimate
    pub recent_window: usize,
    /// Modeled luteal-phase length; ovulation = predicted length minus this
    pub luteal_days: i64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            merge_gap_days: DEFAULT_MERGE_GAP_DAYS,
            min_cycle_length: DEFAULT_MIN_CYCLE_LENGTH,
            max_cycle_length: DEFAULT_MAX_CYCLE_LENGTH,
            default_cycle_length: DEFAULT_CYCLE_LENGTH,
            recent_window: DEFAULT_RECENT_WINDOW,
            luteal_days: DEFAULT_LUTEAL_DAYS,
        }
    }
}

impl CycleConfig {
    /// Whether an inter-cycle gap is a plausible cycle length
    pub fn is_plausible_length(&self, gap_days: i64) -> bool {
        gap_days >= self.min_cycle_length && gap_days <= self.max_cycle_length
    }
}
