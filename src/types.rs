//! Core types for the cycletrace engine
//!
//! This module defines the data structures that flow through each stage of the
//! engine: per-day symptom records, detected period cycles, and the resolved
//! per-date answer consumed by a presentation layer.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CycleError;

/// Date-keyed snapshot of all loaded symptom records.
///
/// One entry per calendar day; days with no journal entry are simply absent.
pub type SymptomMap = BTreeMap<NaiveDate, SymptomRecord>;

/// Menstrual cycle phase, derived proportionally from cycle day and
/// predicted cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Menstrual,
    Follicular,
    Ovulation,
    Luteal,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Menstrual => "menstrual",
            Phase::Follicular => "follicular",
            Phase::Ovulation => "ovulation",
            Phase::Luteal => "luteal",
        }
    }
}

/// How a cycle entered the cycle set.
///
/// The last detected cycle is tagged `Current` at detection time; `Projected`
/// cycles exist only as on-the-fly extrapolations for dates outside every
/// known cycle span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleStatus {
    Historical,
    Current,
    Projected,
}

/// One day's journal entry.
///
/// Every field is independently nullable: `None` means "not recorded", never
/// "recorded as absent". Records are built fresh on each load and are
/// immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymptomRecord {
    /// Calendar date of the entry (day granularity)
    pub date: NaiveDate,
    /// Flow intensity (e.g. "light", "heavy", "spotting", or explicit "none")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,
    /// Discharge description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discharge: Option<String>,
    /// Bowel-change category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bowel_changes: Option<String>,
    /// Mood
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Energy level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy: Option<String>,
    /// Anxiety level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anxiety: Option<String>,
    /// Concentration level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub concentration: Option<String>,
    /// Sex drive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex_drive: Option<String>,
    /// Physical activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_activity: Option<String>,
    /// Nutrition notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nutrition: Option<String>,
    /// Water intake
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_intake: Option<String>,
    /// Alcohol consumption
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alcohol: Option<String>,
    /// Medication taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication: Option<String>,
    /// Sexual activity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sexual_activity: Option<String>,
    /// Cramps present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cramps: Option<bool>,
    /// Bloating present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bloating: Option<bool>,
    /// Breast tenderness present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breast_tenderness: Option<bool>,
    /// Headaches present
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headaches: Option<bool>,
}

impl SymptomRecord {
    /// Create an empty record for the given date (nothing recorded)
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            flow: None,
            discharge: None,
            bowel_changes: None,
            mood: None,
            energy: None,
            anxiety: None,
            concentration: None,
            sex_drive: None,
            physical_activity: None,
            nutrition: None,
            water_intake: None,
            alcohol: None,
            medication: None,
            sexual_activity: None,
            cramps: None,
            bloating: None,
            breast_tenderness: None,
            headaches: None,
        }
    }

    /// True when a bleeding observation was recorded for this day.
    ///
    /// This predicate is the single source of truth for "period occurred
    /// here": flow must be recorded, non-empty, and not case-insensitively
    /// equal to `"none"` (an explicit "none" is a real observation of no
    /// bleeding, not a missing value).
    pub fn is_period_day(&self) -> bool {
        match self.flow.as_deref() {
            Some(flow) if !flow.is_empty() => !flow.eq_ignore_ascii_case("none"),
            _ => false,
        }
    }
}

/// A detected bleeding episode, the unit the engine reasons about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCycle {
    /// `cycle-<n>` in chronological order, or `projected-<start date>` for a
    /// synthesized cycle
    pub id: String,
    /// How this cycle entered the cycle set
    pub status: CycleStatus,
    /// Date of the first bleeding observation in the episode
    pub start_date: NaiveDate,
    /// Date of the last bleeding observation in the episode (inclusive)
    pub end_date: NaiveDate,
    /// Count of bleeding-observation dates in the episode (gaps within the
    /// merge tolerance don't count)
    pub period_days: u32,
    /// Days from this cycle's start to the next cycle's start; unset for the
    /// last cycle or when the gap fell outside the plausibility band
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cycle_length: Option<i64>,
}

impl PeriodCycle {
    /// Whether this is the ongoing cycle (true length not yet knowable)
    pub fn is_current(&self) -> bool {
        self.status == CycleStatus::Current
    }
}

/// The resolved answer for one `(cycles, records, query date)` triple.
///
/// Purely derived on demand; never cached or mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleInfo {
    /// 1-based offset of the date from its owning cycle's start; may exceed
    /// the cycle's own length if resolution drifted
    pub cycle_day: i64,
    /// Owning cycle (detected or projected)
    pub cycle: PeriodCycle,
    /// Phase bucket for the date
    pub phase: Phase,
    /// A bleeding observation was recorded on this exact date
    pub is_actual_period_day: bool,
    /// The date falls inside a forward-predicted period span
    pub is_predicted_period_day: bool,
    /// The date falls inside the predicted fertile window
    pub is_fertile_window: bool,
    /// The date is the predicted ovulation day
    pub is_ovulation_day: bool,
}

/// Data-quality flag raised during detection.
///
/// Flags never interrupt computation; they annotate the detection output for
/// callers that want to surface them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum DetectionFlag {
    /// The gap to the next cycle fell outside the plausibility band and was
    /// discarded rather than recorded as a cycle length
    ImplausibleGap { from_cycle: String, gap_days: i64 },
}

/// Inclusive calendar-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range; `start` must not be after `end`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CycleError> {
        if start > end {
            return Err(CycleError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Single-day range
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Number of days in the range (inclusive)
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterate every day in the range in ascending order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), move |d| {
            d.checked_add_days(Days::new(1)).filter(|next| *next <= end)
        })
    }
}
