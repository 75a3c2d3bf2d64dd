//! Pipeline orchestration
//!
//! Public API for loading an observation snapshot and querying it. A load
//! fully replaces the previous snapshot; detection and resolution operate on
//! the in-memory snapshot only and are deterministic given it.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::adapters::ObservationSource;
use crate::config::CycleConfig;
use crate::detector::detect_cycles;
use crate::error::CycleError;
use crate::predictor::average_cycle_length;
use crate::resolver::{first_recorded_period_start, next_predicted_period_start, resolve};
use crate::types::{CycleInfo, DateRange, DetectionFlag, PeriodCycle, SymptomMap};

/// Immutable snapshot of one load: records, detected cycles, and provenance.
#[derive(Debug, Clone)]
pub struct CycleData {
    /// Identifies this detection run
    pub snapshot_id: Uuid,
    /// All records loaded for the range
    pub symptoms: SymptomMap,
    /// Detected cycles in chronological order
    pub cycles: Vec<PeriodCycle>,
    /// Data-quality flags raised during detection
    pub flags: Vec<DetectionFlag>,
    /// Range the records were loaded for
    pub date_range: DateRange,
}

/// Load observations for a range and detect cycles over them.
///
/// Source failures propagate; no synthetic data is substituted. An empty or
/// bleeding-free range yields a snapshot with no cycles (cold start).
pub fn load_cycle_data(
    source: &dyn ObservationSource,
    range: DateRange,
    config: &CycleConfig,
) -> Result<CycleData, CycleError> {
    let symptoms = source.load(range)?;
    let detection = detect_cycles(&symptoms, config);

    Ok(CycleData {
        snapshot_id: Uuid::new_v4(),
        symptoms,
        cycles: detection.cycles,
        flags: detection.flags,
        date_range: range,
    })
}

/// Stateful engine holding the policy config and the latest snapshot.
///
/// Convenience wrapper over the pure functions for callers that keep one
/// snapshot alive between queries (a calendar view, a status line).
pub struct CycleEngine {
    config: CycleConfig,
    data: Option<CycleData>,
}

impl Default for CycleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CycleEngine {
    /// Create an engine with default policy
    pub fn new() -> Self {
        Self::with_config(CycleConfig::default())
    }

    /// Create an engine with a specific policy
    pub fn with_config(config: CycleConfig) -> Self {
        Self { config, data: None }
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Latest loaded snapshot, if any
    pub fn data(&self) -> Option<&CycleData> {
        self.data.as_ref()
    }

    /// Load a fresh snapshot, replacing any previous one
    pub fn load(
        &mut self,
        source: &dyn ObservationSource,
        range: DateRange,
    ) -> Result<&CycleData, CycleError> {
        let data = load_cycle_data(source, range, &self.config)?;
        Ok(self.data.insert(data))
    }

    /// Resolve one date against the loaded snapshot.
    ///
    /// Returns `None` when nothing is loaded or no cycles were detected.
    pub fn resolve(&self, query: NaiveDate, today: NaiveDate) -> Option<CycleInfo> {
        let data = self.data.as_ref()?;
        resolve(&data.cycles, &data.symptoms, query, today, &self.config)
    }

    /// Resolve one date using the ambient local date as "today"
    pub fn resolve_today(&self, query: NaiveDate) -> Option<CycleInfo> {
        self.resolve(query, chrono::Local::now().date_naive())
    }

    /// Resolve every day of `range` in ascending order.
    ///
    /// Empty when no cycles are detected.
    pub fn resolve_range(&self, range: DateRange, today: NaiveDate) -> Vec<(NaiveDate, CycleInfo)> {
        range
            .days()
            .filter_map(|day| self.resolve(day, today).map(|info| (day, info)))
            .collect()
    }

    /// Date the next period is predicted to start
    pub fn next_predicted_period_start(&self) -> Option<NaiveDate> {
        let data = self.data.as_ref()?;
        next_predicted_period_start(&data.cycles, &self.config)
    }

    /// Start date of the first recorded period
    pub fn first_recorded_period_start(&self) -> Option<NaiveDate> {
        let data = self.data.as_ref()?;
        first_recorded_period_start(&data.cycles)
    }

    /// Average cycle length over known lengths (config default when none)
    pub fn average_cycle_length(&self) -> Option<i64> {
        let data = self.data.as_ref()?;
        Some(average_cycle_length(&data.cycles, &self.config))
    }
}
