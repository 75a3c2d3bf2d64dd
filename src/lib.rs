//! cycletrace - Cycle inference engine for sparse daily symptom journals
//!
//! cycletrace infers menstrual-cycle structure from a sparse, user-maintained
//! time series of per-day symptom records and answers point queries against
//! that structure through a deterministic pipeline: observation loading →
//! bleeding-episode detection → length prediction → date resolution.
//!
//! The engine owns no storage and renders nothing: an [`ObservationSource`]
//! supplies records, and [`resolve`] returns plain data for a calendar grid
//! or status line to display.

pub mod adapters;
pub mod config;
pub mod detector;
pub mod error;
pub mod pipeline;
pub mod predictor;
pub mod resolver;
pub mod types;

pub use adapters::{JournalAdapter, JournalSource, MemorySource, ObservationSource};
pub use config::CycleConfig;
pub use detector::{detect_cycles, Detection};
pub use error::CycleError;
pub use pipeline::{load_cycle_data, CycleData, CycleEngine};
pub use predictor::{average_cycle_length, predicted_length};
pub use resolver::{first_recorded_period_start, next_predicted_period_start, resolve};
pub use types::{
    CycleInfo, CycleStatus, DateRange, DetectionFlag, PeriodCycle, Phase, SymptomMap,
    SymptomRecord,
};

/// Engine version embedded in CLI output
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for CLI output
pub const PRODUCER_NAME: &str = "cycletrace";
