//! Observation sources
//!
//! The engine's one inbound dependency: something that supplies symptom
//! records for a date range. The core is indifferent to where records come
//! from: a host document store, a parsed journal export, or an in-memory
//! fixture.

mod journal;
mod memory;

pub use journal::{JournalAdapter, JournalSource};
pub use memory::MemorySource;

use crate::error::CycleError;
use crate::types::{DateRange, SymptomMap};

/// Trait for observation sources
pub trait ObservationSource {
    /// Load all records whose date falls inside `range`.
    ///
    /// A source that cannot reach its backing store must fail fast with
    /// [`CycleError::SourceUnavailable`] rather than return partial or
    /// synthetic data.
    fn load(&self, range: DateRange) -> Result<SymptomMap, CycleError>;
}
