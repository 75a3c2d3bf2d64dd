//! In-memory observation source
//!
//! Backs the engine with a plain record collection. Used as the test fixture
//! source and by hosts that already hold parsed records.

use crate::error::CycleError;
use crate::types::{DateRange, SymptomMap, SymptomRecord};

use super::ObservationSource;

/// Observation source over an owned record set.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: SymptomMap,
}

impl MemorySource {
    /// Build from a record collection; on duplicate dates the last record wins
    pub fn from_records(records: Vec<SymptomRecord>) -> Self {
        let mut map = SymptomMap::new();
        for record in records {
            map.insert(record.date, record);
        }
        Self { records: map }
    }

    /// Insert or replace the record for its date
    pub fn insert(&mut self, record: SymptomRecord) {
        self.records.insert(record.date, record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ObservationSource for MemorySource {
    fn load(&self, range: DateRange) -> Result<SymptomMap, CycleError> {
        Ok(self
            .records
            .range(range.start..=range.end)
            .map(|(date, record)| (*date, record.clone()))
            .collect())
    }
}
