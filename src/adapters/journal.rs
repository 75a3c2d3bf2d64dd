//! Journal document adapter
//!
//! Parses exported journal documents into canonical symptom records. Two wire
//! shapes are accepted: a JSON object keyed by ISO date, and NDJSON with one
//! entry per line carrying its own `date` field. Wire field names are
//! camelCase (`periodFlow`, `bowelChanges`, ...) as host applications emit
//! them; this module owns the translation to the canonical record.

use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::CycleError;
use crate::types::{DateRange, SymptomMap, SymptomRecord};

use super::ObservationSource;

/// One journal entry as it appears on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JournalEntry {
    /// Entry date; required in NDJSON form, ignored in map form where the
    /// object key is authoritative
    date: Option<NaiveDate>,
    period_flow: Option<String>,
    discharge: Option<String>,
    bowel_changes: Option<String>,
    mood: Option<String>,
    energy: Option<String>,
    anxiety: Option<String>,
    concentration: Option<String>,
    sex_drive: Option<String>,
    physical_activity: Option<String>,
    nutrition: Option<String>,
    water_intake: Option<String>,
    alcohol: Option<String>,
    medication: Option<String>,
    sexual_activity: Option<String>,
    cramps: Option<bool>,
    bloating: Option<bool>,
    breast_tenderness: Option<bool>,
    headaches: Option<bool>,
}

impl JournalEntry {
    fn into_record(self, date: NaiveDate) -> SymptomRecord {
        SymptomRecord {
            date,
            flow: self.period_flow,
            discharge: self.discharge,
            bowel_changes: self.bowel_changes,
            mood: self.mood,
            energy: self.energy,
            anxiety: self.anxiety,
            concentration: self.concentration,
            sex_drive: self.sex_drive,
            physical_activity: self.physical_activity,
            nutrition: self.nutrition,
            water_intake: self.water_intake,
            alcohol: self.alcohol,
            medication: self.medication,
            sexual_activity: self.sexual_activity,
            cramps: self.cramps,
            bloating: self.bloating,
            breast_tenderness: self.breast_tenderness,
            headaches: self.headaches,
        }
    }
}

/// Parser for journal documents.
pub struct JournalAdapter;

impl JournalAdapter {
    /// Parse a JSON object keyed by ISO date
    pub fn parse_map(raw_json: &str) -> Result<Vec<SymptomRecord>, CycleError> {
        let entries: BTreeMap<String, JournalEntry> = serde_json::from_str(raw_json)?;

        entries
            .into_iter()
            .map(|(key, entry)| {
                let date = key
                    .parse::<NaiveDate>()
                    .map_err(|_| CycleError::DateParseError(key))?;
                Ok(entry.into_record(date))
            })
            .collect()
    }

    /// Parse NDJSON, one entry per non-empty line with a `date` field
    pub fn parse_ndjson(raw: &str) -> Result<Vec<SymptomRecord>, CycleError> {
        raw.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                let entry: JournalEntry = serde_json::from_str(line)?;
                let date = entry
                    .date
                    .ok_or_else(|| CycleError::ParseError(format!("entry missing date: {line}")))?;
                Ok(entry.into_record(date))
            })
            .collect()
    }
}

/// Observation source over a parsed journal document.
#[derive(Debug, Clone, Default)]
pub struct JournalSource {
    records: SymptomMap,
}

impl JournalSource {
    /// Parse a document, auto-detecting map vs NDJSON form
    pub fn from_json(raw: &str) -> Result<Self, CycleError> {
        let records = if raw.trim_start().starts_with('{') && raw.trim_end().ends_with('}') {
            match JournalAdapter::parse_map(raw) {
                Ok(records) => records,
                // A single NDJSON line is also brace-delimited
                Err(CycleError::JsonError(_)) => JournalAdapter::parse_ndjson(raw)?,
                Err(e) => return Err(e),
            }
        } else {
            JournalAdapter::parse_ndjson(raw)?
        };
        Ok(Self::from_records(records))
    }

    /// Read and parse a journal document from disk.
    ///
    /// Fails fast when the document cannot be read; the caller decides the
    /// degraded behavior, the engine never invents data.
    pub fn from_path(path: &Path) -> Result<Self, CycleError> {
        let raw = fs::read_to_string(path)
            .map_err(|e| CycleError::SourceUnavailable(format!("{}: {e}", path.display())))?;
        Self::from_json(&raw)
    }

    fn from_records(records: Vec<SymptomRecord>) -> Self {
        let mut map = SymptomMap::new();
        for record in records {
            map.insert(record.date, record);
        }
        Self { records: map }
    }

    /// Range spanning the earliest to latest record, if any
    pub fn full_range(&self) -> Option<DateRange> {
        let start = *self.records.keys().next()?;
        let end = *self.records.keys().next_back()?;
        Some(DateRange { start, end })
    }
}

impl ObservationSource for JournalSource {
    fn load(&self, range: DateRange) -> Result<SymptomMap, CycleError> {
        Ok(self
            .records
            .range(range.start..=range.end)
            .map(|(date, record)| (*date, record.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    const MAP_DOC: &str = r#"{
        "2024-01-01": {"periodFlow": "heavy", "cramps": true, "mood": "irritable"},
        "2024-01-02": {"periodFlow": "medium", "breastTenderness": false},
        "2024-01-09": {"mood": "calm", "waterIntake": "2L"}
    }"#;

    #[test]
    fn test_parse_map_camel_case_fields() {
        let records = JournalAdapter::parse_map(MAP_DOC).unwrap();
        assert_eq!(records.len(), 3);

        let first = &records[0];
        assert_eq!(first.date, date(2024, 1, 1));
        assert_eq!(first.flow.as_deref(), Some("heavy"));
        assert_eq!(first.cramps, Some(true));
        assert_eq!(first.mood.as_deref(), Some("irritable"));
        assert_eq!(first.bloating, None);

        let second = &records[1];
        assert_eq!(second.breast_tenderness, Some(false));
        assert!(second.is_period_day());

        let third = &records[2];
        assert!(!third.is_period_day());
        assert_eq!(third.water_intake.as_deref(), Some("2L"));
    }

    #[test]
    fn test_parse_map_bad_date_key() {
        let raw = r#"{"not-a-date": {"periodFlow": "light"}}"#;
        let err = JournalAdapter::parse_map(raw).unwrap_err();
        assert!(matches!(err, CycleError::DateParseError(_)));
    }

    #[test]
    fn test_parse_ndjson() {
        let raw = "\n{\"date\": \"2024-01-01\", \"periodFlow\": \"light\"}\n\
                   {\"date\": \"2024-01-02\", \"headaches\": true}\n";
        let records = JournalAdapter::parse_ndjson(raw).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records[0].is_period_day());
        assert_eq!(records[1].headaches, Some(true));
    }

    #[test]
    fn test_parse_ndjson_missing_date() {
        let raw = r#"{"periodFlow": "light"}"#;
        let err = JournalAdapter::parse_ndjson(raw).unwrap_err();
        assert!(matches!(err, CycleError::ParseError(_)));
    }

    #[test]
    fn test_source_load_filters_range() {
        let source = JournalSource::from_json(MAP_DOC).unwrap();
        let range = DateRange::new(date(2024, 1, 1), date(2024, 1, 5)).unwrap();

        let loaded = source.load(range).unwrap();
        assert_eq!(loaded.len(), 2);
        assert!(!loaded.contains_key(&date(2024, 1, 9)));
    }

    #[test]
    fn test_full_range() {
        let source = JournalSource::from_json(MAP_DOC).unwrap();
        let range = source.full_range().unwrap();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 1, 9));

        assert!(JournalSource::default().full_range().is_none());
    }

    #[test]
    fn test_from_json_auto_detects_ndjson() {
        let raw = "{\"date\": \"2024-01-01\", \"periodFlow\": \"light\"}\n\
                   {\"date\": \"2024-01-02\", \"periodFlow\": \"medium\"}";
        let source = JournalSource::from_json(raw).unwrap();
        assert_eq!(source.full_range().unwrap().len_days(), 2);
    }

    #[test]
    fn test_from_path_missing_file_fails_fast() {
        let err = JournalSource::from_path(Path::new("/nonexistent/journal.json")).unwrap_err();
        assert!(matches!(err, CycleError::SourceUnavailable(_)));
    }
}
