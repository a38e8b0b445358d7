// src/table.rs

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

/// One normalized observation: completion percentage for a county on a date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRecord {
    pub date: NaiveDate,
    /// State or jurisdiction.
    pub region: String,
    /// County; equal to `region` when the source has no county column.
    pub subregion: String,
    pub completion_pct: f64,
}

/// The normalized dataset, in source row order. Built once, then only read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    records: Vec<CanonicalRecord>,
}

impl CanonicalTable {
    pub fn new(records: Vec<CanonicalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sorted distinct regions, for populating a selector. Blank regions are skipped.
    pub fn regions(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|r| r.region.as_str())
            .filter(|r| !r.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn contains_region(&self, region: &str) -> bool {
        self.records.iter().any(|r| r.region == region)
    }

    /// Records for `region`, keeping their relative order.
    pub fn filter_region(&self, region: &str) -> Vec<&CanonicalRecord> {
        self.records.iter().filter(|r| r.region == region).collect()
    }

    /// Earliest and latest date in the table.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}
