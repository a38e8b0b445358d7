// src/process/normalize.rs
//
// Maps whatever headers a vaccination export uses onto the four canonical
// fields. Alias order is priority order.

use std::{collections::HashMap, fmt};

use tracing::{debug, info, instrument};

use crate::process::{date_parser::parse_date, utils, RawTable};
use crate::table::{CanonicalRecord, CanonicalTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Date,
    Region,
    Subregion,
    Percentage,
}

impl Field {
    pub const ALL: [Field; 4] = [
        Field::Date,
        Field::Region,
        Field::Subregion,
        Field::Percentage,
    ];

    /// Accepted header names, highest priority first. Lowercase.
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Field::Date => &["date", "report_date", "as_of_date"],
            Field::Region => &["recip_state", "state", "location", "jurisdiction"],
            Field::Subregion => &["recip_county", "county", "county_name"],
            Field::Percentage => &[
                "series_complete_pop_pct",
                "percent_fully_vaccinated",
                "people_fully_vaccinated_per_hundred",
                "series_complete_percent",
            ],
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, Field::Subregion)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Date => "date",
            Field::Region => "region",
            Field::Subregion => "subregion",
            Field::Percentage => "percentage",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.as_str(), self.aliases().join("/"))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error(
        "could not find required columns: {}; headers present: {present:?}",
        join_fields(.missing)
    )]
    MissingColumns {
        missing: Vec<Field>,
        present: Vec<String>,
    },
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Column index per canonical field, resolved against one header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub region: usize,
    pub subregion: Option<usize>,
    pub percentage: usize,
}

impl ColumnMap {
    pub fn resolve(headers: &[String]) -> Result<Self, SchemaError> {
        // first column wins when a header name repeats
        let mut by_key: HashMap<String, usize> = HashMap::with_capacity(headers.len());
        for (idx, h) in headers.iter().enumerate() {
            by_key.entry(utils::header_key(h)).or_insert(idx);
        }

        let pick = |field: Field| {
            field
                .aliases()
                .iter()
                .find_map(|alias| by_key.get(*alias).copied())
        };

        let mut found: HashMap<Field, usize> = HashMap::new();
        let mut missing = Vec::new();
        for field in Field::ALL {
            match pick(field) {
                Some(idx) => {
                    debug!(field = field.as_str(), column = %headers[idx], "resolved column");
                    found.insert(field, idx);
                }
                None if field.is_required() => missing.push(field),
                None => debug!(field = field.as_str(), "optional column absent"),
            }
        }

        if !missing.is_empty() {
            return Err(SchemaError::MissingColumns {
                missing,
                present: headers.to_vec(),
            });
        }

        Ok(Self {
            date: found[&Field::Date],
            region: found[&Field::Region],
            subregion: found.get(&Field::Subregion).copied(),
            percentage: found[&Field::Percentage],
        })
    }
}

/// Output of [`normalize`]: surviving records plus how many rows were excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub table: CanonicalTable,
    pub dropped: usize,
}

/// Coerce one raw row. `None` means the row is excluded.
fn coerce_row(raw: &RawTable, row: usize, cols: &ColumnMap) -> Option<CanonicalRecord> {
    let date = parse_date(raw.cell(row, cols.date))?;
    let completion_pct = utils::parse_pct(raw.cell(row, cols.percentage))?;
    let region = raw.cell(row, cols.region).to_string();
    let subregion = match cols.subregion {
        Some(idx) => raw.cell(row, idx).to_string(),
        None => region.clone(),
    };
    Some(CanonicalRecord {
        date,
        region,
        subregion,
        completion_pct,
    })
}

/// Normalize a raw table into the canonical schema.
///
/// Fails only when a required column cannot be located. Rows whose date or
/// percentage does not parse are dropped and counted, never reported.
#[instrument(level = "info", skip(raw), fields(columns = raw.headers.len(), rows = raw.rows.len()))]
pub fn normalize(raw: &RawTable) -> Result<Normalized, SchemaError> {
    let cols = ColumnMap::resolve(&raw.headers)?;

    let mut records = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;
    for row in 0..raw.rows.len() {
        match coerce_row(raw, row, &cols) {
            Some(rec) => records.push(rec),
            None => dropped += 1,
        }
    }

    info!(kept = records.len(), dropped, "normalized table");
    Ok(Normalized {
        table: CanonicalTable::new(records),
        dropped,
    })
}
