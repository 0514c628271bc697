//! Column inspection for raw exports.
//!
//! Used by `trends inspect` to decide what cleaning a new export needs before
//! running the full analysis: which columns exist and where cells are empty.

use std::fs::File;
use std::io::Read;

use serde::Serialize;

use crate::domain::{CountryCode, DatasetSource};
use crate::error::AppError;
use crate::io::ingest::{REQUIRED_COLUMNS, normalize_header_name};

/// Per-column presence summary.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub required: bool,
    /// Rows where the cell is missing or blank.
    pub empty: usize,
}

impl ColumnProfile {
    pub fn has_empty(&self) -> bool {
        self.empty > 0
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetProfile {
    pub country: CountryCode,
    pub rows: usize,
    pub malformed_rows: usize,
    pub columns: Vec<ColumnProfile>,
}

/// Profile one configured source file.
pub fn inspect_source(source: &DatasetSource) -> Result<DatasetProfile, AppError> {
    let file = File::open(&source.path).map_err(|e| {
        AppError::input(format!(
            "Failed to open CSV '{}' ({}): {e}",
            source.path.display(),
            source.country
        ))
    })?;
    inspect_reader(source.country, file)
}

/// Profile a trending export from any reader.
pub fn inspect_reader<R: Read>(country: CountryCode, reader: R) -> Result<DatasetProfile, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers for {country}: {e}")))?
        .clone();

    let mut columns: Vec<ColumnProfile> = headers
        .iter()
        .map(|h| {
            let name = normalize_header_name(h);
            let required = REQUIRED_COLUMNS.contains(&name.as_str());
            ColumnProfile {
                name,
                required,
                empty: 0,
            }
        })
        .collect();

    let mut rows = 0usize;
    let mut malformed_rows = 0usize;
    for result in reader.records() {
        let Ok(record) = result else {
            malformed_rows += 1;
            continue;
        };
        rows += 1;
        for (idx, col) in columns.iter_mut().enumerate() {
            if record.get(idx).is_none_or(|cell| cell.trim().is_empty()) {
                col.empty += 1;
            }
        }
    }

    Ok(DatasetProfile {
        country,
        rows,
        malformed_rows,
        columns,
    })
}
