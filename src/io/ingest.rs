//! CSV ingest (the loader).
//!
//! This module turns each configured country file into a `RawDataset`: the
//! rows exactly as exported, with counts parsed as signed integers and the
//! trending date left as a string. Validation and filtering happen later in
//! `data::clean`.
//!
//! Failure policy:
//! - missing/unreadable file or missing required column: fatal (exit code 2)
//! - a row with broken CSV framing or a non-integer count: skipped and recorded
//!   as a `RowError`, the run continues

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use csv::StringRecord;
use log::{info, warn};

use crate::domain::{CountryCode, DatasetSource, RawVideoRow};
use crate::error::AppError;

/// Columns every trending export must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "video_id",
    "trending_date",
    "category_id",
    "views",
    "likes",
    "dislikes",
    "comment_count",
];

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub video_id: Option<String>,
    pub message: String,
}

/// Loader output for one country.
#[derive(Debug, Clone)]
pub struct RawDataset {
    pub country: CountryCode,
    /// `None` when read from an in-memory reader.
    pub path: Option<PathBuf>,
    pub rows: Vec<RawVideoRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load every configured source, preserving configuration order.
pub fn load_datasets(sources: &[DatasetSource]) -> Result<Vec<RawDataset>, AppError> {
    let mut seen = Vec::with_capacity(sources.len());
    for source in sources {
        if seen.contains(&source.country) {
            return Err(AppError::input(format!(
                "Country {} is configured more than once.",
                source.country
            )));
        }
        seen.push(source.country);
    }

    sources.iter().map(load_dataset).collect()
}

/// Load one country's CSV file.
pub fn load_dataset(source: &DatasetSource) -> Result<RawDataset, AppError> {
    let file = File::open(&source.path).map_err(|e| {
        AppError::input(format!(
            "Failed to open CSV '{}' ({}): {e}",
            source.path.display(),
            source.country
        ))
    })?;

    let mut dataset = read_dataset(source.country, file)?;
    dataset.path = Some(source.path.clone());

    info!(
        "loaded {} rows for {} from {}",
        dataset.rows.len(),
        source.country,
        source.path.display()
    );
    Ok(dataset)
}

/// Read a trending export from any reader.
pub fn read_dataset<R: Read>(country: CountryCode, reader: R) -> Result<RawDataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers for {country}: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(country, &header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header occupies line 1. Multi-line quoted fields make this a record
        // index rather than a physical line, which is close enough for reports.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    video_id: None,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, &header_map, line) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError {
                line,
                video_id: get_field(&record, &header_map, "video_id").map(str::to_string),
                message,
            }),
        }
    }

    if !row_errors.is_empty() {
        warn!(
            "{country}: skipped {} of {rows_read} rows that could not be parsed (first at line {}: {})",
            row_errors.len(),
            row_errors[0].line,
            row_errors[0].message
        );
    }

    Ok(RawDataset {
        country,
        path: None,
        rows,
        row_errors,
        rows_read,
    })
}

pub(crate) fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

pub(crate) fn normalize_header_name(name: &str) -> String {
    // Spreadsheet tools sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(
    country: CountryCode,
    header_map: &HashMap<String, usize>,
) -> Result<(), AppError> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !header_map.contains_key(*c))
        .collect();
    if missing.is_empty() {
        return Ok(());
    }
    Err(AppError::input(format!(
        "{country}: missing required column(s): {}",
        missing
            .iter()
            .map(|c| format!("`{c}`"))
            .collect::<Vec<_>>()
            .join(", ")
    )))
}

fn parse_row(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    line: usize,
) -> Result<RawVideoRow, String> {
    let video_id = get_required(record, header_map, "video_id")?.to_string();
    let trending_date = get_required(record, header_map, "trending_date")?.to_string();

    Ok(RawVideoRow {
        line,
        video_id,
        trending_date,
        category_id: parse_count(record, header_map, "category_id")?,
        views: parse_count(record, header_map, "views")?,
        likes: parse_count(record, header_map, "likes")?,
        dislikes: parse_count(record, header_map, "dislikes")?,
        comment_count: parse_count(record, header_map, "comment_count")?,
    })
}

fn parse_count(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<i64, String> {
    let raw = get_required(record, header_map, name)?;
    if let Ok(v) = raw.parse::<i64>() {
        return Ok(v);
    }
    // Some exports write counts as floats ("1234.0").
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        _ => Err(format!("Invalid `{name}` value '{raw}' (expected an integer).")),
    }
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    get_field(record, header_map, name).ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn get_field<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Option<&'a str> {
    let idx = header_map.get(name)?;
    record.get(*idx).map(str::trim).filter(|s| !s.is_empty())
}
