//! Row validation and date parsing (the cleaner).
//!
//! A row is kept when `views`, `likes`, `dislikes` and `category_id` are all
//! non-negative. Dropped rows are not reported individually. The trending date
//! is parsed with the exporter's fixed `YY.DD.MM` layout; a malformed date
//! aborts the run.

use chrono::NaiveDate;
use log::debug;

use crate::domain::{CleanVideo, CountryCode, RawVideoRow};
use crate::error::AppError;
use crate::io::ingest::RawDataset;

/// Two-digit year, day, month (e.g. `17.14.11` is 2017-11-14).
pub const TRENDING_DATE_FORMAT: &str = "%y.%d.%m";

/// Cleaned rows of one country.
#[derive(Debug, Clone)]
pub struct CleanedDataset {
    pub country: CountryCode,
    pub rows: Vec<CleanVideo>,
    /// Rows removed by the non-negativity filter.
    pub dropped: usize,
}

/// Parse a trending date string.
pub fn parse_trending_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), TRENDING_DATE_FORMAT)
        .map_err(|e| format!("Invalid trending date '{s}' (expected YY.DD.MM): {e}"))
}

/// Validate and convert one country's raw rows.
///
/// Dates are parsed for every row, including rows the filter later removes,
/// so a malformed date is always reported.
pub fn clean_dataset(raw: &RawDataset) -> Result<CleanedDataset, AppError> {
    let mut rows = Vec::with_capacity(raw.rows.len());
    let mut dropped = 0usize;

    for row in &raw.rows {
        let trending_date = parse_trending_date(&row.trending_date).map_err(|e| {
            AppError::input(format!("{} line {}: {e}", raw.country, row.line))
        })?;

        match clean_row(row, trending_date) {
            Some(clean) => rows.push(clean),
            None => dropped += 1,
        }
    }

    debug!(
        "{}: kept {} rows, dropped {dropped} with negative counts",
        raw.country,
        rows.len()
    );

    Ok(CleanedDataset {
        country: raw.country,
        rows,
        dropped,
    })
}

fn clean_row(row: &RawVideoRow, trending_date: NaiveDate) -> Option<CleanVideo> {
    Some(CleanVideo {
        video_id: row.video_id.clone(),
        trending_date,
        category_id: u64::try_from(row.category_id).ok()?,
        views: u64::try_from(row.views).ok()?,
        likes: u64::try_from(row.likes).ok()?,
        dislikes: u64::try_from(row.dislikes).ok()?,
        comment_count: row.comment_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(line: usize, date: &str, views: i64, likes: i64, dislikes: i64, category_id: i64) -> RawVideoRow {
        RawVideoRow {
            line,
            video_id: format!("v{line}"),
            trending_date: date.to_string(),
            category_id,
            views,
            likes,
            dislikes,
            comment_count: 3,
        }
    }

    fn dataset(rows: Vec<RawVideoRow>) -> RawDataset {
        RawDataset {
            country: CountryCode::Ca,
            path: None,
            rows_read: rows.len(),
            rows,
            row_errors: Vec::new(),
        }
    }

    #[test]
    fn parses_two_digit_year_day_month() {
        let d = parse_trending_date("17.14.11").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2017, 11, 14).unwrap());
        let d = parse_trending_date("18.01.06").unwrap();
        assert_eq!(d, NaiveDate::from_ymd_opt(2018, 6, 1).unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        assert!(parse_trending_date("2017-11-14").is_err());
        assert!(parse_trending_date("17.11.14").is_err()); // month 14
        assert!(parse_trending_date("").is_err());
    }

    #[test]
    fn drops_rows_with_negative_counts() {
        let ds = dataset(vec![
            raw(2, "17.14.11", 100, 10, 5, 22),
            raw(3, "17.14.11", -1, 10, 5, 22),
            raw(4, "17.14.11", 100, -10, 5, 22),
            raw(5, "17.14.11", 100, 10, -5, 22),
            raw(6, "17.14.11", 100, 10, 5, -22),
            raw(7, "17.15.11", 0, 0, 0, 0),
        ]);
        let cleaned = clean_dataset(&ds).unwrap();
        assert_eq!(cleaned.rows.len(), 2);
        assert_eq!(cleaned.dropped, 4);
        assert_eq!(cleaned.rows[0].video_id, "v2");
        assert_eq!(cleaned.rows[1].views, 0);
    }

    #[test]
    fn malformed_date_is_fatal_and_names_the_line() {
        let ds = dataset(vec![raw(2, "17.14.11", 1, 1, 1, 1), raw(3, "bogus", 1, 1, 1, 1)]);
        let err = clean_dataset(&ds).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 3"));
    }
}
