//! Test-day ingest and normalization.
//!
//! This module turns raw user input into a clean list of [`TestDay`] records
//! that are safe to hand to the fitter.
//!
//! Accepted shapes:
//! - a headered CSV whose first two columns are `day,yield` (extra columns
//!   are ignored)
//! - headerless pasted pairs, one `day,yield` per line -- the format herd
//!   management tools export and people paste from spreadsheets
//!
//! Design goals, in order:
//! - **Row-level tolerance**: skip malformed rows but report each with its
//!   line number, so one stray comment does not kill a 300-day record sheet
//! - **Deterministic behavior**: no hidden reordering or filtering
//! - **Separation of concerns**: day-positivity and record-count rules live
//!   in the fitter, which owns the validation taxonomy

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{DatasetStats, FitConfig, TestDay};
use crate::error::AppError;

/// A row-level problem encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    /// 1-based line number in the input.
    pub line: usize,
    pub message: String,
}

/// Ingest output: records in input order + stats + row errors.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub records: Vec<TestDay>,
    pub stats: DatasetStats,
    pub row_errors: Vec<RowError>,
    /// Data rows read, excluding a detected header and blank lines.
    /// Invariant: `rows_read == rows_used + row_errors.len()`.
    pub rows_read: usize,
    pub rows_used: usize,
}

impl IngestedData {
    /// Wrap already-built records (used by the demo generator).
    pub fn from_records(records: Vec<TestDay>) -> Result<Self, AppError> {
        let stats = compute_stats(&records)
            .ok_or_else(|| AppError::new(3, "No test-day records to analyze."))?;
        let n = records.len();
        Ok(Self {
            records,
            stats,
            row_errors: Vec::new(),
            rows_read: n,
            rows_used: n,
        })
    }
}

/// Load records from the configured input (file path, or stdin when absent).
pub fn load_test_days(config: &FitConfig) -> Result<IngestedData, AppError> {
    match &config.input {
        Some(path) => read_test_days_from_path(path),
        None => read_test_days(std::io::stdin().lock()),
    }
}

pub fn read_test_days_from_path(path: &Path) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open input '{}': {e}", path.display())))?;
    read_test_days(file)
}

/// Parse `day,yield` records from any reader.
pub fn read_test_days<R: Read>(reader: R) -> Result<IngestedData, AppError> {
    // Headers are detected rather than assumed: pasted data usually has none.
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                rows_read += 1;
                let line = e.position().map(|p| p.line() as usize).unwrap_or(idx + 1);
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };
        // Blank lines are skipped by the reader, so ask the record where it
        // really came from.
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 1);

        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        match parse_row(&record) {
            Ok(test_day) => {
                rows_read += 1;
                records.push(test_day);
            }
            Err(message) => {
                // A non-numeric first line is a header, not a data row.
                if line == 1 && looks_like_header(&record) {
                    continue;
                }
                rows_read += 1;
                row_errors.push(RowError { line, message });
            }
        }
    }

    let rows_used = records.len();
    if rows_used == 0 {
        return Err(AppError::new(
            3,
            "No valid test-day records found in the input.",
        ));
    }

    let stats = compute_stats(&records)
        .ok_or_else(|| AppError::new(3, "No valid test-day records found in the input."))?;

    Ok(IngestedData {
        records,
        stats,
        row_errors,
        rows_read,
        rows_used,
    })
}

fn parse_row(record: &StringRecord) -> Result<TestDay, String> {
    if record.len() < 2 {
        return Err("Expected at least two fields: day,yield.".to_string());
    }

    let day: f64 = record[0]
        .parse()
        .map_err(|_| format!("Non-numeric day value '{}'.", &record[0]))?;
    let yield_kg: f64 = record[1]
        .parse()
        .map_err(|_| format!("Non-numeric yield value '{}'.", &record[1]))?;

    if !day.is_finite() {
        return Err(format!("Non-finite day value '{}'.", &record[0]));
    }
    if !yield_kg.is_finite() {
        return Err(format!("Non-finite yield value '{}'.", &record[1]));
    }

    Ok(TestDay { day, yield_kg })
}

fn looks_like_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|f| !f.is_empty() && f.parse::<f64>().is_err())
}

/// Stats over the ingested records; `None` when empty or non-finite.
pub fn compute_stats(records: &[TestDay]) -> Option<DatasetStats> {
    if records.is_empty() {
        return None;
    }

    let mut day_min = f64::INFINITY;
    let mut day_max = f64::NEG_INFINITY;
    let mut yield_min = f64::INFINITY;
    let mut yield_max = f64::NEG_INFINITY;
    for r in records {
        day_min = day_min.min(r.day);
        day_max = day_max.max(r.day);
        yield_min = yield_min.min(r.yield_kg);
        yield_max = yield_max.max(r.yield_kg);
    }

    if !(day_min.is_finite() && day_max.is_finite() && yield_min.is_finite() && yield_max.is_finite())
    {
        return None;
    }

    Some(DatasetStats {
        n_points: records.len(),
        day_min,
        day_max,
        yield_min,
        yield_max,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headerless_pasted_pairs() {
        let input = "15,25.5\n30,35.1\n45,40.2\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 3);
        assert!(data.row_errors.is_empty());
        assert_eq!(data.records[0], TestDay { day: 15.0, yield_kg: 25.5 });
        assert_eq!(data.stats.day_min, 15.0);
        assert_eq!(data.stats.day_max, 45.0);
    }

    #[test]
    fn skips_a_header_row_without_reporting_an_error() {
        let input = "day,yield\n15,25.5\n30,35.1\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 2);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn header_and_blank_lines_are_excluded_from_row_counts() {
        let input = "day,yield\n15,25.5\n\nnot,a-number\n45,40.2\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 2);
        assert_eq!(data.row_errors.len(), 1);
        assert_eq!(data.rows_read, data.rows_used + data.row_errors.len());
    }

    #[test]
    fn reports_malformed_rows_with_line_numbers() {
        let input = "15,25.5\nnot,a-number\n45,40.2\n60\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 2);
        assert_eq!(data.row_errors.len(), 2);
        assert_eq!(data.row_errors[0].line, 2);
        assert!(data.row_errors[0].message.contains("Non-numeric"));
        assert_eq!(data.row_errors[1].line, 4);
        assert!(data.row_errors[1].message.contains("two fields"));
    }

    #[test]
    fn ignores_extra_columns() {
        let input = "day,yield,note\n15,25.5,morning\n30,35.1,evening\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 2);
        assert_eq!(data.records[1], TestDay { day: 30.0, yield_kg: 35.1 });
    }

    #[test]
    fn empty_input_is_an_error() {
        let err = read_test_days("".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        let err = read_test_days("day,yield\n".as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn blank_lines_are_skipped_silently() {
        let input = "15,25.5\n\n30,35.1\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 2);
        assert!(data.row_errors.is_empty());
    }

    #[test]
    fn negative_days_pass_through_for_the_fitter_to_reject() {
        // Ingest is parse-level only; the fitter owns the day-positivity rule
        // so the user sees a validation error, not a silently dropped row.
        let input = "-5,25.5\n30,35.1\n45,40.2\n";
        let data = read_test_days(input.as_bytes()).unwrap();
        assert_eq!(data.rows_used, 3);
        assert_eq!(data.records[0].day, -5.0);
    }
}
