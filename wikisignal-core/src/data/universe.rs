//! Daily universe files and coarse selection.
//!
//! One file per delivery date (`yyyymmdd.csv`), one row per covered security:
//! `security_id,ticker,views,pct_change_week,pct_change_month`. A file
//! delivered on date D reports metrics through D-1, so rows are dated one day
//! before the file date.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use csv::StringRecord;
use serde::{Deserialize, Serialize};

use super::point::{parse_optional, ParseError};
use crate::domain::{SecurityId, Symbol};

/// Columns in a universe-file row.
pub const UNIVERSE_COLUMNS: usize = 5;

/// One security's attention metrics for one day.
#[derive(Debug, Clone, PartialEq)]
pub struct UniverseRow {
    /// Security-master identifier, carried as provenance.
    pub security_id: SecurityId,
    pub symbol: Symbol,
    /// Metric date (file date minus one day).
    pub date: NaiveDate,
    pub page_views: Option<f64>,
    pub week_percent_change: Option<f64>,
    pub month_percent_change: Option<f64>,
}

impl UniverseRow {
    /// Parse one universe record; `date` is the already-shifted metric date.
    pub fn from_record(
        record: &StringRecord,
        date: NaiveDate,
        row: usize,
    ) -> Result<Self, ParseError> {
        if record.len() != UNIVERSE_COLUMNS {
            return Err(ParseError::FieldCount {
                row,
                expected: UNIVERSE_COLUMNS,
                found: record.len(),
            });
        }
        Ok(Self {
            security_id: SecurityId::new(record[0].trim()),
            symbol: Symbol::equity(record[1].trim()),
            date,
            page_views: parse_optional(&record[2], "views", row)?,
            week_percent_change: parse_optional(&record[3], "pct_change_week", row)?,
            month_percent_change: parse_optional(&record[4], "pct_change_month", row)?,
        })
    }
}

/// Read a universe stream delivered on `file_date`, in file order.
pub fn read_universe<R: Read>(
    reader: R,
    file_date: NaiveDate,
) -> Result<Vec<UniverseRow>, ParseError> {
    let date = file_date - Duration::days(1);
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        rows.push(UniverseRow::from_record(&record, date, i + 1)?);
    }
    Ok(rows)
}

/// Read a universe file on disk delivered on `file_date`.
pub fn load_universe(path: &Path, file_date: NaiveDate) -> Result<Vec<UniverseRow>, ParseError> {
    let file = File::open(path)?;
    read_universe(file, file_date)
}

/// Coarse selection thresholds.
///
/// A row is selected when both metrics are present and strictly above their
/// thresholds; a missing metric excludes the row.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UniverseFilter {
    pub min_page_views: f64,
    pub min_month_percent_change: f64,
}

impl Default for UniverseFilter {
    fn default() -> Self {
        Self { min_page_views: 100.0, min_month_percent_change: 0.2 }
    }
}

impl UniverseFilter {
    pub fn matches(&self, row: &UniverseRow) -> bool {
        let views_ok = row.page_views.map_or(false, |v| v > self.min_page_views);
        let month_ok = row
            .month_percent_change
            .map_or(false, |m| m > self.min_month_percent_change);
        views_ok && month_ok
    }

    /// Symbols of the selected rows, in file order.
    pub fn select(&self, rows: &[UniverseRow]) -> Vec<Symbol> {
        rows.iter().filter(|r| self.matches(r)).map(|r| r.symbol.clone()).collect()
    }
}
