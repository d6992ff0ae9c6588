//! Wikipedia page-view data points and their wire formats.
//!
//! Two formats, both owned here:
//! - **Data CSV** (one file per ticker, no header):
//!   `yyyymmdd,views,pct_change_week,pct_change_month`. Empty numeric fields
//!   decode to `None`.
//! - **JSON** with the provider's field names (`Date`, `Views`,
//!   `pct_change_week`, `pct_change_month`); missing or `null` fields decode
//!   to `None`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Duration, NaiveDate};
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Symbol;

/// Columns in a data-file row.
pub const DATA_COLUMNS: usize = 4;

/// One reporting-period record from the Wikipedia attention feed.
///
/// Constructed by the feed once per period per instrument, consumed exactly
/// once by the decision rule, then discarded. Presence is modeled with
/// `Option`: the provider reports nothing for a period, the field is `None`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WikiViews {
    /// Feed symbol the point was delivered on. Bound at subscription time,
    /// never carried on the wire.
    #[serde(skip)]
    pub symbol: Symbol,

    /// Reporting date.
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    /// Total page views over the period.
    #[serde(rename = "Views", default)]
    pub page_views: Option<f64>,

    /// Week-over-week percentage change in page views.
    #[serde(rename = "pct_change_week", default)]
    pub week_percent_change: Option<f64>,

    /// Month-over-month percentage change in page views.
    #[serde(rename = "pct_change_month", default)]
    pub month_percent_change: Option<f64>,
}

impl WikiViews {
    /// Point with all metrics absent.
    pub fn new(symbol: Symbol, date: NaiveDate) -> Self {
        Self {
            symbol,
            date,
            page_views: None,
            week_percent_change: None,
            month_percent_change: None,
        }
    }

    /// The time at which this point becomes observable: each point spans one
    /// day, so the period ends the day after the reporting date.
    pub fn end_date(&self) -> NaiveDate {
        self.date + Duration::days(1)
    }

    /// Parse one data-file record bound to `symbol`. `row` is the 1-based
    /// line number used in error messages.
    pub fn from_record(
        symbol: &Symbol,
        record: &StringRecord,
        row: usize,
    ) -> Result<Self, ParseError> {
        if record.len() != DATA_COLUMNS {
            return Err(ParseError::FieldCount {
                row,
                expected: DATA_COLUMNS,
                found: record.len(),
            });
        }
        Ok(Self {
            symbol: symbol.clone(),
            date: parse_date(&record[0], row)?,
            page_views: parse_optional(&record[1], "views", row)?,
            week_percent_change: parse_optional(&record[2], "pct_change_week", row)?,
            month_percent_change: parse_optional(&record[3], "pct_change_month", row)?,
        })
    }

    /// Parse a single comma-separated line. Convenience for callers holding
    /// one row; file readers go through [`read_points`].
    pub fn parse_line(symbol: &Symbol, line: &str) -> Result<Self, ParseError> {
        let record = StringRecord::from(line.split(',').collect::<Vec<_>>());
        Self::from_record(symbol, &record, 1)
    }
}

/// Read every data point from a CSV stream, bound to `symbol`, in file order.
pub fn read_points<R: Read>(reader: R, symbol: &Symbol) -> Result<Vec<WikiViews>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut points = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        points.push(WikiViews::from_record(symbol, &record, i + 1)?);
    }
    Ok(points)
}

/// Read every data point from a CSV file on disk.
pub fn load_points(path: &Path, symbol: &Symbol) -> Result<Vec<WikiViews>, ParseError> {
    let file = File::open(path)?;
    read_points(file, symbol)
}

pub(crate) fn parse_date(value: &str, row: usize) -> Result<NaiveDate, ParseError> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(trimmed, "%Y%m%d").map_err(|_| ParseError::InvalidDate {
        row,
        value: trimmed.to_string(),
    })
}

pub(crate) fn parse_optional(
    value: &str,
    field: &'static str,
    row: usize,
) -> Result<Option<f64>, ParseError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ParseError::InvalidNumber { row, field, value: trimmed.to_string() })
}

/// Errors decoding data or universe files.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("row {row}: expected {expected} fields, found {found}")]
    FieldCount { row: usize, expected: usize, found: usize },

    #[error("row {row}: invalid date '{value}'")]
    InvalidDate { row: usize, value: String },

    #[error("row {row}: invalid number in {field}: '{value}'")]
    InvalidNumber { row: usize, field: &'static str, value: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wiki_symbol() -> Symbol {
        Symbol::wiki_views(&Symbol::equity("SPY"))
    }

    #[test]
    fn test_parse_provider_row() {
        let point =
            WikiViews::parse_line(&wiki_symbol(), "20201110,1599,-1.9018404908,-9.4050991501")
                .unwrap();

        assert_eq!(point.date, NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());
        assert_eq!(point.page_views, Some(1599.0));
        assert_eq!(point.week_percent_change, Some(-1.9018404908));
        assert_eq!(point.month_percent_change, Some(-9.4050991501));
        assert_eq!(point.end_date(), NaiveDate::from_ymd_opt(2020, 11, 11).unwrap());
    }

    #[test]
    fn test_empty_fields_decode_to_none() {
        let point = WikiViews::parse_line(&wiki_symbol(), "20201110,,,").unwrap();
        assert_eq!(point.page_views, None);
        assert_eq!(point.week_percent_change, None);
        assert_eq!(point.month_percent_change, None);
    }

    #[test]
    fn test_field_count_error() {
        let err = WikiViews::parse_line(&wiki_symbol(), "20201110,1599").unwrap_err();
        assert!(matches!(err, ParseError::FieldCount { found: 2, .. }));
    }

    #[test]
    fn test_invalid_date_error() {
        let err = WikiViews::parse_line(&wiki_symbol(), "2020-11-10,1599,1.0,2.0").unwrap_err();
        assert!(matches!(err, ParseError::InvalidDate { .. }));
    }

    #[test]
    fn test_invalid_number_error() {
        let err = WikiViews::parse_line(&wiki_symbol(), "20201110,abc,1.0,2.0").unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { field: "views", .. }));
    }

    #[test]
    fn test_read_points_preserves_file_order() {
        let csv = "20201110,1599,-1.9,-9.4\n20201111,1784,2.3,1.1\n";
        let points = read_points(csv.as_bytes(), &wiki_symbol()).unwrap();
        assert_eq!(points.len(), 2);
        assert!(points[0].date < points[1].date);
        assert_eq!(points[1].page_views, Some(1784.0));
    }

    #[test]
    fn test_json_decode_provider_fields() {
        let json = r#"{
            "Date": "2020-01-01",
            "Ticker": "ABBV",
            "Views": 3500,
            "pct_change_week": 3.2,
            "pct_change_month": 6.75
        }"#;
        let point: WikiViews = serde_json::from_str(json).unwrap();

        assert_eq!(point.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(point.page_views, Some(3500.0));
        assert_eq!(point.week_percent_change, Some(3.2));
        assert_eq!(point.month_percent_change, Some(6.75));
        assert!(point.symbol.is_empty(), "symbol is not carried on the wire");
    }

    #[test]
    fn test_json_round_trip_with_null_month() {
        let mut point =
            WikiViews::new(Symbol::empty(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        point.page_views = Some(3500.0);
        point.week_percent_change = Some(3.2);

        let json = serde_json::to_string(&point).unwrap();
        let back: WikiViews = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
        assert_eq!(back.month_percent_change, None);
    }

    #[test]
    fn test_json_missing_optional_fields() {
        let point: WikiViews = serde_json::from_str(r#"{"Date": "2020-01-01"}"#).unwrap();
        assert_eq!(point.page_views, None);
        assert_eq!(point.week_percent_change, None);
        assert_eq!(point.month_percent_change, None);
    }
}
