//! Deterministic replay over recorded data files.
//!
//! `ReplayFeed` loads one ticker's data CSV and stands in for the host's
//! data services: it answers equity subscriptions, binds the feed symbol,
//! serves the startup history request from points before the replay window,
//! and yields one slice per reporting date. `run_replay` drives a
//! `WikiMomentum` over the feed with a `RecordingSink` and produces a
//! serializable report fingerprinted with blake3. Same config, same file,
//! same report.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::{AlgorithmError, WikiMomentum};
use crate::config::{RunConfig, RunId};
use crate::data::feed::{
    EquitySubscriber, FeedRegistrar, HistoryError, HistoryProvider, SubscribeError,
};
use crate::data::point::{read_points, ParseError, WikiViews};
use crate::data::DataSlice;
use crate::domain::{Resolution, Symbol, TargetAction};
use crate::orders::RecordingSink;

/// Report format version; bump on breaking field changes.
pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Errors surfaced by the replay harness.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error(transparent)]
    Data(#[from] ParseError),

    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),
}

// ─── Replay feed ────────────────────────────────────────────────────

/// In-memory host over one recorded data file.
///
/// Points are held in ascending date order with the empty symbol until a
/// feed is registered; `slices()` and `history()` hand out copies bound to
/// the registered feed symbol.
pub struct ReplayFeed {
    points: Vec<WikiViews>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    equities: Vec<Symbol>,
    feed: Option<Symbol>,
}

impl ReplayFeed {
    /// Parse a data CSV stream. Points are sorted by date; file order is
    /// kept within equal dates.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut points = read_points(reader, &Symbol::empty())?;
        points.sort_by_key(|p| p.date);
        Ok(Self { points, start: None, end: None, equities: Vec::new(), feed: None })
    }

    /// Parse a data CSV file on disk.
    pub fn from_file(path: &Path) -> Result<Self, ParseError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Restrict the replay window (both bounds inclusive, `None` = open).
    /// History requests serve points strictly before `start`.
    pub fn set_window(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.start = start;
        self.end = end;
    }

    /// Every loaded point, windowed or not, in date order.
    pub fn points(&self) -> &[WikiViews] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First and last reporting dates in the file.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        }
    }

    /// blake3 fingerprint of the windowed points' payload (symbols are not
    /// on the wire, so binding does not change the hash).
    pub fn data_hash(&self) -> String {
        let window: Vec<&WikiViews> = self.in_window().collect();
        let json = serde_json::to_vec(&window).expect("point serialization failed");
        format!("{}", blake3::hash(&json).to_hex())
    }

    /// One slice per reporting date within the window, points bound to the
    /// registered feed symbol. Call after feed registration; without one,
    /// points carry the empty symbol.
    pub fn slices(&self) -> Vec<DataSlice> {
        let symbol = self.feed.clone().unwrap_or_else(Symbol::empty);
        let mut slices: Vec<DataSlice> = Vec::new();
        for point in self.in_window() {
            let mut bound = point.clone();
            bound.symbol = symbol.clone();
            match slices.last_mut() {
                Some(slice) if slice.time == bound.date => slice.insert(bound),
                _ => {
                    let mut slice = DataSlice::new(bound.date);
                    slice.insert(bound);
                    slices.push(slice);
                }
            }
        }
        slices
    }

    fn in_window(&self) -> impl Iterator<Item = &WikiViews> {
        let (start, end) = (self.start, self.end);
        self.points.iter().filter(move |p| {
            start.map_or(true, |s| p.date >= s) && end.map_or(true, |e| p.date <= e)
        })
    }
}

impl EquitySubscriber for ReplayFeed {
    fn add_equity(
        &mut self,
        ticker: &str,
        _resolution: Resolution,
    ) -> Result<Symbol, SubscribeError> {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            return Err(SubscribeError::UnknownTicker { ticker: ticker.to_string() });
        }
        let symbol = Symbol::equity(ticker);
        if !self.equities.contains(&symbol) {
            self.equities.push(symbol.clone());
        }
        Ok(symbol)
    }
}

impl FeedRegistrar for ReplayFeed {
    fn add_wiki_views(&mut self, underlying: &Symbol) -> Result<Symbol, SubscribeError> {
        if underlying.is_alt_data() {
            return Err(SubscribeError::NotAnEquity { symbol: underlying.to_string() });
        }
        if underlying.is_empty() {
            return Err(SubscribeError::UnknownTicker { ticker: String::new() });
        }
        let feed = Symbol::wiki_views(underlying);
        self.feed = Some(feed.clone());
        Ok(feed)
    }
}

impl HistoryProvider for ReplayFeed {
    fn history(
        &self,
        symbol: &Symbol,
        periods: usize,
        _resolution: Resolution,
    ) -> Result<Vec<WikiViews>, HistoryError> {
        if self.feed.as_ref() != Some(symbol) {
            return Err(HistoryError::NotSubscribed { symbol: symbol.to_string() });
        }
        // "Past" means strictly before the replay window; with no start
        // date, nothing precedes the window.
        let start = match self.start {
            Some(start) => start,
            None => return Ok(Vec::new()),
        };
        let past: Vec<&WikiViews> = self.points.iter().filter(|p| p.date < start).collect();
        let skip = past.len().saturating_sub(periods);
        Ok(past[skip..]
            .iter()
            .map(|p| {
                let mut bound = (*p).clone();
                bound.symbol = symbol.clone();
                bound
            })
            .collect())
    }
}

// ─── Replay run ─────────────────────────────────────────────────────

/// One dated action from a replay.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRecord {
    pub date: NaiveDate,
    pub action: TargetAction,
}

/// Serializable result of one replay run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplayReport {
    pub schema_version: u32,
    /// Content hash of the config that produced this report.
    pub run_id: RunId,
    pub ticker: String,
    pub rule: String,
    pub equity: Symbol,
    pub feed: Symbol,
    /// First and last replayed dates (None when no slice fell in the window).
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Points returned by the startup history request.
    pub history_points: usize,
    pub slice_count: usize,
    pub point_count: usize,
    pub entries: usize,
    pub liquidations: usize,
    pub actions: Vec<ActionRecord>,
    /// blake3 fingerprint of the replayed data payload.
    pub data_hash: String,
}

/// Replay the configured algorithm over a loaded feed.
///
/// Applies the config's window to the feed, initializes the algorithm
/// (subscriptions + the one history request), then feeds every slice through
/// the decision loop into a recording sink.
pub fn run_replay(config: &RunConfig, feed: &mut ReplayFeed) -> Result<ReplayReport, ReplayError> {
    feed.set_window(config.algorithm.start_date, config.algorithm.end_date);

    let mut algo = WikiMomentum::from_config(config);
    let init = algo.initialize(feed)?;

    let slices = feed.slices();
    let mut sink = RecordingSink::new();
    let mut actions = Vec::new();
    for slice in &slices {
        for action in algo.on_data(slice, &mut sink)? {
            actions.push(ActionRecord { date: slice.time, action });
        }
    }

    let entries = actions.iter().filter(|r| r.action.is_entry()).count();
    Ok(ReplayReport {
        schema_version: REPORT_SCHEMA_VERSION,
        run_id: config.run_id(),
        ticker: config.algorithm.ticker.clone(),
        rule: algo.rule_name().to_string(),
        equity: init.equity,
        feed: init.feed,
        start_date: slices.first().map(|s| s.time),
        end_date: slices.last().map(|s| s.time),
        history_points: init.history_points,
        slice_count: slices.len(),
        point_count: slices.iter().map(|s| s.len()).sum(),
        entries,
        liquidations: actions.len() - entries,
        actions,
        data_hash: feed.data_hash(),
    })
}
