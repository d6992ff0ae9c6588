use std::collections::BTreeMap;

use chrono::NaiveDate;

use super::point::WikiViews;
use crate::domain::Symbol;

/// One date's batch of feed points, keyed by symbol.
///
/// Backed by a `BTreeMap` so iteration order is deterministic run to run.
/// A slice may be empty; the algorithm treats that as "nothing to do", not an
/// error.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSlice {
    pub time: NaiveDate,
    points: BTreeMap<Symbol, WikiViews>,
}

impl DataSlice {
    pub fn new(time: NaiveDate) -> Self {
        Self { time, points: BTreeMap::new() }
    }

    /// Add a point, keyed by its symbol. A later point for the same symbol
    /// replaces the earlier one (one point per symbol per period).
    pub fn insert(&mut self, point: WikiViews) {
        self.points.insert(point.symbol.clone(), point);
    }

    /// All Wikipedia page-view points in this slice, in symbol order.
    pub fn wiki_views(&self) -> impl Iterator<Item = &WikiViews> {
        self.points.values()
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&WikiViews> {
        self.points.get(symbol)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
