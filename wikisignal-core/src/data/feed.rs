//! Host-side data collaborator traits and structured error types.
//!
//! The live trading host owns subscriptions, feed registration, and the
//! historical store; these traits are the narrow contracts the algorithm
//! consumes. `replay::ReplayFeed` implements all three over a recorded file
//! so the same algorithm code runs offline and in tests.

use thiserror::Error;

use super::point::WikiViews;
use crate::domain::{Resolution, Symbol};

/// Errors raised by the subscription collaborators.
#[derive(Debug, Error)]
pub enum SubscribeError {
    #[error("unknown ticker: '{ticker}'")]
    UnknownTicker { ticker: String },

    #[error("feed underlying must be an equity, got {symbol}")]
    NotAnEquity { symbol: String },

    #[error("subscription rejected: {0}")]
    Rejected(String),
}

/// Errors raised by the historical query collaborator.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("no subscription for symbol: {symbol}")]
    NotSubscribed { symbol: String },

    #[error("history source unavailable: {0}")]
    Unavailable(String),
}

/// Equity subscription service: resolves a ticker to a tradable instrument
/// reference at a sampling resolution.
pub trait EquitySubscriber: Send {
    /// Subscribe an equity; returns the resolved symbol.
    fn add_equity(&mut self, ticker: &str, resolution: Resolution)
        -> Result<Symbol, SubscribeError>;
}

/// Alternative-data feed registrar: binds the Wikipedia page-view feed to an
/// equity, producing the feed symbol whose stream carries [`WikiViews`].
pub trait FeedRegistrar: Send {
    /// Register the feed on `underlying`; returns the feed symbol.
    fn add_wiki_views(&mut self, underlying: &Symbol) -> Result<Symbol, SubscribeError>;
}

/// Historical query service: bounded lookback over past feed points.
pub trait HistoryProvider: Send {
    /// Up to `periods` points for `symbol` before now, oldest first.
    fn history(
        &self,
        symbol: &Symbol,
        periods: usize,
        resolution: Resolution,
    ) -> Result<Vec<WikiViews>, HistoryError>;
}
