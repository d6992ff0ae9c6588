//! Instrument references.
//!
//! A `Symbol` names either a tradable equity or an alternative-data feed bound
//! to one. Feed symbols carry their equity as `underlying`; `tradable()`
//! resolves to the instrument orders should target.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by the external security master.
///
/// Appears in universe files (e.g. `ABBV R735QTJ8XC9X`); carried as
/// provenance, never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SecurityId(pub String);

impl SecurityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a symbol refers to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SecurityKind {
    /// Directly tradable equity
    Equity,
    /// Alternative-data feed keyed to an equity
    AltData,
}

/// Sampling resolution for subscriptions and history requests.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
    Second,
    Minute,
    Hour,
    Daily,
}

impl Default for Resolution {
    fn default() -> Self {
        Resolution::Daily
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Second => "second",
            Resolution::Minute => "minute",
            Resolution::Hour => "hour",
            Resolution::Daily => "daily",
        };
        write!(f, "{s}")
    }
}

/// Instrument reference with optional underlying resolution.
///
/// Total order is derived so symbols can key `BTreeMap`s; the kind is part of
/// identity, so an equity and the feed registered on it never collide.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol {
    pub ticker: String,
    pub kind: SecurityKind,
    pub underlying: Option<Box<Symbol>>,
}

impl Symbol {
    /// Reference to a tradable equity.
    pub fn equity(ticker: impl Into<String>) -> Self {
        Self { ticker: ticker.into(), kind: SecurityKind::Equity, underlying: None }
    }

    /// Wikipedia page-view feed symbol bound to an equity.
    pub fn wiki_views(underlying: &Symbol) -> Self {
        Self {
            ticker: underlying.ticker.clone(),
            kind: SecurityKind::AltData,
            underlying: Some(Box::new(underlying.clone())),
        }
    }

    /// The well-known null symbol (empty ticker, no underlying).
    pub fn empty() -> Self {
        Self::equity("")
    }

    pub fn is_empty(&self) -> bool {
        self.ticker.is_empty()
    }

    pub fn is_alt_data(&self) -> bool {
        self.kind == SecurityKind::AltData
    }

    /// Resolve to the instrument orders should target: the underlying when
    /// present, otherwise the symbol itself.
    pub fn tradable(&self) -> &Symbol {
        match &self.underlying {
            Some(underlying) => underlying,
            None => self,
        }
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SecurityKind::Equity => write!(f, "{}", self.ticker),
            SecurityKind::AltData => write!(f, "{}.wikipedia", self.ticker),
        }
    }
}
