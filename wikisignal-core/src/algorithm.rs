//! Algorithm driver — subscriptions, the startup history request, and the
//! per-slice decision loop.
//!
//! `WikiMomentum` is the host-facing shell around a [`DecisionRule`]: it
//! subscribes the configured equity, registers the Wikipedia page-view feed
//! on it, runs one bounded history request (logged by the caller, never used
//! downstream), then maps each incoming slice through the rule and hands the
//! resulting actions to the order collaborator.

use serde::Serialize;
use thiserror::Error;

use crate::config::RunConfig;
use crate::data::feed::{
    EquitySubscriber, FeedRegistrar, HistoryError, HistoryProvider, SubscribeError,
};
use crate::data::DataSlice;
use crate::domain::{Resolution, Symbol, TargetAction};
use crate::orders::{dispatch, OrderError, OrderSink};
use crate::strategy::{DecisionRule, WeekChangeThreshold};

/// Collaborator failures, propagated unchanged from the boundary.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    #[error(transparent)]
    Subscribe(#[from] SubscribeError),

    #[error(transparent)]
    History(#[from] HistoryError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

/// What `initialize` subscribed and saw. Returned so the caller can log it;
/// nothing downstream depends on the history count.
#[derive(Debug, Clone, Serialize)]
pub struct InitSummary {
    pub equity: Symbol,
    pub feed: Symbol,
    /// Points returned by the startup history request.
    pub history_points: usize,
}

/// Wikipedia attention momentum algorithm.
///
/// Owns a boxed decision rule and the run parameters. Holds no portfolio
/// state: position bookkeeping lives entirely behind the order collaborator.
pub struct WikiMomentum {
    rule: Box<dyn DecisionRule>,
    ticker: String,
    resolution: Resolution,
    history_lookback: usize,
    equity: Option<Symbol>,
    feed: Option<Symbol>,
}

impl WikiMomentum {
    /// Build from config with the standard week-change threshold rule.
    pub fn from_config(config: &RunConfig) -> Self {
        let rule = WeekChangeThreshold::new(config.rule.week_change_threshold_pct);
        Self::with_rule(Box::new(rule), config)
    }

    /// Build with a caller-supplied rule.
    pub fn with_rule(rule: Box<dyn DecisionRule>, config: &RunConfig) -> Self {
        Self {
            rule,
            ticker: config.algorithm.ticker.clone(),
            resolution: config.algorithm.resolution,
            history_lookback: config.algorithm.history_lookback,
            equity: None,
            feed: None,
        }
    }

    pub fn rule_name(&self) -> &str {
        self.rule.name()
    }

    /// Subscribed equity symbol, set by `initialize`.
    pub fn equity(&self) -> Option<&Symbol> {
        self.equity.as_ref()
    }

    /// Registered feed symbol, set by `initialize`.
    pub fn feed(&self) -> Option<&Symbol> {
        self.feed.as_ref()
    }

    /// Subscribe the equity, register the feed on it, and run the one
    /// startup history request.
    pub fn initialize<H>(&mut self, host: &mut H) -> Result<InitSummary, AlgorithmError>
    where
        H: EquitySubscriber + FeedRegistrar + HistoryProvider,
    {
        let equity = host.add_equity(&self.ticker, self.resolution)?;
        let feed = host.add_wiki_views(&equity)?;
        let past = host.history(&feed, self.history_lookback, self.resolution)?;

        self.equity = Some(equity.clone());
        self.feed = Some(feed.clone());
        Ok(InitSummary { equity, feed, history_points: past.len() })
    }

    /// Apply the rule to every point in the slice, dispatching each action to
    /// the order sink as it is decided. Returns the actions in slice order.
    ///
    /// An empty slice yields no actions and is not an error.
    pub fn on_data(
        &self,
        slice: &DataSlice,
        orders: &mut dyn OrderSink,
    ) -> Result<Vec<TargetAction>, AlgorithmError> {
        let mut actions = Vec::with_capacity(slice.len());
        for point in slice.wiki_views() {
            let action = self.rule.decide(point);
            dispatch(orders, &action)?;
            actions.push(action);
        }
        Ok(actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::WikiViews;
    use crate::orders::RecordingSink;
    use chrono::NaiveDate;

    /// Minimal host: accepts any non-empty ticker, returns a fixed number of
    /// history points, optionally fails the history call.
    struct StubHost {
        history_points: usize,
        history_unavailable: bool,
    }

    impl StubHost {
        fn new(history_points: usize) -> Self {
            Self { history_points, history_unavailable: false }
        }
    }

    impl EquitySubscriber for StubHost {
        fn add_equity(
            &mut self,
            ticker: &str,
            _resolution: Resolution,
        ) -> Result<Symbol, SubscribeError> {
            if ticker.is_empty() {
                return Err(SubscribeError::UnknownTicker { ticker: ticker.to_string() });
            }
            Ok(Symbol::equity(ticker))
        }
    }

    impl FeedRegistrar for StubHost {
        fn add_wiki_views(&mut self, underlying: &Symbol) -> Result<Symbol, SubscribeError> {
            if underlying.is_alt_data() {
                return Err(SubscribeError::NotAnEquity { symbol: underlying.to_string() });
            }
            Ok(Symbol::wiki_views(underlying))
        }
    }

    impl HistoryProvider for StubHost {
        fn history(
            &self,
            symbol: &Symbol,
            periods: usize,
            _resolution: Resolution,
        ) -> Result<Vec<WikiViews>, HistoryError> {
            if self.history_unavailable {
                return Err(HistoryError::Unavailable("stub offline".into()));
            }
            let base = NaiveDate::from_ymd_opt(2020, 9, 1).unwrap();
            Ok((0..periods.min(self.history_points))
                .map(|i| WikiViews::new(symbol.clone(), base + chrono::Duration::days(i as i64)))
                .collect())
        }
    }

    /// Sink that rejects everything.
    struct RejectingSink;

    impl OrderSink for RejectingSink {
        fn enter_full_long(&mut self, symbol: &Symbol) -> Result<(), OrderError> {
            Err(OrderError::Rejected { symbol: symbol.to_string(), reason: "stub".into() })
        }

        fn liquidate(&mut self, symbol: &Symbol) -> Result<(), OrderError> {
            Err(OrderError::Rejected { symbol: symbol.to_string(), reason: "stub".into() })
        }
    }

    fn point_with(ticker: &str, week: Option<f64>) -> WikiViews {
        let feed = Symbol::wiki_views(&Symbol::equity(ticker));
        let mut point = WikiViews::new(feed, NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());
        point.week_percent_change = week;
        point
    }

    #[test]
    fn initialize_subscribes_and_queries_history() {
        let mut algo = WikiMomentum::from_config(&RunConfig::default());
        let mut host = StubHost::new(200);

        let summary = algo.initialize(&mut host).unwrap();

        assert_eq!(summary.equity, Symbol::equity("SPY"));
        assert!(summary.feed.is_alt_data());
        assert_eq!(summary.feed.tradable(), &Symbol::equity("SPY"));
        assert_eq!(summary.history_points, 60, "default lookback bounds the request");
        assert_eq!(algo.equity(), Some(&Symbol::equity("SPY")));
        assert_eq!(algo.feed(), Some(&summary.feed));
    }

    #[test]
    fn initialize_propagates_subscribe_error() {
        let mut config = RunConfig::default();
        config.algorithm.ticker = String::new();
        let mut algo = WikiMomentum::from_config(&config);

        let err = algo.initialize(&mut StubHost::new(10)).unwrap_err();
        assert!(matches!(err, AlgorithmError::Subscribe(SubscribeError::UnknownTicker { .. })));
        assert!(algo.equity().is_none(), "failed init must not record symbols");
    }

    #[test]
    fn initialize_propagates_history_error() {
        let mut algo = WikiMomentum::from_config(&RunConfig::default());
        let mut host = StubHost::new(10);
        host.history_unavailable = true;

        let err = algo.initialize(&mut host).unwrap_err();
        assert!(matches!(err, AlgorithmError::History(HistoryError::Unavailable(_))));
    }

    #[test]
    fn on_data_applies_rule_to_every_point() {
        let algo = WikiMomentum::from_config(&RunConfig::default());
        let mut slice = DataSlice::new(NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());
        slice.insert(point_with("AAPL", Some(9.0)));
        slice.insert(point_with("MSFT", None));

        let mut sink = RecordingSink::new();
        let actions = algo.on_data(&slice, &mut sink).unwrap();

        assert_eq!(
            actions,
            vec![
                TargetAction::EnterFullLong(Symbol::equity("AAPL")),
                TargetAction::Liquidate(Symbol::equity("MSFT")),
            ]
        );
        assert_eq!(sink.commands, actions, "every action reaches the sink");
    }

    #[test]
    fn on_data_empty_slice_is_a_no_op() {
        let algo = WikiMomentum::from_config(&RunConfig::default());
        let slice = DataSlice::new(NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());

        let mut sink = RecordingSink::new();
        let actions = algo.on_data(&slice, &mut sink).unwrap();
        assert!(actions.is_empty());
        assert!(sink.commands.is_empty());
    }

    #[test]
    fn on_data_propagates_order_error() {
        let algo = WikiMomentum::from_config(&RunConfig::default());
        let mut slice = DataSlice::new(NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());
        slice.insert(point_with("SPY", Some(9.0)));

        let err = algo.on_data(&slice, &mut RejectingSink).unwrap_err();
        assert!(matches!(err, AlgorithmError::Order(OrderError::Rejected { .. })));
    }

    #[test]
    fn config_threshold_reaches_the_rule() {
        let mut config = RunConfig::default();
        config.rule.week_change_threshold_pct = 2.0;
        let algo = WikiMomentum::from_config(&config);

        let mut slice = DataSlice::new(NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());
        slice.insert(point_with("SPY", Some(3.0)));

        let mut sink = RecordingSink::new();
        let actions = algo.on_data(&slice, &mut sink).unwrap();
        assert!(actions[0].is_entry(), "3.0 clears a 2.0 threshold");
    }

    #[test]
    fn rule_name_is_exposed() {
        let algo = WikiMomentum::from_config(&RunConfig::default());
        assert_eq!(algo.rule_name(), "week_change_threshold");
    }
}
