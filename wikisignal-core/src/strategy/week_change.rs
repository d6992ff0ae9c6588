//! Week-change threshold rule — full long when attention momentum clears a
//! threshold.
//!
//! Enters when `week_percent_change` is present and strictly greater than
//! `threshold_pct`; liquidates otherwise. Absent and below-threshold values
//! take the same branch: no momentum evidence, no position.

use super::DecisionRule;
use crate::data::WikiViews;
use crate::domain::TargetAction;

/// Default entry threshold in percent.
pub const DEFAULT_THRESHOLD_PCT: f64 = 5.0;

/// Threshold rule over week-over-week page-view change.
#[derive(Debug, Clone)]
pub struct WeekChangeThreshold {
    pub threshold_pct: f64,
}

impl WeekChangeThreshold {
    pub fn new(threshold_pct: f64) -> Self {
        Self { threshold_pct }
    }

    pub fn default_params() -> Self {
        Self::new(DEFAULT_THRESHOLD_PCT)
    }
}

impl Default for WeekChangeThreshold {
    fn default() -> Self {
        Self::default_params()
    }
}

impl DecisionRule for WeekChangeThreshold {
    fn name(&self) -> &str {
        "week_change_threshold"
    }

    fn decide(&self, point: &WikiViews) -> TargetAction {
        let instrument = point.symbol.tradable().clone();
        match point.week_percent_change {
            // Strict inequality; NaN compares false and falls through.
            Some(pct) if pct > self.threshold_pct => TargetAction::EnterFullLong(instrument),
            _ => TargetAction::Liquidate(instrument),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Symbol;
    use chrono::NaiveDate;

    fn point_with(week_percent_change: Option<f64>) -> WikiViews {
        let feed = Symbol::wiki_views(&Symbol::equity("SPY"));
        let mut point = WikiViews::new(feed, NaiveDate::from_ymd_opt(2020, 11, 10).unwrap());
        point.week_percent_change = week_percent_change;
        point
    }

    #[test]
    fn enters_above_threshold() {
        let rule = WeekChangeThreshold::default_params();
        let action = rule.decide(&point_with(Some(5.1)));
        assert_eq!(action, TargetAction::EnterFullLong(Symbol::equity("SPY")));
    }

    #[test]
    fn liquidates_at_exact_threshold() {
        // 5.0 is not strictly greater than 5.0
        let rule = WeekChangeThreshold::default_params();
        let action = rule.decide(&point_with(Some(5.0)));
        assert_eq!(action, TargetAction::Liquidate(Symbol::equity("SPY")));
    }

    #[test]
    fn liquidates_below_threshold() {
        let rule = WeekChangeThreshold::default_params();
        let action = rule.decide(&point_with(Some(-3.2)));
        assert_eq!(action, TargetAction::Liquidate(Symbol::equity("SPY")));
    }

    #[test]
    fn liquidates_when_absent() {
        let rule = WeekChangeThreshold::default_params();
        let action = rule.decide(&point_with(None));
        assert_eq!(action, TargetAction::Liquidate(Symbol::equity("SPY")));
    }

    #[test]
    fn zero_is_distinct_from_absent_but_same_branch() {
        let rule = WeekChangeThreshold::default_params();
        assert!(!rule.decide(&point_with(Some(0.0))).is_entry());
        assert!(!rule.decide(&point_with(None)).is_entry());
    }

    #[test]
    fn nan_takes_liquidate_branch() {
        let rule = WeekChangeThreshold::default_params();
        assert!(!rule.decide(&point_with(Some(f64::NAN))).is_entry());
    }

    #[test]
    fn resolves_to_underlying_instrument() {
        let rule = WeekChangeThreshold::default_params();
        let point = point_with(Some(9.0));
        let action = rule.decide(&point);
        assert_eq!(action.symbol(), point.symbol.tradable());
        assert!(!action.symbol().is_alt_data());
    }

    #[test]
    fn targets_symbol_itself_without_underlying() {
        let rule = WeekChangeThreshold::default_params();
        let mut point = point_with(Some(9.0));
        point.symbol = Symbol::equity("SPY");
        assert_eq!(rule.decide(&point).symbol(), &Symbol::equity("SPY"));
    }

    #[test]
    fn idempotent_on_same_point() {
        let rule = WeekChangeThreshold::default_params();
        for week in [Some(5.1), Some(5.0), Some(-3.2), None] {
            let point = point_with(week);
            assert_eq!(rule.decide(&point), rule.decide(&point));
        }
    }

    #[test]
    fn custom_threshold() {
        let rule = WeekChangeThreshold::new(2.0);
        assert!(rule.decide(&point_with(Some(3.0))).is_entry());
        assert!(!rule.decide(&point_with(Some(2.0))).is_entry());
        assert!(!WeekChangeThreshold::default_params().decide(&point_with(Some(3.0))).is_entry());
    }

    #[test]
    fn name_and_defaults() {
        let rule = WeekChangeThreshold::default_params();
        assert_eq!(rule.name(), "week_change_threshold");
        assert_eq!(rule.threshold_pct, DEFAULT_THRESHOLD_PCT);
        assert_eq!(WeekChangeThreshold::default().threshold_pct, 5.0);
    }
}
