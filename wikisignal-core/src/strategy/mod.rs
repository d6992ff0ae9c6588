//! Decision rules — map one feed point to one target action.

pub mod week_change;

pub use week_change::{WeekChangeThreshold, DEFAULT_THRESHOLD_PCT};

use crate::data::WikiViews;
use crate::domain::TargetAction;

/// A decision rule maps one data point to one target portfolio action.
///
/// Rules are pure: no side effects, no state across invocations, and total
/// over every well-formed point (a missing metric is a valid input, not an
/// error). `decide` therefore returns a `TargetAction` directly, never a
/// `Result`.
pub trait DecisionRule: Send + Sync {
    /// Short name for reports and logs.
    fn name(&self) -> &str;

    /// Decide the target action for one point.
    fn decide(&self, point: &WikiViews) -> TargetAction;
}
