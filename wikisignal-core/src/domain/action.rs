use std::fmt;

use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Target portfolio instruction produced by the decision rule.
///
/// Execution semantics (fills, slippage, partial fills) belong to the order
/// collaborator; this is the instruction, not the outcome.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum TargetAction {
    /// Allocate 100% of available capital to the instrument.
    EnterFullLong(Symbol),
    /// Close any existing position in the instrument.
    Liquidate(Symbol),
}

impl TargetAction {
    /// The instrument this instruction targets.
    pub fn symbol(&self) -> &Symbol {
        match self {
            TargetAction::EnterFullLong(symbol) => symbol,
            TargetAction::Liquidate(symbol) => symbol,
        }
    }

    pub fn is_entry(&self) -> bool {
        matches!(self, TargetAction::EnterFullLong(_))
    }

    pub fn verb(&self) -> &'static str {
        match self {
            TargetAction::EnterFullLong(_) => "enter-full-long",
            TargetAction::Liquidate(_) => "liquidate",
        }
    }
}

impl fmt::Display for TargetAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.verb(), self.symbol())
    }
}
