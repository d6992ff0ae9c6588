//! Order/portfolio collaborator contract.
//!
//! Commands are fire-and-forget: execution semantics (fills, slippage,
//! partial fills) are entirely owned by the host. The library ships one
//! implementation, `RecordingSink`, used by the replay harness and tests.

use thiserror::Error;

use crate::domain::{Symbol, TargetAction};

/// Errors raised by the order collaborator.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("order rejected for {symbol}: {reason}")]
    Rejected { symbol: String, reason: String },

    #[error("instrument not tradable: {symbol}")]
    NotTradable { symbol: String },
}

/// Order/portfolio service.
pub trait OrderSink: Send {
    /// Target 100% of available capital in `symbol`.
    fn enter_full_long(&mut self, symbol: &Symbol) -> Result<(), OrderError>;

    /// Close any open position in `symbol`.
    fn liquidate(&mut self, symbol: &Symbol) -> Result<(), OrderError>;
}

/// Send a target action to the matching sink method.
pub fn dispatch(sink: &mut dyn OrderSink, action: &TargetAction) -> Result<(), OrderError> {
    match action {
        TargetAction::EnterFullLong(symbol) => sink.enter_full_long(symbol),
        TargetAction::Liquidate(symbol) => sink.liquidate(symbol),
    }
}

/// Sink that records every command in arrival order.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub commands: Vec<TargetAction>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderSink for RecordingSink {
    fn enter_full_long(&mut self, symbol: &Symbol) -> Result<(), OrderError> {
        self.commands.push(TargetAction::EnterFullLong(symbol.clone()));
        Ok(())
    }

    fn liquidate(&mut self, symbol: &Symbol) -> Result<(), OrderError> {
        self.commands.push(TargetAction::Liquidate(symbol.clone()));
        Ok(())
    }
}
