//! Domain types for wikisignal

pub mod action;
pub mod symbol;

pub use action::TargetAction;
pub use symbol::{Resolution, SecurityId, SecurityKind, Symbol};
