//! wikisignal Core — Wikipedia attention signal evaluation.
//!
//! This crate contains everything the replay binary builds on:
//! - Domain types (symbols with underlying resolution, target actions)
//! - Data-point and universe-file parsing with the provider's wire formats
//! - Collaborator trait contracts for the host's data and order services
//! - The threshold decision rule behind the `DecisionRule` trait
//! - The algorithm driver (subscribe, one history request, per-slice loop)
//! - A deterministic replay harness with fingerprinted reports

pub mod algorithm;
pub mod config;
pub mod data;
pub mod domain;
pub mod orders;
pub mod replay;
pub mod strategy;
