//! dailies - Recurring Checklist Library
//!
//! This library provides the core functionality for the dailies CLI tool:
//! a personal checklist for recurring in-game objectives that reset on fixed
//! real-world schedules.
//!
//! # Core Concepts
//!
//! - **Catalog**: static task universe, grouped into daily and weekly tiers
//!   plus independently-cycling rotating timers
//! - **Reconciliation**: comparing the persisted last-check timestamp with
//!   the current time to decide which completion flags to clear
//! - **Presence window**: the interval after a rotating timer's occurrence
//!   during which the event is active rather than merely upcoming
//! - **Render model**: pull-based presentation data; the core never renders
//!
//! # Module Organization
//!
//! - `catalog`: static task and timer definitions
//! - `schedule`: periodic event calculator (occurrences, presence, countdowns)
//! - `reconcile`: reset boundary detection over the persisted ledger
//! - `state`: task state store (visible/completed/selected) and snapshots
//! - `storage`: data directory management and atomic persistence
//! - `config`: optional `dailies.toml` configuration
//! - `tracker`: composition root and command surface
//! - `cli`: command-line interface using clap
//! - `ui`: interactive terminal checklist
//! - `error`: error types and result aliases
//! - `output`: shared human/JSON output formatting

pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod reconcile;
pub mod schedule;
pub mod state;
pub mod storage;
pub mod tracker;
pub mod ui;

pub use error::{Error, Result};
