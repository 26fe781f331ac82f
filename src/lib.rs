//! Medication adherence tracking.
//!
//! The analytics live in [`core::analyzer`]: adherence rate, day streaks, a
//! per-day calendar and a most-missed ranking, all computed from in-memory
//! dose history. [`db`] is a SQLite store behind the [`db::DoseRepository`]
//! read trait, and the remaining [`core`] modules record outcomes, infer
//! missed doses and raise reminders.

pub mod core;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;

pub use crate::core::analyzer::AdherenceAnalyzer;
pub use crate::error::{Error, Result};
