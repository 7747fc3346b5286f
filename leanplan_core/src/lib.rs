#![forbid(unsafe_code)]

//! Core domain model and business logic for the Leanplan weight-loss tracker.
//!
//! This crate provides:
//! - Domain types (profile, exercises, meals, daily records, plans)
//! - Constant lookup tables (activity multipliers, MET values, macro split)
//! - Metrics calculator (BMI, BMR, TDEE, exercise burn)
//! - Daily aggregation, plan generation and progress analysis
//! - Persistence (JSON store, CSV export) and the tracker facade

pub mod types;
pub mod error;
pub mod tables;
pub mod config;
pub mod logging;
pub mod metrics;
pub mod aggregate;
pub mod plan;
pub mod progress;
pub mod store;
pub mod export;
pub mod tracker;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use tables::get_default_tables;
pub use config::Config;
pub use aggregate::aggregate;
pub use plan::generate_plan;
pub use progress::analyze;
pub use store::{JsonFileStore, MemoryStore, Store};
pub use export::export_summaries;
pub use tracker::{EntryDetails, Tracker};
