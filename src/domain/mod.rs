//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - dataset labels and column enums (`CountryCode`, `Metric`, `Reducer`)
//! - raw, cleaned and derived video rows (`RawVideoRow`, `CleanVideo`, `TrendingVideo`)
//! - the resolved run configuration (`AnalysisConfig`)

pub mod types;

pub use types::*;
