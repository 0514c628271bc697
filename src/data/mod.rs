//! Row-level data preparation: validation/date parsing and metric derivation.

pub mod clean;
pub mod metrics;

pub use clean::*;
pub use metrics::*;
