//! Input/output helpers.
//!
//! - CSV ingest + row-level validation (`ingest`)
//! - column profiling of raw exports (`inspect`)
//! - analysis results as JSON (`export`)

pub mod export;
pub mod ingest;
pub mod inspect;

pub use export::*;
pub use ingest::*;
pub use inspect::*;
