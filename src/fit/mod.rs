//! Regression fitting.
//!
//! Responsibilities:
//!
//! - least-squares polynomial fits of a fixed degree (`polyfit`)
//! - rolling-mean smoothing for plots (`smoothing`)
//! - per-country trend fits over daily tables (`trend`)

pub mod polyfit;
pub mod smoothing;
pub mod trend;

pub use polyfit::*;
pub use smoothing::*;
pub use trend::*;
