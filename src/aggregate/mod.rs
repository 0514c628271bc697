//! Daily aggregation across countries.
//!
//! - per-date grouping and reduction (`daily`)
//! - first-seen categorical codes for country/date (`encode`)

pub mod daily;
pub mod encode;

pub use daily::*;
pub use encode::*;
