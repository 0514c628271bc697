//! Statistics engine.
//!
//! - descriptive summaries per country and metric (`describe`)
//! - Pearson correlation matrices (`correlation`)
//! - one-way ANOVA with F-distribution p-values (`anova`)
//! - correlation/ANOVA plans over merged daily tables (`daily`)

pub mod anova;
pub mod correlation;
pub mod daily;
pub mod describe;

pub use anova::*;
pub use correlation::*;
pub use daily::*;
pub use describe::*;
