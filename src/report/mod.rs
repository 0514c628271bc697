//! Plain-text reports for the terminal.

pub mod format;

pub use format::*;
