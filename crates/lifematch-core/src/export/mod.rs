//! Export of match reports.

mod report;

pub use report::*;
