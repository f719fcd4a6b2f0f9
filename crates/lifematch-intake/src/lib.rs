//! Record intake and advisor tooling for LifeMatch.
//!
//! This crate loads donor and patient rosters from registry exports, parses
//! best-match recommendations produced by a language-model advisor, builds
//! the prompts sent to it, and turns rosters into match reports.

pub mod analysis;
pub mod error;
pub mod prompts;
pub mod records;
pub mod report;

pub use analysis::*;
pub use error::*;
pub use prompts::*;
pub use records::*;
pub use report::*;
