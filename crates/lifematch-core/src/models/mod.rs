//! Domain models for the LifeMatch engine.

pub mod dates;
mod documents;
mod donor;
mod matching;
mod organ;
mod patient;
mod status;

pub use documents::*;
pub use donor::*;
pub use matching::*;
pub use organ::*;
pub use patient::*;
pub use status::*;
