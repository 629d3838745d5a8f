//! Core data types and screening logic for the low-cap radar.

pub mod asset;
pub mod filter;
pub mod ranker;
pub mod thresholds;

pub use asset::*;
pub use filter::*;
pub use ranker::*;
pub use thresholds::*;
