//! Metapath-constrained random walk generation.

pub mod progress;
pub mod sampler;
pub mod scheme;

pub use progress::{LogProgress, NoProgress, ProgressObserver};
pub use sampler::{WalkConfig, WalkError, WalkReport, WalkSampler};
pub use scheme::{Scheme, SchemeParseError};
