#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core data types for segload
//!
//! Plain data shared across the workspace: the description of one load,
//! its timing/byte statistics, the lifecycle phase, and the decoded result.
//! No I/O lives here.

pub mod context;
pub mod phase;
pub mod result;
pub mod stats;

pub use context::{ByteRange, LoadContext, ResponseType};
pub use phase::LoadPhase;
pub use result::{LoadResult, Payload};
pub use stats::LoadStats;
