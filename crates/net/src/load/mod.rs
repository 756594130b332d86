//! Single-request resource loading
//!
//! One optionally byte-ranged GET, raced against an explicit deadline and a
//! shared cancellation token, with streamed progress reporting and a small
//! failure taxonomy delivered through per-load callbacks.

mod callbacks;
mod classify;
mod config;
mod core;
mod decode;
mod params;
mod pump;
mod watchdog;

pub use callbacks::LoadCallbacks;
pub use classify::{FailureKind, LoadFailure};
pub use config::LoadConfig;
pub use core::{LoadOutcome, Loader, ResponseSummary};
pub use params::TransportParams;
