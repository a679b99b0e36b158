//! Daily setup / poll state machine.
//!
//! Runs once per day from an external scheduler and advances the tracked job
//! pair by at most one step per invocation:
//! - **No marker**: upload the seed file, pick the first listed catalog job, write the marker
//! - **Catalog ingesting**: nothing to do until the next invocation
//! - **Catalog complete**: look up the derived product job and report its progress
//! - **Any failure**: the invocation fails and the marker is left untouched

mod runner;
mod types;

pub use runner::{CompletionCallback, DailySetup};
pub use types::SetupOutcome;
