//! End-to-end scenario checks against the tracked job pair.
//!
//! Two entry points:
//! - [`ScenarioRunner::run`] resolves today's marker and asserts the tracked
//!   catalog and product jobs finished with assets, then downloads them.
//! - [`ScenarioRunner::watch`] uploads a fresh seed and long-polls the status
//!   API within a fixed budget before running the same checks.

mod poll;
mod runner;
mod types;

pub use poll::poll_until;
pub use runner::ScenarioRunner;
pub use types::{ScenarioReport, StageReport};
