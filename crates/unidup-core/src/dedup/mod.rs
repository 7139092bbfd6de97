//! Duplicate-asset reconciliation engine
//!
//! Groups binary-identical assets by their latest-version fingerprint,
//! picks one canonical survivor per group, rewrites every gallery
//! reference to point at it, and reclaims the unreferenced duplicates.

mod canonical;
mod engine;
mod groups;
mod reclaim;
mod rewrite;

pub use engine::{run, RunRequest, RunSummary};
pub use groups::resolve_target;
pub use reclaim::ReclaimOutcome;
pub use rewrite::Rewriter;
