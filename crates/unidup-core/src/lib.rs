//! Core reconciliation engine for unidup
//!
//! Everything destructive lives behind [`dedup::run`], which consumes a
//! confirmed [`dedup::RunRequest`] and a [`progress::ProgressSink`] and
//! returns a [`dedup::RunSummary`]. The CLI crate is plumbing around it.

pub mod asset;
pub mod config;
pub mod db;
pub mod dedup;
pub mod error;
pub mod logging;
pub mod progress;
pub mod record;
pub mod schema;
pub mod store;
