//! State module for tracking crawl progress
//!
//! This module provides the state kept for the lifetime of one crawl run.
//!
//! # Components
//!
//! - `NavState`: Where the browser session is in the list/detail cycle
//! - `RunContext`: Page and record counters plus the optional record cap
//! - `DedupStore`: Identity keys of every record accepted so far

mod dedup;
mod nav_state;
mod run_context;

// Re-export main types
pub use dedup::DedupStore;
pub use nav_state::NavState;
pub use run_context::RunContext;
