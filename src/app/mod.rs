//! Run reporting helpers used by the orchestration layer.

pub mod statistics;

pub use statistics::{print_harvest_statistics, print_simple_summary};
