//! edge_harvest library: scrapes candidate edge addresses into a flat list
//!
//! A run fetches each configured source, extracts `address[:port]`
//! candidates from HTML tables, CSV feeds or free text, validates them,
//! tags each with a country code and writes a deduplicated,
//! latency-ordered `ADDRESS:PORT#LABEL-CC` file.
//!
//! # Example
//!
//! ```no_run
//! use edge_harvest::{run_harvest, Config};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     csv_sources: vec!["https://example.com/ips.csv".to_string()],
//!     preferred_regions: vec!["US".to_string()],
//!     max_output: 20,
//!     ..Default::default()
//! };
//!
//! let report = run_harvest(config).await?;
//! println!("Wrote {} records to {}", report.written, report.output.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! Library functions must be called within a Tokio runtime. The pipeline
//! awaits every external call sequentially, so a current-thread runtime is
//! enough.

mod app;
pub mod config;
pub mod error_handling;
pub mod extract;
mod fetch;
pub mod geoip;
pub mod initialization;
pub mod models;
pub mod output;
mod run;
pub mod selection;
mod utils;
pub mod validate;

pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{HarvestError, HarvestStats};
pub use fetch::validate_source_url;
pub use run::{run_harvest, HarvestReport};
