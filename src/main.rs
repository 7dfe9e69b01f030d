//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `edge_harvest` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Exit status
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use std::process;

use edge_harvest::initialization::init_logger_with;
use edge_harvest::{run_harvest, Config};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // .env in the current directory first, then next to the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    match run_harvest(config).await {
        Ok(report) => {
            println!(
                "✅ Wrote {} record{} to {} in {:.1}s",
                report.written,
                if report.written == 1 { "" } else { "s" },
                report.output.display(),
                report.elapsed_seconds
            );
            Ok(())
        }
        Err(e) => {
            eprintln!("edge_harvest error: {:#}", e);
            process::exit(1);
        }
    }
}
