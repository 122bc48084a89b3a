use std::path::PathBuf;

use clap::Parser;

/// Minimal host that drives one scripted customer errand.
#[derive(Parser, Debug)]
#[command(
    about = "Scenario host that runs a customer errand tick by tick",
    version
)]
pub struct Args {
    /// Path to a JSON errand configuration (bundled defaults when omitted)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Scripted scenario to run: served, timeout, or abort
    #[arg(long, default_value = "served", value_name = "SLUG")]
    pub scenario: String,

    /// Seed for the random destination pick
    #[arg(long, default_value_t = 0)]
    pub seed: u64,

    /// Path to write the per-tick state trace as JSON
    #[arg(long)]
    pub trace_log_json: Option<PathBuf>,

    /// Path to write the scheduler event log as JSON
    #[arg(long)]
    pub event_log_json: Option<PathBuf>,

    /// Safety cap on scheduler ticks before the run gives up
    #[arg(long, default_value_t = 36_000)]
    pub max_ticks: u32,
}
