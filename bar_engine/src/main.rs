use anyhow::Result;
use clap::Parser;

mod cli;
mod scenario;

fn main() -> Result<()> {
    let args = cli::Args::parse();
    scenario::execute(args)
}
