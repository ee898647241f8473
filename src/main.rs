use anyhow::Result;
use clap::Parser;

use beacon::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
