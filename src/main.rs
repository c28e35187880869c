use anyhow::Result;
use clap::Parser;
use piggybank::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
