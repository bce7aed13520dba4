//! CLI entry point for the dungeon room placement engine

use clap::Parser;
use roomlattice::io::cli::{Cli, Runner};

fn main() -> roomlattice::Result<()> {
    let cli = Cli::parse();
    let mut runner = Runner::new(cli);
    runner.install_logger()?;
    runner.run()?;
    Ok(())
}
