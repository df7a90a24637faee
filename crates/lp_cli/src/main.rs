mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() -> Result<()> {
    let args = Cli::parse();

    match &args.command {
        Commands::Info => commands::info::execute()?,
        Commands::Run { file, trace } => commands::run::execute(file, args.verbose, *trace)?,
    }

    Ok(())
}
