use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lp")]
#[command(about = "Exact-arithmetic simplex / Gomory cutting-plane solver CLI", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose (step-by-step) logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Solve a model read from a text file.
    Run {
        /// Path to the model source file.
        #[arg(required = true)]
        file: PathBuf,

        /// Print the full pivot/cut trace as JSON instead of just the solution.
        #[arg(long)]
        trace: bool,
    },

    /// Solver build and limits information.
    Info,
}
