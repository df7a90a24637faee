use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use colored::*;

use lp_core::{solve, SolverLimits, Status};
use lp_parser::parse_model;

pub fn execute(path: &PathBuf, verbose: bool, trace: bool) -> Result<()> {
    if verbose {
        println!(">> reading model: {:?}", path);
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("could not read model file '{}'", path.display()))?;

    let start = Instant::now();
    let model = parse_model(&content).with_context(|| "failed to parse model")?;
    if verbose {
        println!(">> parse time: {:?}", start.elapsed());
    }

    let limits = SolverLimits::default();
    let solve_start = Instant::now();
    let solution = solve(model, &limits).with_context(|| "failed to solve model")?;
    if verbose {
        println!(">> solve time: {:?}", solve_start.elapsed());
        println!(">> pivots + cuts recorded: {}", solution.tables.len());
    }

    if trace {
        let rendered = serde_json::to_string_pretty(&solution)?;
        println!("{rendered}");
        return Ok(());
    }

    let status_line = match solution.status {
        Status::Optimal => format!("status: {}", "OPTIMAL".green().bold()),
        Status::Infeasible => format!("status: {}", "INFEASIBLE".red().bold()),
        Status::Unbounded => format!("status: {}", "UNBOUNDED".red().bold()),
        Status::Unsolved => format!("status: {}", "UNSOLVED".yellow().bold()),
    };
    println!("{status_line}");
    println!("integer status: {:?}", solution.integer_status);
    if let Some(value) = &solution.function_value {
        println!("objective value: {value}");
    }
    for (name, value) in &solution.x_values {
        println!("  {name} = {value}");
    }

    Ok(())
}
