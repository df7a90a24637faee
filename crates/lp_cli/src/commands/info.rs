use anyhow::Result;
use colored::*;

use lp_core::SolverLimits;

pub fn execute() -> Result<()> {
    let limits = SolverLimits::default();
    println!("{}", "lp-solve CLI".green().bold());
    println!("Engine:  exact Big-M simplex + Gomory cutting planes (lp_core)");
    println!("Limits:  max_pivots={}, max_cuts={}", limits.max_pivots, limits.max_cuts);
    println!("Grammar: {}", "MIN|MAX Z = ... / constraints / sign+integrality tail".cyan());
    Ok(())
}
