//! Reduced costs, ratio test, pivot, and the primal state machine
//! (spec §4.5), grounded in the teacher's
//! `optimization/linear/algorithms/simplex.rs` (`select_entering_variable`,
//! `select_leaving_variable`, `SimplexTableau::pivot`) generalized from a
//! dense-`f64`-matrix Dantzig rule to exact Big-M pricing over
//! `LinearForm` rows.

use std::collections::HashMap;

use num_rational::BigRational;
use num_traits::Zero;

use crate::model::{LpType, Model, Variable};
use crate::scalar::ExactScalar;
use crate::trace::{Status, TableauRow, TableauSnapshot};

/// Iteration caps, the one tunable the teacher hardcodes
/// (`simplex.rs::MAX_ITERATIONS`, `branch_bound.rs::max_nodes`) and spec
/// §9 calls out as a required anti-cycling safeguard for the Gomory loop.
#[derive(Debug, Clone, Copy)]
pub struct SolverLimits {
    pub max_pivots: usize,
    pub max_cuts: usize,
    /// Caps the dual re-optimization pivots driven by a single cut
    /// insertion (`gomory::run_cuts`'s inner loop). Dantzig's rule with
    /// lowest-index tie-break, as specified, does not rule out cycling on
    /// degenerate rows the way full Bland's rule would, so this loop needs
    /// its own bound distinct from `max_pivots`/`max_cuts`.
    pub max_dual_pivots: usize,
}

impl Default for SolverLimits {
    fn default() -> Self {
        Self { max_pivots: 10_000, max_cuts: 500, max_dual_pivots: 10_000 }
    }
}

/// `Δ_j = Σ_i (A[i,j] · c_basis(i)) − c_j` for every column in the
/// objective's term order.
pub fn compute_deltas(model: &Model) -> Vec<(Variable, ExactScalar)> {
    model
        .target
        .terms()
        .iter()
        .map(|term| {
            let v = &term.variable;
            let mut sum = ExactScalar::zero();
            for (i, constraint) in model.constraints.iter().enumerate() {
                let a_ij = constraint.left.get_or_zero(v);
                if a_ij.is_zero() {
                    continue;
                }
                let c_basis = model.target.get_or_zero(&model.basis[i]);
                sum = &sum + &(&a_ij * &c_basis);
            }
            let delta = &sum - &term.coefficient;
            (v.clone(), delta)
        })
        .collect()
}

pub fn is_optimal(lp_type: LpType, deltas: &[(Variable, ExactScalar)]) -> bool {
    match lp_type {
        LpType::Max => deltas.iter().all(|(_, d)| *d >= ExactScalar::zero()),
        LpType::Min => deltas.iter().all(|(_, d)| *d <= ExactScalar::zero()),
    }
}

/// Smallest `Δ` under MAX, largest under MIN; ties keep the lowest column
/// index because we only replace the running winner on a strict
/// improvement.
pub fn select_entering_column(lp_type: LpType, deltas: &[(Variable, ExactScalar)]) -> Option<Variable> {
    let mut best: Option<&ExactScalar> = None;
    let mut best_idx = 0;
    for (i, (_, d)) in deltas.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) => match lp_type {
                LpType::Max => d < b,
                LpType::Min => d > b,
            },
        };
        if better {
            best = Some(d);
            best_idx = i;
        }
    }
    best.map(|_| deltas[best_idx].0.clone())
}

/// Smallest strictly-positive ratio; ties keep the lowest row index.
pub fn select_leaving_row(model: &Model, entering: &Variable) -> Option<usize> {
    let mut best: Option<(usize, BigRational)> = None;
    for i in 0..model.constraints.len() {
        let xr = model.constraints[i].left.get_or_zero(entering);
        let xr = xr.as_rational().expect("constraint coefficients are plain rationals").clone();
        if xr.is_zero() {
            continue;
        }
        let xb = model.constraints[i]
            .right
            .as_rational()
            .expect("constraint right-hand sides are plain rationals")
            .clone();
        let ratio = &xb / &xr;
        if ratio <= BigRational::zero() {
            continue;
        }
        let better = match &best {
            None => true,
            Some((_, b)) => ratio < *b,
        };
        if better {
            best = Some((i, ratio));
        }
    }
    best.map(|(i, _)| i)
}

/// Divides the pivot row by the pivot element, subtracts the appropriate
/// multiple from every other row, updates the basis, and — if the
/// departing basic variable was artificial — strikes it from the
/// objective and every row (spec §4.5's closing rule). Returns the pivot
/// element for the trace.
pub fn pivot(model: &mut Model, row: usize, entering: Variable) -> ExactScalar {
    let p = model.constraints[row]
        .left
        .get(&entering)
        .cloned()
        .expect("pivot column must have a coefficient in the pivot row");
    let p_rational = p.as_rational().expect("pivot elements are plain rationals").clone();

    model.constraints[row] = model.constraints[row].scalar_div(&p_rational);
    let pivot_row = model.constraints[row].clone();

    for i in 0..model.constraints.len() {
        if i == row {
            continue;
        }
        let factor = model.constraints[i].left.get_or_zero(&entering);
        if factor.is_zero() {
            continue;
        }
        let factor_rational = factor.as_rational().expect("row coefficients are plain rationals").clone();
        let scaled = pivot_row.scalar_mul(&(-&factor_rational));
        model.constraints[i] = model.constraints[i].add(&scaled);
    }

    let leaving = model.basis[row].clone();
    model.basis[row] = entering;

    if let Some(coef) = model.target.get(&leaving) {
        if !coef.is_plain_rational() {
            model.target.remove(&leaving);
            for c in model.constraints.iter_mut() {
                c.left.remove(&leaving);
            }
        }
    }

    p
}

/// The candidate assignment at the current basis: each basic variable
/// takes its row's rhs, every other variable (including removed
/// artificials) is implicitly zero via `LinearForm::evaluate`'s "missing
/// means zero" rule.
pub fn current_assignment(model: &Model) -> HashMap<Variable, BigRational> {
    let mut assignment = HashMap::new();
    for (i, v) in model.basis.iter().enumerate() {
        let rhs = model.constraints[i]
            .right
            .as_rational()
            .expect("constraint right-hand sides are plain rationals")
            .clone();
        assignment.insert(v.clone(), rhs);
    }
    assignment
}

/// Checks the candidate solution against every original constraint and
/// every variable sign restriction (spec §4.5's "feasibility verification
/// at optimum" — this is what catches Big-M failing to drive an
/// artificial out of the basis).
pub fn verify_feasible(model: &Model) -> bool {
    let assignment = current_assignment(model);
    model.initial_constraints.iter().all(|c| c.is_satisfied_by(&assignment))
        && model.variable_constraints.iter().all(|c| c.is_satisfied_by(&assignment))
}

pub fn objective_value(model: &Model) -> ExactScalar {
    let mut total = ExactScalar::zero();
    for (i, v) in model.basis.iter().enumerate() {
        let c = model.target.get_or_zero(v);
        let rhs = &model.constraints[i].right;
        total = &total + &(&c * rhs);
    }
    total
}

pub fn snapshot(
    model: &Model,
    deltas: &[(Variable, ExactScalar)],
    dual_ratios: Option<Vec<(Variable, ExactScalar)>>,
    entering_column: Option<Variable>,
    leaving_row: Option<usize>,
    pivot_value: Option<ExactScalar>,
) -> TableauSnapshot {
    let columns: Vec<Variable> = model.target.variables().cloned().collect();
    let rows = model
        .constraints
        .iter()
        .enumerate()
        .map(|(i, c)| TableauRow {
            basic_variable: model.basis[i].clone(),
            rhs: c.right.clone(),
            coefficients: c.left.terms().iter().map(|t| (t.variable.clone(), t.coefficient.clone())).collect(),
        })
        .collect();
    TableauSnapshot {
        objective_row: model.target.terms().iter().map(|t| (t.variable.clone(), t.coefficient.clone())).collect(),
        columns,
        rows,
        deltas: deltas.to_vec(),
        dual_ratios,
        objective_value: objective_value(model),
        entering_column,
        leaving_row,
        pivot: pivot_value,
    }
}

/// Runs primal pivots until optimal, infeasible, unbounded, or the pivot
/// cap is hit (in which case the tableau is reported `Unsolved`, per
/// spec's "assertion that the tableau is unsolved pending more pivots").
/// Pushes one trace snapshot per pivot.
pub fn run_primal(model: &mut Model, limits: &SolverLimits) -> Status {
    let mut iterations = 0;
    loop {
        let deltas = compute_deltas(model);
        if is_optimal(model.lp_type, &deltas) {
            return if verify_feasible(model) { Status::Optimal } else { Status::Infeasible };
        }
        if iterations >= limits.max_pivots {
            return Status::Unsolved;
        }
        iterations += 1;

        let entering = select_entering_column(model.lp_type, &deltas)
            .expect("a non-optimal tableau always has an entering column");
        let leaving_row = match select_leaving_row(model, &entering) {
            Some(r) => r,
            None => return Status::Unbounded,
        };
        let pivot_value = pivot(model, leaving_row, entering.clone());
        model.trace.push(snapshot(model, &deltas, None, Some(entering), Some(leaving_row), Some(pivot_value)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonicalize::canonicalize;
    use crate::model::{Constraint, LinearForm, Sign, Term};

    fn var(i: u32) -> Variable {
        Variable::new("x", i)
    }

    fn term(i: u32, c: i64) -> Term {
        Term::new(var(i), ExactScalar::from_i64(c))
    }

    fn lform(terms: &[(u32, i64)]) -> LinearForm {
        let mut f = LinearForm::new();
        for (i, c) in terms {
            f.add_term(term(*i, *c));
        }
        f
    }

    #[test]
    fn product_mix_solves_to_known_vertex() {
        // Max 3x1 + 2x2 s.t. 2x1+x2<=100, x1+x2<=80, x1<=40
        let target = lform(&[(1, 3), (2, 2)]);
        let constraints = vec![
            Constraint::new(lform(&[(1, 2), (2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(100)),
            Constraint::new(lform(&[(1, 1), (2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(80)),
            Constraint::new(lform(&[(1, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(40)),
        ];
        let mut model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        canonicalize(&mut model);
        let status = run_primal(&mut model, &SolverLimits::default());
        assert_eq!(status, Status::Optimal);

        let assignment = current_assignment(&model);
        let x1 = assignment.get(&var(1)).cloned().unwrap_or_else(BigRational::zero);
        let x2 = assignment.get(&var(2)).cloned().unwrap_or_else(BigRational::zero);
        assert_eq!(x1, BigRational::from_integer(20.into()));
        assert_eq!(x2, BigRational::from_integer(60.into()));
        assert_eq!(objective_value(&model), ExactScalar::from_i64(180));
    }

    #[test]
    fn unbounded_direction_is_detected() {
        // Max x1 s.t. x2 <= 5 (x1 unconstrained above).
        let target = lform(&[(1, 1)]);
        let constraints = vec![Constraint::new(lform(&[(2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(5))];
        let mut model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        canonicalize(&mut model);
        let status = run_primal(&mut model, &SolverLimits::default());
        assert_eq!(status, Status::Unbounded);
    }

    #[test]
    fn pivot_leaves_unit_column_in_pivot_row() {
        let target = lform(&[(1, 3), (2, 2)]);
        let constraints = vec![
            Constraint::new(lform(&[(1, 2), (2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(100)),
            Constraint::new(lform(&[(1, 1), (2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(80)),
        ];
        let mut model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        canonicalize(&mut model);
        let entering = var(1);
        let row = select_leaving_row(&model, &entering).unwrap();
        pivot(&mut model, row, entering.clone());
        for (i, c) in model.constraints.iter().enumerate() {
            let coeff = c.left.get_or_zero(&entering);
            let expected = if i == row { ExactScalar::one() } else { ExactScalar::zero() };
            assert_eq!(coeff, expected);
        }
    }
}
