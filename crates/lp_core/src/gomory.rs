//! Gomory fractional cutting-plane method (spec §4.6), grounded in the
//! teacher's `optimization/integer/algorithms/branch_bound.rs` generalized
//! from branch-and-bound's node splitting to cutting-plane row selection,
//! cut construction, and dual re-optimization — spec.md is explicit that
//! integer feasibility here comes from cuts, never branching.
//!
//! `original_source/model.py` has no cutting-plane logic at all (only
//! plain Big-M simplex), so this module follows spec.md's description
//! directly rather than a retrieved reference implementation.

use num_rational::BigRational;
use num_traits::{Signed, Zero};

use crate::model::constraint::Sign;
use crate::model::term::Term;
use crate::model::variable::Variable;
use crate::model::{Constraint, LinearForm, Model};
use crate::scalar::ExactScalar;
use crate::simplex::{self, SolverLimits};
use crate::trace::IntegerStatus;

fn nonnegativity(v: &Variable) -> Constraint {
    let mut left = LinearForm::new();
    left.add_term(Term::new(v.clone(), ExactScalar::one()));
    Constraint::new(left, Sign::GreaterOrEqual, ExactScalar::zero())
}

/// Row with the largest fractional rhs among rows whose basic variable is
/// an original decision variable. Rows already integer (the
/// `row_selection_fraction` sentinel) and anti-cycling-excluded rows
/// (zero rhs with a Gomory-slack basic variable, which would just
/// regenerate the same degenerate cut) are skipped entirely. Ties keep
/// the lowest row index.
pub fn select_cut_row(model: &Model) -> Option<usize> {
    let mut best: Option<(usize, BigRational)> = None;
    for i in 0..model.constraints.len() {
        let basis_var = &model.basis[i];
        if !model.is_decision_variable(basis_var) {
            continue;
        }
        let rhs = &model.constraints[i].right;
        if rhs.is_zero() && model.gomory_variables.contains(basis_var) {
            continue;
        }
        let frac = rhs.row_selection_fraction();
        if frac == BigRational::one() {
            continue;
        }
        let better = match &best {
            None => true,
            Some((_, b)) => frac > *b,
        };
        if better {
            best = Some((i, frac));
        }
    }
    best.map(|(i, _)| i)
}

/// Builds the cut row for `row` and appends it to the model: rhs is
/// `-frac(rhs_r)`, every non-basic-row variable gets `-frac(A[r,v])`, and
/// a fresh slack `g_k` with coefficient `+1` closes it to an equality
/// (spec §4.6). The row's own basic variable is excluded entirely — its
/// fractional part is by definition zero, since it's exactly 1 in its own
/// row. Returns the index of the new constraint, which is also the new
/// row's basic variable (it is basic in no other row and has coefficient
/// 1 here).
pub fn insert_cut(model: &mut Model) -> Option<usize> {
    let row = select_cut_row(model)?;
    let basis_var = model.basis[row].clone();
    let rhs = model.constraints[row].right.clone();
    let rhs_rational = rhs.as_rational().expect("constraint right-hand sides are plain rationals").clone();
    let floor_rhs = BigRational::from_integer(rhs.floor());
    let frac_rhs = &rhs_rational - &floor_rhs;

    let mut left = LinearForm::new();
    for term in model.constraints[row].left.terms() {
        if term.variable == basis_var {
            continue;
        }
        let a = term.coefficient.as_rational().expect("constraint coefficients are plain rationals").clone();
        let floor_a = BigRational::from_integer(term.coefficient.floor());
        let frac_a = &a - &floor_a;
        if frac_a.is_zero() {
            continue;
        }
        left.add_term(Term::new(term.variable.clone(), ExactScalar::rational(-&frac_a)));
    }

    let name = model.variable_name().to_string();
    let slack_idx = model.next_variable_index();
    let slack = Variable::new(&name, slack_idx);
    left.add_term(Term::new(slack.clone(), ExactScalar::one()));

    model.target.set(slack.clone(), ExactScalar::zero());
    model.variable_constraints.push(nonnegativity(&slack));
    model.gomory_variables.push(slack.clone());

    let all_vars: Vec<Variable> = model.target.variables().cloned().collect();
    for v in &all_vars {
        if left.get(v).is_none() {
            left.set(v.clone(), ExactScalar::zero());
        }
    }
    for c in model.constraints.iter_mut() {
        if c.left.get(&slack).is_none() {
            c.left.set(slack.clone(), ExactScalar::zero());
        }
    }

    let constraint = Constraint::new(left, Sign::Equal, ExactScalar::rational(-&frac_rhs));
    model.constraints.push(constraint);
    model.basis.push(slack);
    Some(model.constraints.len() - 1)
}

/// Most negative rhs across every row; `None` once the tableau is
/// primal-feasible again.
fn select_dual_leaving_row(model: &Model) -> Option<usize> {
    let mut best: Option<(usize, BigRational)> = None;
    for i in 0..model.constraints.len() {
        let rhs = model.constraints[i].right.as_rational().expect("rhs values are plain rationals").clone();
        if rhs >= BigRational::zero() {
            continue;
        }
        let better = match &best {
            None => true,
            Some((_, b)) => rhs < *b,
        };
        if better {
            best = Some((i, rhs));
        }
    }
    best.map(|(i, _)| i)
}

/// `Δ_j / A[row,j]` for every column with `A[row,j] < 0`, in objective
/// column order. Columns with a non-negative coefficient in the leaving
/// row are not dual-eligible and are omitted.
fn dual_ratios(model: &Model, row: usize, deltas: &[(Variable, ExactScalar)]) -> Vec<(Variable, ExactScalar)> {
    model
        .target
        .terms()
        .iter()
        .filter_map(|t| {
            let v = &t.variable;
            let a_rj = model.constraints[row].left.get_or_zero(v);
            let a_rj = a_rj.as_rational().expect("constraint coefficients are plain rationals").clone();
            if !a_rj.is_negative() {
                return None;
            }
            let delta = deltas.iter().find(|(dv, _)| dv == v).map(|(_, d)| d.clone()).unwrap_or_else(ExactScalar::zero);
            let ratio = delta
                .checked_div(&ExactScalar::rational(a_rj))
                .expect("a_rj is a nonzero plain rational");
            Some((v.clone(), ratio))
        })
        .collect()
}

/// Largest ratio under MAX, smallest under MIN; ties keep the lowest
/// column index (the order `dual_ratios` already preserves).
fn select_dual_entering(
    lp_type: crate::model::LpType,
    ratios: &[(Variable, ExactScalar)],
) -> Option<Variable> {
    let mut best: Option<&ExactScalar> = None;
    let mut best_idx = 0;
    for (i, (_, r)) in ratios.iter().enumerate() {
        let better = match best {
            None => true,
            Some(b) => match lp_type {
                crate::model::LpType::Max => r > b,
                crate::model::LpType::Min => r < b,
            },
        };
        if better {
            best = Some(r);
            best_idx = i;
        }
    }
    best.map(|_| ratios[best_idx].0.clone())
}

fn is_integer_feasible(model: &Model) -> bool {
    let assignment = simplex::current_assignment(model);
    model.positive_integer_variables.iter().all(|v| {
        let value = assignment.get(v).cloned().unwrap_or_else(BigRational::zero);
        value.is_integer()
    })
}

/// Drives cut insertion and dual re-optimization to an integer-feasible
/// (or proven infeasible/degenerate) conclusion, capped at
/// `limits.max_cuts` cuts as an anti-cycling backstop (spec §9's Open
/// Question on infinite cutting is resolved here by reporting `Unsolved`
/// once the cap is hit, mirroring `run_primal`'s pivot cap). The inner
/// dual re-optimization following each cut is itself capped at
/// `limits.max_dual_pivots`: its entering/leaving selection is Dantzig's
/// rule with lowest-index tie-break exactly as spec §4.6 describes, which
/// does not provably prevent cycling on degenerate rows, so it gets the
/// same `Unsolved` escape hatch as the primal loop rather than running
/// forever.
pub fn run_cuts(model: &mut Model, limits: &SolverLimits) -> IntegerStatus {
    if model.positive_integer_variables.is_empty() {
        return IntegerStatus::NotApplicable;
    }

    let mut cuts = 0;
    loop {
        if is_integer_feasible(model) {
            return IntegerStatus::Optimal;
        }
        if cuts >= limits.max_cuts {
            return IntegerStatus::Unsolved;
        }
        if select_cut_row(model).is_none() {
            return IntegerStatus::Degenerate;
        }
        insert_cut(model);
        cuts += 1;
        let deltas = simplex::compute_deltas(model);
        model.trace.push(simplex::snapshot(model, &deltas, None, None, None, None));

        let mut dual_pivots = 0;
        loop {
            let deltas = simplex::compute_deltas(model);
            let leaving_row = match select_dual_leaving_row(model) {
                Some(r) => r,
                None => break,
            };
            if dual_pivots >= limits.max_dual_pivots {
                return IntegerStatus::Unsolved;
            }
            dual_pivots += 1;
            let ratios = dual_ratios(model, leaving_row, &deltas);
            let entering = match select_dual_entering(model.lp_type, &ratios) {
                Some(v) => v,
                None => return IntegerStatus::Infeasible,
            };
            let pivot_value = simplex::pivot(model, leaving_row, entering.clone());
            model.trace.push(simplex::snapshot(
                model,
                &deltas,
                Some(ratios),
                Some(entering),
                Some(leaving_row),
                Some(pivot_value),
            ));
        }
    }
}
