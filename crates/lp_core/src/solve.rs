//! Top-level entry point (spec §1's pipeline: "parsed Model → Canonicalizer
//! → SimplexEngine → GomoryCutEngine (if declared integers) → Result"),
//! grounded in the teacher's `optimization/mod.rs::solve` dispatcher that
//! wires a parsed domain problem through its transformer and algorithm.

use std::collections::HashMap;

use crate::canonicalize::canonicalize;
use crate::error::{CoreError, CoreResult};
use crate::gomory::run_cuts;
use crate::model::Model;
use crate::simplex::{self, run_primal, SolverLimits};
use crate::trace::{IntegerStatus, Solution, Status};

/// Canonicalizes `model`, runs the primal Big-M simplex to optimality (or
/// to `Infeasible`/`Unbounded`), and — only if the caller declared any
/// `positive_integer_variables` and the LP relaxation came back `Optimal`
/// — drives Gomory cuts to integer feasibility. Returns `Err` only for
/// [`CoreError::Validation`] preconditions; everything else is folded into
/// the returned [`Solution`]'s `status`/`integer_status`.
pub fn solve(mut model: Model, limits: &SolverLimits) -> CoreResult<Solution> {
    if model.initial_target.is_empty() {
        return Err(CoreError::Validation("objective has no terms".into()));
    }
    if model.initial_constraints.is_empty() {
        return Err(CoreError::Validation("model has no constraints".into()));
    }

    canonicalize(&mut model);
    let initial_deltas = simplex::compute_deltas(&model);
    model.trace.push(simplex::snapshot(&model, &initial_deltas, None, None, None, None));

    let status = run_primal(&mut model, limits);

    let integer_status = if status != Status::Optimal {
        IntegerStatus::NotApplicable
    } else if model.positive_integer_variables.is_empty() {
        IntegerStatus::NotApplicable
    } else {
        run_cuts(&mut model, limits)
    };

    let assignment = simplex::current_assignment(&model);
    let x_values: HashMap<String, num_rational::BigRational> = model
        .initial_target
        .variables()
        .map(|v| (v.to_string(), assignment.get(v).cloned().unwrap_or_else(num_rational::BigRational::zero)))
        .collect();

    let function_value = match status {
        Status::Optimal => simplex::objective_value(&model).as_rational().cloned(),
        _ => None,
    };

    Ok(Solution { status, integer_status, x_values, function_value, tables: model.trace })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Constraint, LinearForm, LpType, Sign, Term, Variable};
    use crate::scalar::ExactScalar;
    use num_rational::BigRational;
    use num_traits::Zero;

    fn var(i: u32) -> Variable {
        Variable::new("x", i)
    }

    fn lform(terms: &[(u32, i64)]) -> LinearForm {
        let mut f = LinearForm::new();
        for (i, c) in terms {
            f.add_term(Term::new(var(*i), ExactScalar::from_i64(*c)));
        }
        f
    }

    #[test]
    fn rejects_empty_objective() {
        let model = Model::new(LpType::Max, LinearForm::new(), vec![], vec![], vec![]);
        assert!(solve(model, &SolverLimits::default()).is_err());
    }

    #[test]
    fn simple_product_mix_reports_optimal_with_function_value() {
        let target = lform(&[(1, 3), (2, 2)]);
        let constraints = vec![
            Constraint::new(lform(&[(1, 2), (2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(100)),
            Constraint::new(lform(&[(1, 1), (2, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(80)),
        ];
        let model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        let solution = solve(model, &SolverLimits::default()).unwrap();
        assert_eq!(solution.status, Status::Optimal);
        assert_eq!(solution.integer_status, IntegerStatus::NotApplicable);
        assert_eq!(solution.function_value, Some(BigRational::from_integer(180.into())));
        assert!(!solution.tables.is_empty());
    }

    #[test]
    fn infeasible_pair_of_constraints_is_reported() {
        // x1 <= 2 and x1 >= 5 can never both hold.
        let target = lform(&[(1, 1)]);
        let constraints = vec![
            Constraint::new(lform(&[(1, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(2)),
            Constraint::new(lform(&[(1, 1)]), Sign::GreaterOrEqual, ExactScalar::from_i64(5)),
        ];
        let model = Model::new(LpType::Min, target, constraints, vec![], vec![]);
        let solution = solve(model, &SolverLimits::default()).unwrap();
        assert_eq!(solution.status, Status::Infeasible);
        assert_eq!(solution.function_value, None);
    }

    #[test]
    fn fractional_coefficients_are_carried_exactly() {
        // Max x1/600 s.t. x1 <= 1800 -> x1 = 1800, value = 3.
        let mut target = LinearForm::new();
        target.add_term(Term::new(var(1), ExactScalar::rational(BigRational::new(1.into(), 600.into()))));
        let constraints = vec![Constraint::new(lform(&[(1, 1)]), Sign::LessOrEqual, ExactScalar::from_i64(1800))];
        let model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        let solution = solve(model, &SolverLimits::default()).unwrap();
        assert_eq!(solution.status, Status::Optimal);
        assert_eq!(solution.function_value, Some(BigRational::from_integer(3.into())));
        assert_eq!(solution.variable_value(&var(1)), Some(&BigRational::from_integer(1800.into())));
    }
}
