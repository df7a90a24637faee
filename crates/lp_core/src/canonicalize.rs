//! Slack/surplus, artificial variables, starting basis (spec §4.4),
//! grounded in the teacher's `optimization/linear/transformers/standard_form.rs`
//! generalized from a fixed "one slack per row" dense-matrix build to the
//! mixed `<=`/`=`/`>=` + Big-M construction spec.md requires.

use crate::model::constraint::Sign;
use crate::model::objective::LpType;
use crate::model::term::Term;
use crate::model::variable::Variable;
use crate::model::{Constraint, Model};
use crate::scalar::ExactScalar;

/// Runs the five-step canonicalization algorithm in place. Idempotent: a
/// model that is already canonical (every row an equality, already has a
/// unit-column basic variable, already zero-padded) passes through with no
/// new variables introduced, since the slack/surplus pass only touches
/// `<=`/`>=` rows and the basis search finds the existing basis immediately.
pub fn canonicalize(model: &mut Model) {
    slack_and_surplus_pass(model);
    let mut basis = find_basis_candidates(model);
    artificial_pass(model, &mut basis);
    // Re-run basis search over the augmented tableau (spec §4.4 step 4):
    // every artificial-carrying row now trivially satisfies the unit-column
    // criterion, so this just confirms/refreshes the map built above.
    let refreshed = find_basis_candidates(model);
    for (i, slot) in basis.iter_mut().enumerate() {
        if slot.is_none() {
            *slot = refreshed[i].clone();
        }
    }
    model.basis = basis
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.unwrap_or_else(|| panic!("row {i} has no basic variable after canonicalization")))
        .collect();
    zero_pad(model);
}

fn slack_and_surplus_pass(model: &mut Model) {
    let name = model.variable_name().to_string();
    for i in 0..model.constraints.len() {
        let sign = model.constraints[i].sign;
        let coefficient = match sign {
            Sign::Equal => continue,
            Sign::LessOrEqual => ExactScalar::one(),
            Sign::GreaterOrEqual => -ExactScalar::one(),
        };
        let idx = model.next_variable_index();
        let slack = Variable::new(&name, idx);

        model.constraints[i].left.set(slack.clone(), coefficient);
        model.constraints[i].sign = Sign::Equal;

        model.target.set(slack.clone(), ExactScalar::zero());

        model.variable_constraints.push(nonnegativity(&slack));
    }
}

fn artificial_pass(model: &mut Model, basis: &mut [Option<Variable>]) {
    if basis.iter().all(|b| b.is_some()) {
        return;
    }
    let name = model.variable_name().to_string();
    let big_m_sign = match model.lp_type {
        LpType::Min => ExactScalar::from_big_m(num_rational::BigRational::from_integer(1.into())),
        LpType::Max => ExactScalar::from_big_m(num_rational::BigRational::from_integer((-1).into())),
    };

    for i in 0..model.constraints.len() {
        if basis[i].is_some() {
            continue;
        }
        let idx = model.next_variable_index();
        let artificial = Variable::new(&name, idx);

        model.constraints[i].left.set(artificial.clone(), ExactScalar::one());
        model.target.set(artificial.clone(), big_m_sign.clone());
        model.variable_constraints.push(nonnegativity(&artificial));
        basis[i] = Some(artificial);
    }
}

fn zero_pad(model: &mut Model) {
    let all_vars: Vec<Variable> = model.target.variables().cloned().collect();
    for constraint in model.constraints.iter_mut() {
        for v in &all_vars {
            if constraint.left.get(v).is_none() {
                constraint.left.set(v.clone(), ExactScalar::zero());
            }
        }
    }
}

/// Row `i`'s candidate is a variable whose coefficient in row `i` is
/// exactly 1 and whose coefficient in every other row is 0 (absent counts
/// as 0). The first candidate found scanning rows in order, terms in
/// insertion order, wins.
fn find_basis_candidates(model: &Model) -> Vec<Option<Variable>> {
    let rows = &model.constraints;
    let mut result = vec![None; rows.len()];
    for i in 0..rows.len() {
        for term in rows[i].left.terms() {
            if term.coefficient != ExactScalar::one() {
                continue;
            }
            let is_unit_elsewhere = (0..rows.len())
                .filter(|&j| j != i)
                .all(|j| rows[j].left.get_or_zero(&term.variable).is_zero());
            if is_unit_elsewhere {
                result[i] = Some(term.variable.clone());
                break;
            }
        }
    }
    result
}

fn nonnegativity(v: &Variable) -> Constraint {
    let mut left = crate::model::LinearForm::new();
    left.add_term(Term::new(v.clone(), ExactScalar::one()));
    Constraint::new(left, Sign::GreaterOrEqual, ExactScalar::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LinearForm, LpType};

    fn var(i: u32) -> Variable {
        Variable::new("x", i)
    }

    fn row(terms: &[(u32, i64)], sign: Sign, rhs: i64) -> Constraint {
        let mut left = LinearForm::new();
        for (idx, coeff) in terms {
            left.add_term(Term::new(var(*idx), ExactScalar::from_i64(*coeff)));
        }
        Constraint::new(left, sign, ExactScalar::from_i64(rhs))
    }

    fn objective(terms: &[(u32, i64)]) -> LinearForm {
        let mut f = LinearForm::new();
        for (idx, coeff) in terms {
            f.add_term(Term::new(var(*idx), ExactScalar::from_i64(*coeff)));
        }
        f
    }

    #[test]
    fn le_constraints_get_slack_basis_no_artificial() {
        let target = objective(&[(1, 3), (2, 2)]);
        let constraints = vec![
            row(&[(1, 2), (2, 1)], Sign::LessOrEqual, 100),
            row(&[(1, 1), (2, 1)], Sign::LessOrEqual, 80),
        ];
        let mut model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        canonicalize(&mut model);

        assert!(model.constraints.iter().all(|c| c.sign == Sign::Equal));
        assert_eq!(model.basis.len(), 2);
        // Slacks are basic; no artificial (Big-M) objective coefficients appear.
        for v in model.target.variables() {
            assert!(model.target.get(v).unwrap().is_plain_rational());
        }
    }

    #[test]
    fn equality_row_needs_artificial_with_big_m() {
        // A single `x1+x2=100` row would let `find_basis_candidates` pick
        // `x1` directly: with only one row, the "zero in every other row"
        // check ranges over nothing and is vacuously true. Use two equality
        // rows where neither variable is a unit column in the other row, so
        // no natural basis exists anywhere and both rows must fall through
        // to the artificial pass.
        let target = objective(&[(1, 1), (2, 1)]);
        let constraints = vec![
            row(&[(1, 1), (2, 1)], Sign::Equal, 100),
            row(&[(1, 1), (2, 2)], Sign::Equal, 150),
        ];
        let mut model = Model::new(LpType::Min, target, constraints, vec![], vec![]);
        canonicalize(&mut model);

        assert_eq!(model.basis.len(), 2);
        for basic in &model.basis {
            let coeff = model.target.get(basic).unwrap();
            assert!(!coeff.is_plain_rational(), "artificial variable should carry an M penalty");
        }
    }

    #[test]
    fn zero_padding_makes_tableau_rectangular() {
        let target = objective(&[(1, 1), (2, 1)]);
        let constraints = vec![
            row(&[(1, 1)], Sign::LessOrEqual, 10),
            row(&[(2, 1)], Sign::LessOrEqual, 10),
        ];
        let mut model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        canonicalize(&mut model);

        let width = model.target.len();
        for c in &model.constraints {
            assert_eq!(c.left.len(), width);
        }
    }

    #[test]
    fn canonicalizing_a_canonical_model_is_a_no_op() {
        let target = objective(&[(1, 1), (2, 1)]);
        let constraints = vec![
            row(&[(1, 2), (2, 1)], Sign::LessOrEqual, 100),
            row(&[(1, 1), (2, 1)], Sign::LessOrEqual, 80),
        ];
        let mut model = Model::new(LpType::Max, target, constraints, vec![], vec![]);
        canonicalize(&mut model);
        let before = model.clone();
        canonicalize(&mut model);
        assert_eq!(before.target, model.target);
        assert_eq!(before.constraints.len(), model.constraints.len());
        assert_eq!(before.basis, model.basis);
    }
}
