//! `LinearForm sign rhs` triple (spec §3, §4.3), grounded in the teacher's
//! `optimization/linear/model/constraint.rs` and the original source's
//! `constraint.py` (deep-copy semantics, sign flip on negative scaling).

use std::collections::HashMap;
use std::fmt;

use num_rational::BigRational;
use num_traits::Signed;

use crate::model::linear_form::LinearForm;
use crate::model::variable::Variable;
use crate::scalar::ExactScalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sign {
    LessOrEqual,
    Equal,
    GreaterOrEqual,
}

impl Sign {
    pub fn flipped(self) -> Sign {
        match self {
            Sign::LessOrEqual => Sign::GreaterOrEqual,
            Sign::GreaterOrEqual => Sign::LessOrEqual,
            Sign::Equal => Sign::Equal,
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sign::LessOrEqual => "<=",
            Sign::Equal => "=",
            Sign::GreaterOrEqual => ">=",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub left: LinearForm,
    pub sign: Sign,
    pub right: ExactScalar,
}

impl Constraint {
    pub fn new(left: LinearForm, sign: Sign, right: ExactScalar) -> Self {
        Self { left, sign, right }
    }

    /// Evaluates `left` against `assignment` and compares it to `right`
    /// under `sign`.
    pub fn is_satisfied_by(&self, assignment: &HashMap<Variable, BigRational>) -> bool {
        let value = self.left.evaluate(assignment);
        let right = self
            .right
            .as_rational()
            .expect("constraint right-hand sides are always plain rationals");
        match self.sign {
            Sign::LessOrEqual => value <= *right,
            Sign::GreaterOrEqual => value >= *right,
            Sign::Equal => value == *right,
        }
    }

    /// Scalar multiplication distributes over `left` and `right`; a
    /// negative scalar flips the sign (`=` is unaffected).
    pub fn scalar_mul(&self, factor: &BigRational) -> Constraint {
        Constraint {
            left: self.left.scalar_mul(factor),
            sign: if factor.is_negative() { self.sign.flipped() } else { self.sign },
            right: &self.right * factor,
        }
    }

    pub fn scalar_div(&self, divisor: &BigRational) -> Constraint {
        self.scalar_mul(&divisor.recip())
    }

    /// Coefficient-wise join of `left`, scalar add on `right`. Used by the
    /// pivot update to subtract a multiple of the pivot row from every
    /// other row.
    pub fn add(&self, other: &Constraint) -> Constraint {
        Constraint {
            left: self.left.add(&other.left),
            sign: self.sign,
            right: &self.right + &other.right,
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.sign, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::term::Term;
    use crate::model::variable::Variable;

    fn r(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    #[test]
    fn flipped_is_involution() {
        for s in [Sign::LessOrEqual, Sign::Equal, Sign::GreaterOrEqual] {
            assert_eq!(s.flipped().flipped(), s);
        }
    }

    #[test]
    fn negative_scalar_flips_inequality() {
        let mut left = LinearForm::new();
        left.add_term(Term::new(Variable::new("x", 1), ExactScalar::from_i64(2)));
        let c = Constraint::new(left, Sign::LessOrEqual, ExactScalar::from_i64(4));
        let scaled = c.scalar_mul(&r(-1));
        assert_eq!(scaled.sign, Sign::GreaterOrEqual);
        assert_eq!(scaled.right, ExactScalar::from_i64(-4));
    }

    #[test]
    fn equal_sign_survives_negative_scale() {
        let left = LinearForm::new();
        let c = Constraint::new(left, Sign::Equal, ExactScalar::from_i64(4));
        assert_eq!(c.scalar_mul(&r(-1)).sign, Sign::Equal);
    }

    #[test]
    fn is_satisfied_by_checks_sign() {
        let mut left = LinearForm::new();
        left.add_term(Term::new(Variable::new("x", 1), ExactScalar::from_i64(1)));
        let c = Constraint::new(left, Sign::LessOrEqual, ExactScalar::from_i64(10));
        let mut assignment = HashMap::new();
        assignment.insert(Variable::new("x", 1), r(5));
        assert!(c.is_satisfied_by(&assignment));
        assignment.insert(Variable::new("x", 1), r(20));
        assert!(!c.is_satisfied_by(&assignment));
    }
}
