//! Intermediate representation between the grammar and [`lp_core::model::Model`],
//! mirroring the teacher's `domains::optimization::ast::OptimizationModel`
//! shape (a direction, an objective, and a constraint list) generalized to
//! carry exact rational coefficients and the trailing sign/integrality
//! clause spec §6 adds.

use num_rational::BigRational;

use lp_core::model::Sign;

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTerm {
    pub variable_name: String,
    pub variable_index: u32,
    pub coefficient: BigRational,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedExpr {
    pub terms: Vec<ParsedTerm>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedSense {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParsedConstraint {
    pub left: ParsedExpr,
    pub sign: Sign,
    pub right: BigRational,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedProgram {
    pub sense: Option<ParsedSense>,
    pub objective: ParsedExpr,
    pub constraints: Vec<ParsedConstraint>,
    /// Sign restrictions declared on the trailing line (e.g. `x2 >= 10`).
    pub sign_restrictions: Vec<ParsedConstraint>,
    /// Variables the trailing line declared non-negative integers.
    pub integer_variables: Vec<(String, u32)>,
}
