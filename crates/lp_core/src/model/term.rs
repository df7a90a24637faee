//! A [`Variable`] identity bundled with an [`ExactScalar`] coefficient.

use std::fmt;

use crate::model::variable::Variable;
use crate::scalar::ExactScalar;

#[derive(Debug, Clone, PartialEq)]
pub struct Term {
    pub variable: Variable,
    pub coefficient: ExactScalar,
}

impl Term {
    pub fn new(variable: Variable, coefficient: ExactScalar) -> Self {
        Self { variable, coefficient }
    }

    pub fn flipped(&self) -> Term {
        Term { variable: self.variable.clone(), coefficient: -&self.coefficient }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.coefficient, self.variable)
    }
}
