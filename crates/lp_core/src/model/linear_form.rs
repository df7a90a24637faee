//! Ordered list of [`Term`]s over distinct variable identities (spec §3, §4.2).
//! Insertion order is preserved for deterministic rendering and stable
//! column indexing — the whole tableau's column order is simply the
//! objective's `LinearForm` term order.

use std::fmt;

use num_rational::BigRational;
use num_traits::Zero;

use crate::model::term::Term;
use crate::model::variable::Variable;
use crate::scalar::ExactScalar;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LinearForm {
    terms: Vec<Term>,
}

impl LinearForm {
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    pub fn from_terms(terms: Vec<Term>) -> Self {
        Self { terms }
    }

    pub fn terms(&self) -> &[Term] {
        &self.terms
    }

    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.terms.iter().map(|t| &t.variable)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Coefficient for `v`, or `None` ("absent" in spec terms) if `v` does
    /// not appear in this form.
    pub fn get(&self, v: &Variable) -> Option<&ExactScalar> {
        self.terms.iter().find(|t| &t.variable == v).map(|t| &t.coefficient)
    }

    /// `get`, but absent reads as zero — used wherever spec.md says a
    /// missing identity "contributes zero" (evaluation, basis search, zero
    /// padding checks).
    pub fn get_or_zero(&self, v: &Variable) -> ExactScalar {
        self.get(v).cloned().unwrap_or_else(ExactScalar::zero)
    }

    /// Inserts or overwrites the coefficient for `v`.
    pub fn set(&mut self, v: Variable, coefficient: ExactScalar) {
        if let Some(term) = self.terms.iter_mut().find(|t| t.variable == v) {
            term.coefficient = coefficient;
        } else {
            self.insert_ordered(Term::new(v, coefficient));
        }
    }

    /// Removes `v` entirely (used when an artificial variable leaves the
    /// basis — spec §4.5's pivot-update rule).
    pub fn remove(&mut self, v: &Variable) {
        self.terms.retain(|t| &t.variable != v);
    }

    /// Adds a single term: if its identity is already present, the
    /// coefficient is incremented; otherwise the term is inserted keeping
    /// ascending `index` within each `name` group (spec §4.2).
    pub fn add_term(&mut self, term: Term) {
        if let Some(existing) = self.terms.iter_mut().find(|t| t.variable == term.variable) {
            existing.coefficient = &existing.coefficient + &term.coefficient;
        } else {
            self.insert_ordered(term);
        }
    }

    fn insert_ordered(&mut self, term: Term) {
        let pos = self
            .terms
            .iter()
            .position(|t| t.variable.name == term.variable.name && t.variable.index > term.variable.index);
        match pos {
            Some(i) => self.terms.insert(i, term),
            None => self.terms.push(term),
        }
    }

    /// Coefficient-wise join: identities missing from either side are
    /// treated as zero, and the result carries every identity seen in
    /// either form, in this form's order followed by any new ones from
    /// `other`.
    pub fn add(&self, other: &LinearForm) -> LinearForm {
        let mut result = self.clone();
        for term in &other.terms {
            result.add_term(term.clone());
        }
        result
    }

    pub fn scalar_mul(&self, factor: &BigRational) -> LinearForm {
        LinearForm {
            terms: self
                .terms
                .iter()
                .map(|t| Term::new(t.variable.clone(), &t.coefficient * factor))
                .collect(),
        }
    }

    /// Sums `coefficient * assignment[variable]` over every term; a
    /// variable missing from `assignment` contributes zero.
    pub fn evaluate(&self, assignment: &std::collections::HashMap<Variable, BigRational>) -> BigRational {
        let mut sum = BigRational::zero();
        for term in &self.terms {
            let coef = term
                .coefficient
                .as_rational()
                .expect("evaluate is only defined for plain-rational coefficients");
            let val = assignment.get(&term.variable).cloned().unwrap_or_else(BigRational::zero);
            sum += coef * val;
        }
        sum
    }
}

impl fmt::Display for LinearForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.terms.is_empty() {
            return write!(f, "0");
        }
        let rendered: Vec<String> = self.terms.iter().map(|t| t.to_string()).collect();
        write!(f, "{}", rendered.join(" + "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(i: u32) -> Variable {
        Variable::new("x", i)
    }

    fn s(n: i64) -> ExactScalar {
        ExactScalar::from_i64(n)
    }

    #[test]
    fn set_then_get_roundtrips() {
        let mut form = LinearForm::new();
        form.set(v(1), s(3));
        assert_eq!(form.get(&v(1)), Some(&s(3)));
        assert_eq!(form.get(&v(2)), None);
    }

    #[test]
    fn add_term_increments_existing() {
        let mut form = LinearForm::new();
        form.add_term(Term::new(v(1), s(2)));
        form.add_term(Term::new(v(1), s(5)));
        assert_eq!(form.get(&v(1)), Some(&s(7)));
        assert_eq!(form.len(), 1);
    }

    #[test]
    fn insertion_keeps_ascending_index_within_name() {
        let mut form = LinearForm::new();
        form.add_term(Term::new(v(3), s(1)));
        form.add_term(Term::new(v(1), s(1)));
        form.add_term(Term::new(v(2), s(1)));
        let indices: Vec<u32> = form.variables().map(|v| v.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn evaluate_treats_missing_as_zero() {
        let mut form = LinearForm::new();
        form.set(v(1), s(2));
        form.set(v(2), s(3));
        let mut assignment = std::collections::HashMap::new();
        assignment.insert(v(1), BigRational::from_integer(5.into()));
        // v(2) is intentionally missing from the assignment.
        assert_eq!(form.evaluate(&assignment), BigRational::from_integer(10.into()));
    }

    #[test]
    fn remove_drops_identity() {
        let mut form = LinearForm::new();
        form.set(v(1), s(1));
        form.remove(&v(1));
        assert_eq!(form.get(&v(1)), None);
    }
}
