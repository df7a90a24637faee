//! Per-pivot tableau snapshots and the final solve result (spec §4.7),
//! grounded in the teacher's `optimization/linear/error.rs` (`Solution`,
//! `OptimizationStatus`) generalized to exact arithmetic and a richer
//! status taxonomy.

use std::collections::HashMap;

use num_rational::BigRational;
use serde::{Serialize, Serializer};

use crate::model::Variable;
use crate::scalar::{render_rational, ExactScalar};

/// Primal status of the tableau (spec §4.5's state machine).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Status {
    Unsolved,
    Optimal,
    Infeasible,
    Unbounded,
}

/// Whether the solution, once primal-optimal, also satisfies every
/// declared integrality requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IntegerStatus {
    /// No integer variables were declared, or cuts are still pending.
    NotApplicable,
    Unsolved,
    Optimal,
    Infeasible,
    /// Gomory row selection found no eligible row despite a fractional
    /// basic value remaining (spec §7's `DegenerateCut`).
    Degenerate,
}

/// One row of the tableau at a point in time, keyed by column variable.
#[derive(Debug, Clone, Serialize)]
pub struct TableauRow {
    pub basic_variable: Variable,
    pub rhs: ExactScalar,
    pub coefficients: Vec<(Variable, ExactScalar)>,
}

/// A full tableau snapshot, emitted after canonicalization, after every
/// primal pivot, after every Gomory cut insertion, and after every dual
/// pivot (spec §4.7).
#[derive(Debug, Clone, Serialize)]
pub struct TableauSnapshot {
    pub objective_row: Vec<(Variable, ExactScalar)>,
    pub columns: Vec<Variable>,
    pub rows: Vec<TableauRow>,
    pub deltas: Vec<(Variable, ExactScalar)>,
    /// Present only while a Gomory dual re-optimization is in progress.
    pub dual_ratios: Option<Vec<(Variable, ExactScalar)>>,
    pub objective_value: ExactScalar,
    pub entering_column: Option<Variable>,
    pub leaving_row: Option<usize>,
    pub pivot: Option<ExactScalar>,
}

impl TableauSnapshot {
    pub fn objective_value_as_rational(&self) -> Option<&BigRational> {
        self.objective_value.as_rational()
    }
}

/// The final result (spec §6's "Solver output").
#[derive(Debug, Clone, Serialize)]
pub struct Solution {
    pub status: Status,
    pub integer_status: IntegerStatus,
    #[serde(serialize_with = "serialize_rational_map")]
    pub x_values: HashMap<String, BigRational>,
    #[serde(serialize_with = "serialize_rational_opt")]
    pub function_value: Option<BigRational>,
    pub tables: Vec<TableauSnapshot>,
}

impl Solution {
    pub fn variable_value(&self, v: &Variable) -> Option<&BigRational> {
        self.x_values.get(&v.to_string())
    }

    /// Spec §6's named accessor: the full per-pivot tableau trace, in
    /// emission order. `tables` stays a public field for direct/serde
    /// access; this is the explicitly-named `snapshots()` entry point
    /// alongside `solve(Model) -> Result`.
    pub fn snapshots(&self) -> &[TableauSnapshot] {
        &self.tables
    }
}

fn serialize_rational_map<S>(map: &HashMap<String, BigRational>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    use serde::ser::SerializeMap;
    let mut out = serializer.serialize_map(Some(map.len()))?;
    for (k, v) in map {
        out.serialize_entry(k, &render_rational(v))?;
    }
    out.end()
}

fn serialize_rational_opt<S>(value: &Option<BigRational>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(r) => serializer.serialize_some(&render_rational(r)),
        None => serializer.serialize_none(),
    }
}
