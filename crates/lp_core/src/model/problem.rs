//! The full mutable state of one solve (spec §3's "Model state").

use crate::model::constraint::Constraint;
use crate::model::linear_form::LinearForm;
use crate::model::objective::LpType;
use crate::model::variable::Variable;
use crate::trace::TableauSnapshot;

#[derive(Debug, Clone)]
pub struct Model {
    pub lp_type: LpType,

    /// The objective exactly as the caller wrote it — never mutated after
    /// construction, kept around so feasibility can be re-checked against
    /// the original problem once Big-M claims optimality.
    pub initial_target: LinearForm,
    pub target: LinearForm,

    pub initial_constraints: Vec<Constraint>,
    pub constraints: Vec<Constraint>,

    /// Non-negativity and other sign restrictions, including the ones
    /// generated alongside every slack/artificial/Gomory-slack variable.
    pub variable_constraints: Vec<Constraint>,

    /// Variables declared "non-negative integer" by the caller.
    pub positive_integer_variables: Vec<Variable>,

    highest_variable_index: u32,

    /// One basic variable per row, indexed in lockstep with `constraints`.
    pub basis: Vec<Variable>,

    /// Slacks introduced by Gomory cuts, tracked so anti-cycling checks can
    /// recognize them (spec §4.6).
    pub gomory_variables: Vec<Variable>,

    pub trace: Vec<TableauSnapshot>,
}

impl Model {
    pub fn new(
        lp_type: LpType,
        target: LinearForm,
        constraints: Vec<Constraint>,
        variable_constraints: Vec<Constraint>,
        positive_integer_variables: Vec<Variable>,
    ) -> Self {
        let highest_variable_index = target
            .variables()
            .map(|v| v.index)
            .max()
            .unwrap_or(0);
        Self {
            lp_type,
            initial_target: target.clone(),
            target,
            initial_constraints: constraints.clone(),
            constraints,
            variable_constraints,
            positive_integer_variables,
            highest_variable_index,
            basis: Vec::new(),
            gomory_variables: Vec::new(),
            trace: Vec::new(),
        }
    }

    /// `v` is an original decision variable iff it was present in the
    /// objective as the caller wrote it (the only way to tell decision
    /// variables apart from slacks/artificials/Gomory-slacks added later,
    /// since all of them conventionally share one variable-name letter and
    /// are distinguished purely by index — see `original_source/variable.py`).
    pub fn is_decision_variable(&self, v: &Variable) -> bool {
        self.initial_target.get(v).is_some()
    }

    pub fn is_integer_declared(&self, v: &Variable) -> bool {
        self.positive_integer_variables.contains(v)
    }

    /// Allocates and returns the next never-used variable index, extending
    /// `highestVariableIndex` monotonically (spec §3).
    pub fn next_variable_index(&mut self) -> u32 {
        self.highest_variable_index += 1;
        self.highest_variable_index
    }

    pub fn highest_variable_index(&self) -> u32 {
        self.highest_variable_index
    }

    /// The variable-name letter shared by every variable in this model
    /// (spec §6's grammar: one letter, distinguished by index).
    pub fn variable_name(&self) -> &str {
        self.initial_target
            .terms()
            .first()
            .map(|t| t.variable.name.as_str())
            .unwrap_or("x")
    }
}
