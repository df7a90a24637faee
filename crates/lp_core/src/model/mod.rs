pub mod constraint;
pub mod linear_form;
pub mod objective;
pub mod problem;
pub mod term;
pub mod variable;

pub use constraint::{Constraint, Sign};
pub use linear_form::LinearForm;
pub use objective::LpType;
pub use problem::Model;
pub use term::Term;
pub use variable::Variable;
