//! Parses spec §6's plain-text linear/integer program grammar into an
//! [`lp_core::model::Model`], the one "external collaborator" spec.md
//! names but places out of `lp_core`'s own scope.

pub mod ast;
pub mod error;
pub mod parser;

pub use error::{ParseError, ParseResult};
pub use parser::{parse, parse_model};
