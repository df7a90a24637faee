//! The one error kind this crate can produce: spec §7's `ParseError`, an
//! "external" failure (malformed caller input) as opposed to `lp_core`'s
//! `UnsupportedOp`/`Validation`, which are programmer errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed input: {0}")]
    Grammar(#[from] Box<pest::error::Error<crate::parser::Rule>>),

    #[error("program has no objective line")]
    MissingObjective,

    #[error("unknown variable list range: {0}")]
    InvalidRange(String),
}

pub type ParseResult<T> = Result<T, ParseError>;
