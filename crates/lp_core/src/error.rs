//! Error taxonomy (spec §7), mirrored from the teacher's split between a
//! crate-wide [`OptimizationError`] wrapper (`optimization/error.rs`) and a
//! domain-specific error enum (`optimization/linear/error.rs`).

use thiserror::Error;

/// Kinds recovered locally and surfaced only as `status` / `integer_status`
/// fields on [`crate::trace::Solution`] — never propagated as an `Err` once
/// the model reaches [`crate::solve::solve`], except [`CoreError::UnsupportedOp`]
/// and [`CoreError::Validation`], which are programmer errors upstream of the
/// solve loop.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A product or quotient would require `M * M`, or a division by a
    /// scalar whose `m != 0`. This can only be triggered by a bug in the
    /// engine itself (canonicalization never produces such a pairing), so
    /// it propagates rather than being folded into a `Solution` status.
    #[error("unsupported scalar operation: {0}")]
    UnsupportedOp(String),

    /// The `Model` handed to the core violates a structural precondition
    /// the canonicalizer or solver requires (e.g. an empty objective, a
    /// constraint referencing no variables). Analogous to the teacher's
    /// `OptimizationError::ValidationError`.
    #[error("invalid model: {0}")]
    Validation(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
