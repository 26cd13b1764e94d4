//! Construction-time errors, per §9 "Open Question — duplicate variable
//! keys" and the error-handling design notes in `SPEC_FULL.md` §10.2.
//!
//! The solve algorithm itself never raises: every terminal outcome is a
//! [`crate::Status`] value. The only place a real `Result` is warranted is
//! the tableau builder, which can be handed a malformed raw coefficient
//! row before it ever reaches the keyed `Model` layer.

use thiserror::Error;

/// Errors raised while turning a [`crate::Model`] into a tableau.
///
/// These are not part of the documented `Solution.status` contract (§7) —
/// they signal a caller bug in the raw input, not a property of the LP/MILP
/// itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelBuildError {
    #[error("variable {variable:?} has {found} coefficients, expected {expected}")]
    CoefficientLengthMismatch {
        variable: String,
        expected: usize,
        found: usize,
    },
}
