//! Solve-time configuration (`SolveOptions`), §6 "Options with defaults".

/// Tunables accepted by [`crate::solve`].
///
/// Every field has a default matching the option table in the external
/// interface section of the specification; construct with
/// `SolveOptions::default()` (or [`SolveOptions::new`]) and override only
/// the fields a caller cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOptions {
    /// Zero-threshold used for pivot selection, feasibility, and
    /// integrality checks.
    pub precision: f64,
    /// Enable explicit pivot-history cycle detection (§4.C).
    pub check_cycles: bool,
    /// Per-phase pivot cap; exceeding it reports [`crate::Status::Cycled`].
    pub max_pivots: u32,
    /// Relative optimality gap accepted for the branch-and-cut early exit.
    pub tolerance: f64,
    /// Wall-clock budget, in milliseconds, for branch-and-cut.
    /// `timeout <= 0.0` makes branch-and-cut exit on its first iteration.
    pub timeout: f64,
    /// Iteration cap for branch-and-cut.
    pub max_iterations: u32,
    /// Emit zero-valued variables in the returned solution.
    pub include_zero_variables: bool,
}

impl Default for SolveOptions {
    fn default() -> Self {
        SolveOptions {
            precision: 1e-8,
            check_cycles: false,
            max_pivots: 8192,
            tolerance: 0.0,
            timeout: f64::INFINITY,
            max_iterations: 32768,
            include_zero_variables: false,
        }
    }
}

impl SolveOptions {
    /// Equivalent to `SolveOptions::default()`, kept for call-site symmetry
    /// with `Model::new`-style constructors elsewhere in the crate.
    pub fn new() -> Self {
        Self::default()
    }
}
