//! Two-phase tableau simplex and best-first branch-and-cut solver for
//! small-to-medium LP/MILP problems (up to a few thousand variables and
//! constraints, a few hundred integer variables).
//!
//! Mirrors `achronyme-solver`'s re-export pattern
//! (`pub use linear::simplex::solve as simplex_solve; ...`): each component
//! module (§4.A–F) stays addressable on its own, and [`solve`] is the single
//! public entry point most callers need.

pub mod branch_and_cut;
pub mod builder;
pub mod error;
pub mod model;
pub mod options;
pub mod pivot;
pub mod simplex;
pub mod solution;
pub mod tableau;

pub use error::ModelBuildError;
pub use model::{ConstraintBound, Coefficients, Direction, Keyed, Model, VariableSet};
pub use options::SolveOptions;
pub use solution::{Solution, Status};
pub use tableau::Tableau;

/// Solves `model` with `options` (or the defaults, per §6, if `None`).
///
/// Builds the initial tableau (component B), runs the two-phase simplex
/// (component D), and — only when the LP relaxation is optimal and at
/// least one variable is integer- or binary-marked — hands off to
/// branch-and-cut (component E) before reading back the solution
/// (component F). Never panics or raises on a well-formed `Model`; every
/// terminal condition is reported through `Solution::status` (§7).
#[tracing::instrument(level = "debug", skip(model, options))]
pub fn solve(model: &model::Model, options: Option<SolveOptions>) -> Solution {
    let options = options.unwrap_or_default();
    let build = builder::build(model);
    let mut tableau = build.tableau;

    let (lp_status, lp_result) = simplex::solve_lp(&mut tableau, &options);

    if lp_status != simplex::Status::Optimal || build.integer_columns.is_empty() {
        let status = match lp_status {
            simplex::Status::Optimal => Status::Optimal,
            simplex::Status::Infeasible => Status::Infeasible,
            simplex::Status::Unbounded => Status::Unbounded,
            simplex::Status::Cycled => Status::Cycled,
        };
        let unbounded_column = match lp_status {
            simplex::Status::Unbounded => Some(lp_result as usize),
            _ => None,
        };
        return solution::extract(
            &tableau,
            build.sign,
            &build.variables,
            status,
            lp_result,
            unbounded_column,
            &options,
        );
    }

    let outcome = branch_and_cut::solve(&tableau, lp_result, &build.integer_columns, &options);
    let (status, result, final_tableau) = match outcome.status {
        branch_and_cut::MilpStatus::Optimal => (Status::Optimal, outcome.result, outcome.tableau),
        branch_and_cut::MilpStatus::Timedout => (Status::Timedout, outcome.result, outcome.tableau),
        branch_and_cut::MilpStatus::Infeasible => (Status::Infeasible, f64::NAN, None),
    };

    match final_tableau {
        Some(t) => solution::extract(&t, build.sign, &build.variables, status, result, None, &options),
        None => solution::extract(&tableau, build.sign, &build.variables, status, f64::NAN, None, &options),
    }
}
