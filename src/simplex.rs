//! Two-phase revised tableau simplex (component D, §4.D).
//!
//! Grounded on `achronyme-solver/src/linear/two_phase.rs` for the
//! two-phase *shape* — the module name, the doc comment distinguishing
//! "phase 1 drives to feasibility" from "phase 2 drives to optimality",
//! and an iteration-capped loop repeatedly picking an entering/leaving
//! pair and pivoting. The teacher's phase 1 adds artificial variables and
//! minimizes their sum; this crate's tableau already encodes two-sided
//! bounds as signed rows with a possibly-negative RHS (§3), so phase 1
//! here is the artificial-variable-free feasibility recovery of §4.D:
//! repeatedly pivot the most-negative-RHS row against its best ratio
//! column until every RHS is non-negative.

use crate::options::SolveOptions;
use crate::pivot::{pivot, CycleDetector};
use crate::tableau::Tableau;

/// Terminal outcome of a simplex run, mirroring §4.D / §7.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Optimal,
    Infeasible,
    /// Payload: the 1-based column whose entering made the problem
    /// unbounded.
    Unbounded,
    Cycled,
}

/// `round(x, p) = round((x + eps) * round(1/p)) / round(1/p)`, per §4.D.
/// Used only on the reported objective and on readback values, never
/// during pivots.
pub fn round_to_precision(x: f64, precision: f64) -> f64 {
    let scale = (1.0 / precision).round();
    ((x + f64::EPSILON) * scale).round() / scale
}

/// Phase 1: drives every constraint row's RHS to `>= -precision`.
///
/// Loop, up to `options.max_pivots` times:
/// 1. pick the row with the most negative RHS; none found -> feasible.
/// 2. in that row, pick the column maximizing `(-M[0,c]) / M[r,c]` among
///    columns where `M[r,c] < -precision`; none -> infeasible.
/// 3. optional cycle check.
/// 4. pivot.
#[tracing::instrument(level = "trace", skip(tableau, detector))]
pub fn phase1(
    tableau: &mut Tableau,
    options: &SolveOptions,
    detector: &mut Option<CycleDetector>,
) -> Status {
    for pivot_count in 0..options.max_pivots {
        let mut leaving_row = None;
        let mut most_negative = -options.precision;
        for r in 1..tableau.height {
            let rhs = tableau.get(r, 0);
            if rhs < most_negative {
                most_negative = rhs;
                leaving_row = Some(r);
            }
        }
        let r = match leaving_row {
            Some(r) => r,
            None => {
                tracing::debug!(pivots = pivot_count, "phase1 reached feasibility");
                return Status::Optimal;
            }
        };

        let mut entering_col = None;
        let mut best_ratio = f64::NEG_INFINITY;
        for c in 1..tableau.width {
            let mc = tableau.get(r, c);
            if mc < -options.precision {
                let ratio = (-tableau.get(0, c)) / mc;
                if ratio > best_ratio {
                    best_ratio = ratio;
                    entering_col = Some(c);
                }
            }
        }
        let c = match entering_col {
            Some(c) => c,
            None => {
                tracing::debug!(pivots = pivot_count, row = r, "phase1 found no entering column, infeasible");
                return Status::Infeasible;
            }
        };

        if let Some(cd) = detector {
            let leaving_var = tableau.variable_at_position[tableau.width + r];
            let entering_var = tableau.variable_at_position[c];
            if cd.record_and_check(leaving_var, entering_var) {
                tracing::debug!(pivots = pivot_count, "phase1 detected a pivot cycle");
                return Status::Cycled;
            }
        }

        tracing::trace!(pivots = pivot_count, row = r, col = c, "phase1 pivot");
        pivot(tableau, r, c);
    }
    tracing::debug!(max_pivots = options.max_pivots, "phase1 exhausted its pivot budget");
    Status::Cycled
}

/// Phase 2: Dantzig's rule maximization.
///
/// Loop, up to `options.max_pivots` times:
/// 1. pick the entering column with most positive reduced cost; none ->
///    optimal.
/// 2. pick the leaving row by smallest positive ratio `RHS / M[r,c]`,
///    with an early exit on a degenerate zero-ratio row.
/// 3. optional cycle check.
/// 4. pivot.
#[tracing::instrument(level = "trace", skip(tableau, detector))]
pub fn phase2(
    tableau: &mut Tableau,
    options: &SolveOptions,
    detector: &mut Option<CycleDetector>,
) -> (Status, f64) {
    for pivot_count in 0..options.max_pivots {
        let mut entering_col = None;
        let mut best_cost = options.precision;
        for c in 1..tableau.width {
            let cost = tableau.get(0, c);
            if cost > best_cost {
                best_cost = cost;
                entering_col = Some(c);
            }
        }
        let c = match entering_col {
            Some(c) => c,
            None => {
                let result = round_to_precision(tableau.get(0, 0), options.precision);
                tracing::debug!(pivots = pivot_count, objective = result, "phase2 reached optimum");
                return (Status::Optimal, result);
            }
        };

        let mut leaving_row = None;
        let mut best_ratio = f64::INFINITY;
        for r in 1..tableau.height {
            let mc = tableau.get(r, c);
            if mc > options.precision {
                let rhs = tableau.get(r, 0);
                let ratio = rhs / mc;
                if rhs <= options.precision {
                    leaving_row = Some(r);
                    break;
                }
                if ratio < best_ratio {
                    best_ratio = ratio;
                    leaving_row = Some(r);
                }
            }
        }
        let r = match leaving_row {
            Some(r) => r,
            None => {
                tracing::debug!(pivots = pivot_count, col = c, "phase2 found no leaving row, unbounded");
                return (Status::Unbounded, c as f64);
            }
        };

        if let Some(cd) = detector {
            let leaving_var = tableau.variable_at_position[tableau.width + r];
            let entering_var = tableau.variable_at_position[c];
            if cd.record_and_check(leaving_var, entering_var) {
                tracing::debug!(pivots = pivot_count, "phase2 detected a pivot cycle");
                return (Status::Cycled, f64::NAN);
            }
        }

        tracing::trace!(pivots = pivot_count, row = r, col = c, "phase2 pivot");
        pivot(tableau, r, c);
    }
    tracing::debug!(max_pivots = options.max_pivots, "phase2 exhausted its pivot budget");
    (Status::Cycled, f64::NAN)
}

/// Runs phase 1 then (on success) phase 2, sharing one cycle detector
/// across both phases. Returns `(status, result)` per §4.D.
pub fn solve_lp(tableau: &mut Tableau, options: &SolveOptions) -> (Status, f64) {
    let mut detector = if options.check_cycles {
        Some(CycleDetector::new())
    } else {
        None
    };

    match phase1(tableau, options, &mut detector) {
        Status::Optimal => {}
        status => return (status, f64::NAN),
    }

    phase2(tableau, options, &mut detector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::model::{ConstraintBound, Direction, Keyed, Model, VariableSet};

    fn furniture_model() -> Model {
        Model {
            direction: Direction::Maximize,
            objective: Some("profit".to_string()),
            constraints: Keyed::List(vec![
                ("wood".to_string(), ConstraintBound::max(300.0)),
                ("labor".to_string(), ConstraintBound::max(110.0)),
                ("storage".to_string(), ConstraintBound::max(400.0)),
            ]),
            variables: Keyed::List(vec![
                (
                    "table".to_string(),
                    Keyed::List(vec![
                        ("wood".to_string(), 30.0),
                        ("labor".to_string(), 5.0),
                        ("profit".to_string(), 1200.0),
                        ("storage".to_string(), 30.0),
                    ]),
                ),
                (
                    "dresser".to_string(),
                    Keyed::List(vec![
                        ("wood".to_string(), 20.0),
                        ("labor".to_string(), 10.0),
                        ("profit".to_string(), 1600.0),
                        ("storage".to_string(), 50.0),
                    ]),
                ),
            ]),
            integers: VariableSet::None,
            binaries: VariableSet::None,
        }
    }

    #[test]
    fn lp_relaxation_is_optimal_and_feasible() {
        let model = furniture_model();
        let build_out = build(&model);
        let mut tableau = build_out.tableau;
        let options = SolveOptions::default();
        let (status, result) = solve_lp(&mut tableau, &options);
        assert_eq!(status, Status::Optimal);
        // LP relaxation bound is >= the integer optimum of 14400.
        assert!(result >= 14400.0 - 1e-6);
    }

    #[test]
    fn infeasible_bounds_report_infeasible() {
        let model = Model {
            direction: Direction::Maximize,
            objective: Some("c".to_string()),
            constraints: Keyed::List(vec![("c".to_string(), ConstraintBound::range(10.0, 5.0))]),
            variables: Keyed::List(vec![(
                "x".to_string(),
                Keyed::List(vec![("c".to_string(), 1.0)]),
            )]),
            integers: VariableSet::None,
            binaries: VariableSet::None,
        };
        let mut tableau = build(&model).tableau;
        let (status, result) = solve_lp(&mut tableau, &SolveOptions::default());
        assert_eq!(status, Status::Infeasible);
        assert!(result.is_nan());
    }

    #[test]
    fn unbounded_objective_reports_unbounded_with_column() {
        let model = Model {
            direction: Direction::Maximize,
            objective: Some("obj".to_string()),
            constraints: Keyed::List(vec![]),
            variables: Keyed::List(vec![(
                "x".to_string(),
                Keyed::List(vec![("obj".to_string(), 1.0)]),
            )]),
            integers: VariableSet::None,
            binaries: VariableSet::None,
        };
        let mut tableau = build(&model).tableau;
        let (status, result) = solve_lp(&mut tableau, &SolveOptions::default());
        assert_eq!(status, Status::Unbounded);
        assert_eq!(result, 1.0);
    }

    #[test]
    fn empty_model_is_trivially_optimal_at_zero() {
        let model = Model::new();
        let mut tableau = build(&model).tableau;
        let (status, result) = solve_lp(&mut tableau, &SolveOptions::default());
        assert_eq!(status, Status::Optimal);
        assert_eq!(result, 0.0);
    }

    #[test]
    fn round_to_precision_snaps_near_values() {
        assert_eq!(round_to_precision(0.1 + 0.2, 1e-8), 0.3);
    }
}
