//! Solution readback (component F, §4.F).
//!
//! Grounded on `achronyme-solver/src/linear/tableau.rs::
//! Tableau::extract_solution` (reads the RHS for each basic original
//! variable, 0 for non-basic ones) — extended with the sign
//! reapplication and `round_to_precision` rounding from §4.D/§4.F, which
//! the teacher's flat `Vec<f64>` solution has no equivalent of: the
//! teacher never negates for `sense` at readback because `sense` only
//! scales the objective row, not variable values; this spec additionally
//! negates `result` once to report the external objective
//! (`-sign * result`, §4.F).

use serde::{Deserialize, Serialize};

use crate::options::SolveOptions;
use crate::simplex::round_to_precision;
use crate::tableau::Tableau;

/// Terminal solver status exposed to callers (§6/§7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Optimal,
    Infeasible,
    Unbounded,
    Timedout,
    Cycled,
}

/// `solve`'s return value (§6 "Solution shape").
///
/// **Duplicate variable keys.** The model preserves duplicate variable
/// keys in insertion order (§3); this `variables` list is therefore
/// authoritative *by position*, not by key — a caller who wants a single
/// value per key must dedupe the model before calling `solve`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    pub status: Status,
    /// Finite (optimal), ±infinity (unbounded), or NaN (infeasible/cycled,
    /// or timed out with no incumbent).
    pub objective: f64,
    /// Ordered `(key, value)` pairs; a subsequence of model order, or
    /// exactly model order when `include_zero_variables` is set.
    pub variables: Vec<(String, f64)>,
}

/// Extracts a [`Solution`] from a solved tableau, per §4.F.
///
/// `status`/`result` are in the internal always-maximize convention
/// produced by [`crate::simplex::solve_lp`] or
/// [`crate::branch_and_cut::solve`]; `unbounded_column` is only consulted
/// when `status == Status::Unbounded`.
pub fn extract(
    tableau: &Tableau,
    sign: f64,
    variables: &[String],
    status: Status,
    result: f64,
    unbounded_column: Option<usize>,
    options: &SolveOptions,
) -> Solution {
    match status {
        Status::Optimal => readback(tableau, sign, variables, status, result, options),
        Status::Timedout if !result.is_nan() => readback(tableau, sign, variables, status, result, options),
        Status::Unbounded => {
            let mut vars = Vec::new();
            if let Some(col) = unbounded_column {
                if col >= 1 && col <= variables.len() {
                    vars.push((variables[col - 1].clone(), f64::INFINITY));
                }
            }
            Solution {
                status: Status::Unbounded,
                objective: sign * f64::INFINITY,
                variables: vars,
            }
        }
        other => Solution {
            status: other,
            objective: f64::NAN,
            variables: Vec::new(),
        },
    }
}

/// Reads variable values back off `tableau` and reports `status` verbatim —
/// `status` is always `Optimal` or `Timedout`-with-an-incumbent by the time
/// this is called (§4.F), never recomputed from `result`, so a timed-out
/// MILP that found an incumbent is reported as `Timedout`, not silently
/// upgraded to `Optimal`.
fn readback(
    tableau: &Tableau,
    sign: f64,
    variables: &[String],
    status: Status,
    result: f64,
    options: &SolveOptions,
) -> Solution {
    let mut out = Vec::with_capacity(variables.len());
    for (i, key) in variables.iter().enumerate() {
        let col = i + 1;
        let value = match tableau.basic_row(col) {
            Some(row) => tableau.get(row, 0),
            None => 0.0,
        };
        if value > options.precision {
            out.push((key.clone(), round_to_precision(value, options.precision)));
        } else if options.include_zero_variables {
            out.push((key.clone(), 0.0));
        }
    }
    Solution {
        status,
        objective: -sign * result,
        variables: out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::model::{ConstraintBound, Direction, Keyed, Model, VariableSet};
    use crate::simplex::solve_lp;

    #[test]
    fn furniture_shop_end_to_end() {
        let model = Model {
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
        };
        let build_out = build(&model);
        let mut tableau = build_out.tableau;
        let options = SolveOptions::default();
        let (status, result) = solve_lp(&mut tableau, &options);
        let lp_status = match status {
            crate::simplex::Status::Optimal => Status::Optimal,
            _ => Status::Infeasible,
        };
        let solution = extract(&tableau, build_out.sign, &build_out.variables, lp_status, result, None, &options);
        assert_eq!(solution.status, Status::Optimal);
        assert!((solution.objective - 14400.0).abs() < 1e-3);
    }

    #[test]
    fn zero_values_omitted_unless_requested() {
        let tableau = Tableau::new(2, 1);
        let variables = vec!["x".to_string()];
        let solution = extract(&tableau, 1.0, &variables, Status::Optimal, 0.0, None, &SolveOptions::default());
        assert!(solution.variables.is_empty());

        let mut options = SolveOptions::default();
        options.include_zero_variables = true;
        let solution = extract(&tableau, 1.0, &variables, Status::Optimal, 0.0, None, &options);
        assert_eq!(solution.variables, vec![("x".to_string(), 0.0)]);
    }

    #[test]
    fn timedout_with_incumbent_preserves_timedout_status() {
        let tableau = Tableau::new(2, 1);
        let variables = vec!["x".to_string()];
        let solution = extract(&tableau, 1.0, &variables, Status::Timedout, 5.0, None, &SolveOptions::default());
        // A timed-out MILP that still found an incumbent must report
        // `Timedout`, not silently upgrade to `Optimal` (§6/§7).
        assert_eq!(solution.status, Status::Timedout);
        assert_eq!(solution.objective, -5.0);
    }

    #[test]
    fn unbounded_emits_infinite_variable() {
        let tableau = Tableau::new(2, 1);
        let variables = vec!["x".to_string()];
        let solution = extract(&tableau, 1.0, &variables, Status::Unbounded, f64::NAN, Some(1), &SolveOptions::default());
        assert_eq!(solution.status, Status::Unbounded);
        assert_eq!(solution.objective, f64::INFINITY);
        assert_eq!(solution.variables, vec![("x".to_string(), f64::INFINITY)]);
    }

    #[test]
    fn infeasible_has_empty_variables_and_nan_objective() {
        let tableau = Tableau::new(2, 1);
        let variables = vec!["x".to_string()];
        let solution = extract(&tableau, 1.0, &variables, Status::Infeasible, f64::NAN, None, &SolveOptions::default());
        assert!(solution.variables.is_empty());
        assert!(solution.objective.is_nan());
    }

    #[test]
    fn solution_round_trips_through_json() {
        let solution = Solution {
            status: Status::Optimal,
            objective: 14400.0,
            variables: vec![("table".to_string(), 8.0), ("dresser".to_string(), 3.0)],
        };
        let json = serde_json::to_string(&solution).unwrap();
        let back: Solution = serde_json::from_str(&json).unwrap();
        assert_eq!(solution, back);
    }
}
