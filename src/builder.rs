//! Tableau construction (component B, §4.B).
//!
//! Deterministic translation of a [`Model`] into a [`Tableau`] plus the
//! bookkeeping the simplex and branch-and-cut stages need: the internal
//! sign, the ordered variable key list (duplicates preserved), and the
//! 1-based columns that must come out integer.
//!
//! Grounded on `achronyme-solver/src/linear/tableau.rs::Tableau::new`,
//! which builds `[A | I | b]` from `c`/`A`/`b`/`sense` in one pass and
//! folds `sense` into the objective row exactly as here — generalized
//! from a flat matrix input to the keyed, order-preserving [`Model`].

use std::collections::HashMap;

use crate::model::Model;
use crate::tableau::Tableau;

/// Output of [`build`]: everything phase-1/phase-2 and branch-and-cut need
/// beyond the raw tableau itself.
pub struct Build {
    pub tableau: Tableau,
    /// +1 for maximize, -1 for minimize (§4.B).
    pub sign: f64,
    /// Ordered variable keys, one per tableau column `1..width`, duplicates
    /// preserved verbatim from `Model::variables`.
    pub variables: Vec<String>,
    /// 1-based tableau columns that must be integer in the final solution
    /// (binary columns included).
    pub integer_columns: Vec<usize>,
}

#[derive(Default, Clone, Copy)]
struct Bound {
    lower: Option<f64>,
    upper: Option<f64>,
}

#[derive(Default, Clone, Copy)]
struct ConstraintRows {
    upper_row: Option<usize>,
    lower_row: Option<usize>,
}

/// Builds the initial tableau from `model`, per §4.B steps 1-8.
///
/// Does not validate feasibility: `lower > upper` is permitted and
/// surfaces as phase-1 infeasibility later. If `model.objective` matches
/// no coefficient key, row 0 stays entirely zero ("any feasible point"
/// mode, §7).
pub fn build(model: &Model) -> Build {
    let sign = model.direction.sign();

    // Step 1: materialize variables, preserving duplicate keys and order.
    let variable_entries = model.variables.iter_ordered();
    let variables: Vec<String> = variable_entries.iter().map(|(k, _)| k.to_string()).collect();
    let width = variables.len() + 1;

    // Step 2: classify each variable column as binary and/or integer.
    let mut binary_columns = Vec::new();
    let mut integer_columns = Vec::new();
    for (i, key) in variables.iter().enumerate() {
        let col = i + 1;
        if model.binaries.contains(key) {
            binary_columns.push(col);
            integer_columns.push(col);
        } else if model.integers.contains(key) {
            integer_columns.push(col);
        }
    }

    // Step 3: merge constraint bounds, first-occurrence order fixes row order.
    let mut order: Vec<String> = Vec::new();
    let mut bounds: HashMap<String, Bound> = HashMap::new();
    for (key, bound) in model.constraints.iter_ordered() {
        let (lo, hi) = bound.resolve();
        let entry = bounds.entry(key.to_string()).or_insert_with(|| {
            order.push(key.to_string());
            Bound::default()
        });
        entry.lower = match (entry.lower, lo) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, None) => a,
            (None, b) => b,
        };
        entry.upper = match (entry.upper, hi) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, None) => a,
            (None, b) => b,
        };
    }

    // Step 4: assign row numbers (upper side before lower side).
    let mut rows: HashMap<String, ConstraintRows> = HashMap::new();
    let mut next_row = 1usize;
    for key in &order {
        let bound = bounds[key];
        let mut cr = ConstraintRows::default();
        if bound.upper.is_some() {
            cr.upper_row = Some(next_row);
            next_row += 1;
        }
        if bound.lower.is_some() {
            cr.lower_row = Some(next_row);
            next_row += 1;
        }
        rows.insert(key.clone(), cr);
    }
    let bound_rows = next_row - 1;

    // Step 5: allocate.
    let height = next_row + binary_columns.len();
    let mut tableau = Tableau::new(width, height);

    // Step 6: fill coefficients, column by column. Last entry wins for a
    // duplicate key within one variable's own coefficients (§3).
    for (i, (_, coeffs)) in variable_entries.iter().enumerate() {
        let col = i + 1;
        let mut by_key: HashMap<&str, f64> = HashMap::new();
        for (k, v) in coeffs.iter_ordered() {
            by_key.insert(k, *v);
        }
        for (key, coef) in by_key {
            if model.objective.as_deref() == Some(key) {
                tableau.set(0, col, tableau.get(0, col) + sign * coef);
            }
            if let Some(cr) = rows.get(key) {
                if let Some(r) = cr.upper_row {
                    tableau.set(r, col, coef);
                }
                if let Some(r) = cr.lower_row {
                    tableau.set(r, col, -coef);
                }
            }
        }
    }

    // Step 7: fill RHS for constraint rows.
    for key in &order {
        let bound = bounds[key];
        let cr = rows[key];
        if let Some(r) = cr.upper_row {
            tableau.set(r, 0, bound.upper.unwrap());
        }
        if let Some(r) = cr.lower_row {
            tableau.set(r, 0, -bound.lower.unwrap());
        }
    }

    // Step 8: one row per binary variable, RHS = 1, +1 in its column.
    for (i, &col) in binary_columns.iter().enumerate() {
        let row = 1 + bound_rows + i;
        tableau.set(row, 0, 1.0);
        tableau.set(row, col, 1.0);
    }

    Build {
        tableau,
        sign,
        variables,
        integer_columns,
    }
}
