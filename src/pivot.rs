//! Gauss-Jordan pivot and optional cycle detection (component C, §4.C).
//!
//! Grounded on `achronyme-solver/src/linear/tableau.rs::Tableau::pivot`
//! (normalize the pivot row, eliminate the pivot column from every other
//! row including the objective row, update the basis) — extended with the
//! `1e-16` sparsification threshold and the bijective position-map swap
//! this spec's §3 tableau requires, and with [`CycleDetector`], which the
//! teacher has no counterpart for (it bounds iterations with a flat
//! counter instead; explicit cycle detection is this spec's addition,
//! §4.C, gated behind `SolveOptions::check_cycles`).

use crate::tableau::{Tableau, PIVOT_SPARSIFY_THRESHOLD};

/// Performs one Gauss-Jordan pivot at `(row, col)`.
///
/// The abstract variables currently occupying column `col` and row
/// position `width + row` trade places in the bijection. Row `row` is
/// divided by the pivot element; every other row `r'` has `k = M[r',
/// col]` eliminated by `row r' -= k * row row`, restricted to the columns
/// where row `row` is non-zero (the teacher's "restricted to nonzero
/// columns" sparsity trick, generalized to an explicit threshold here).
pub fn pivot(tableau: &mut Tableau, row: usize, col: usize) {
    let width = tableau.width;

    let entering = tableau.variable_at_position[col];
    let leaving = tableau.variable_at_position[width + row];
    tableau.swap_positions(entering, leaving);

    let q = tableau.get(row, col);
    for c in 0..width {
        let mut v = tableau.get(row, c) / q;
        if v.abs() < PIVOT_SPARSIFY_THRESHOLD {
            v = 0.0;
        }
        tableau.set(row, c, v);
    }
    tableau.set(row, col, 1.0 / q);

    let pivot_row: Vec<f64> = tableau.row(row).to_vec();
    let nonzero_cols: Vec<usize> = (0..width)
        .filter(|&c| pivot_row[c].abs() > PIVOT_SPARSIFY_THRESHOLD)
        .collect();

    for r in 0..tableau.height {
        if r == row {
            continue;
        }
        let k = tableau.get(r, col);
        if k.abs() <= PIVOT_SPARSIFY_THRESHOLD {
            continue;
        }
        for &c in &nonzero_cols {
            let v = tableau.get(r, c) - k * pivot_row[c];
            tableau.set(r, c, v);
        }
        tableau.set(r, col, -k / q);
    }
}

/// Bounded-history repeated-pivot-sequence detector, enabled by
/// `SolveOptions::check_cycles` (§4.C).
#[derive(Debug, Default, Clone)]
pub struct CycleDetector {
    history: Vec<(usize, usize)>,
}

impl CycleDetector {
    pub fn new() -> Self {
        CycleDetector { history: Vec::new() }
    }

    /// Records a `(leaving, entering)` pivot and reports whether the most
    /// recent `L` entries repeat the `L` entries immediately before them,
    /// for any `L` in `[6, history.len() / 2]`. The minimum cycle length 6
    /// is a domain constant: shorter apparent repeats in Dantzig-rule
    /// tableau simplex are spurious.
    pub fn record_and_check(&mut self, leaving: usize, entering: usize) -> bool {
        self.history.push((leaving, entering));
        let n = self.history.len();
        let max_l = n / 2;
        if max_l < 6 {
            return false;
        }
        for l in 6..=max_l {
            let recent = &self.history[n - l..n];
            let previous = &self.history[n - 2 * l..n - l];
            if recent == previous {
                return true;
            }
        }
        false
    }
}
