//! Best-first branch-and-cut over integer branches (component E, §4.E).
//!
//! Grounded on `achronyme-solver/src/integer/branch_bound/{mod,node,
//! helpers,solvers}.rs` for the overall module split — a node/record type
//! ([`Cut`]/[`Branch`] here vs. the teacher's `BBNode`), a `helpers`-style
//! set of small pure predicates (`is_integer_solution`/
//! `find_fractional_var`/`should_prune`/`is_better` map directly onto
//! [`most_fractional`] and the pruning/improvement checks below), and a
//! driving loop. The teacher explores depth-first with a `Vec` stack and
//! rebuilds a bounded LP from scratch per node (`solve_with_bounds`); this
//! spec requires best-first search over a min-heap plus cut application
//! against the root tableau's basic/non-basic decomposition (§4.E
//! "Applying cuts"), which has no teacher counterpart and is built from
//! §4.E directly. The priority-queue-over-floats idiom (`Reverse<
//! OrderedFloat<f64>>`) is grounded on
//! `Void-CA-SUMA/crates/suma_core/.../djikstra.rs`.
//!
//! **Queue convention.** Internally the tableau always maximizes (§4.B).
//! `Branch::lp_bound` stores the *evaluation* of a branch — the negation
//! of its LP relaxation's maximized objective — so that a min-heap pops
//! the most promising (highest real objective) branch first and a
//! strictly increasing sequence of popped evaluations lets the loop
//! terminate globally, not just locally prune, the instant the best
//! reachable bound can no longer beat the incumbent. `best_eval` is
//! tracked in the same evaluation units, starting at `+Infinity` (no
//! incumbent yet), matching §4.E's literal initial value.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Instant;

use ordered_float::OrderedFloat;

use crate::options::SolveOptions;
use crate::pivot::CycleDetector;
use crate::simplex::{self, Status};
use crate::tableau::Tableau;

/// A single bound cut: `sign = +1` means "variable `column` <= value",
/// `sign = -1` means "variable `column` >= value" (§4.E).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cut {
    pub sign: f64,
    pub column: usize,
    pub value: f64,
}

#[derive(Debug, Clone)]
struct Branch {
    lp_bound: f64,
    cuts: Vec<Cut>,
}

impl PartialEq for Branch {
    fn eq(&self, other: &Self) -> bool {
        self.lp_bound == other.lp_bound
    }
}
impl Eq for Branch {}
impl PartialOrd for Branch {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Branch {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        OrderedFloat(self.lp_bound).cmp(&OrderedFloat(other.lp_bound))
    }
}

/// Outcome of a branch-and-cut search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MilpStatus {
    Optimal,
    Infeasible,
    Timedout,
}

/// Result of [`solve`]: the status, the incumbent tableau (if any), and
/// its internal-maximize-convention objective value.
pub struct MilpOutcome {
    pub status: MilpStatus,
    pub tableau: Option<Tableau>,
    pub result: f64,
}

/// Finds the integer-marked column whose basic value is furthest from an
/// integer (largest `|v - round(v)|`), ties broken by first column index
/// (§4.E "Fractionality selection rule"). `None` means the LP solution is
/// already integer feasible.
fn most_fractional(tableau: &Tableau, integer_columns: &[usize], precision: f64) -> Option<(usize, f64)> {
    let mut best: Option<(usize, f64, f64)> = None;
    for &col in integer_columns {
        if let Some(row) = tableau.basic_row(col) {
            let value = tableau.get(row, 0);
            let distance = (value - value.round()).abs();
            if distance > precision {
                let better = match best {
                    Some((_, _, best_distance)) => distance > best_distance,
                    None => true,
                };
                if better {
                    best = Some((col, value, distance));
                }
            }
        }
    }
    best.map(|(col, value, _)| (col, value))
}

/// Rewrites `dst` in place to hold the root tableau plus `cuts`' rows, per
/// §4.E "Applying cuts". `dst` is a pre-sized scratch buffer (see `solve`)
/// reused across every node the search explores — `clear` zeroes it and
/// resets its position map to the identity without touching its
/// allocation, so applying a node's cuts never allocates.
///
/// Exploits that at the root, basic variables equal their RHS: the new
/// row is expressed in terms of the root's current non-basic columns, so
/// phase 1 can restore feasibility from there without re-deriving the cut
/// from the original variable coefficients.
fn apply_cuts_into(dst: &mut Tableau, root: &Tableau, cuts: &[Cut]) {
    debug_assert!(
        root.height + cuts.len() <= dst.height,
        "cut count exceeded the a priori scratch buffer bound"
    );
    let width = root.width;
    dst.clear();

    for r in 0..root.height {
        for c in 0..width {
            dst.set(r, c, root.get(r, c));
        }
    }

    // The original abstract variables keep their root positions verbatim;
    // `clear`'s identity map already assigns the new trailing positions to
    // brand-new slack variables with matching ids, so only the original
    // prefix needs overwriting.
    let total_old = width + root.height;
    dst.position_of_variable[..total_old].copy_from_slice(&root.position_of_variable);
    dst.variable_at_position[..total_old].copy_from_slice(&root.variable_at_position);

    for (i, cut) in cuts.iter().enumerate() {
        let row = root.height + i;
        let pos = root.position_of_variable[cut.column];
        if pos < width {
            dst.set(row, 0, cut.sign * cut.value);
            dst.set(row, pos, cut.sign);
        } else {
            let root_row = pos - width;
            dst.set(row, 0, cut.sign * (cut.value - root.get(root_row, 0)));
            for c in 1..width {
                dst.set(row, c, -cut.sign * root.get(root_row, c));
            }
        }
    }
}

/// Builds a child's cut list: parent cuts on other variables are kept
/// verbatim; a parent cut on the *same* variable is retained only if it
/// shares the new cut's side, keeping each branch's cut set monotone.
fn child_cuts(parent: &[Cut], new_cut: Cut) -> Vec<Cut> {
    let mut cuts: Vec<Cut> = parent
        .iter()
        .copied()
        .filter(|c| c.column != new_cut.column || c.sign == new_cut.sign)
        .collect();
    cuts.push(new_cut);
    cuts
}

fn tolerance_met(incumbent_objective: f64, root_objective: f64, tolerance: f64) -> bool {
    if tolerance <= 0.0 {
        return false;
    }
    let threshold = root_objective - tolerance * root_objective.abs();
    incumbent_objective >= threshold
}

/// Runs best-first branch-and-cut from an already-optimal root LP
/// relaxation. `root` must be the tableau left by a successful
/// [`crate::simplex::solve_lp`] call; `root_result` its internal
/// (always-maximize) objective.
#[tracing::instrument(level = "debug", skip(root, integer_columns, options))]
pub fn solve(root: &Tableau, root_result: f64, integer_columns: &[usize], options: &SolveOptions) -> MilpOutcome {
    let root_eval = -root_result;

    let (seed_col, seed_value) = match most_fractional(root, integer_columns, options.precision) {
        Some(pair) => pair,
        None => {
            return MilpOutcome {
                status: MilpStatus::Optimal,
                tableau: Some(root.clone()),
                result: root_result,
            }
        }
    };

    let mut queue: BinaryHeap<Reverse<Branch>> = BinaryHeap::new();
    let down = Cut { sign: 1.0, column: seed_col, value: seed_value.floor() };
    let up = Cut { sign: -1.0, column: seed_col, value: seed_value.ceil() };
    queue.push(Reverse(Branch { lp_bound: root_eval, cuts: vec![down] }));
    queue.push(Reverse(Branch { lp_bound: root_eval, cuts: vec![up] }));

    // Two pre-sized scratch buffers, allocated once and never again (§3
    // Lifecycle, §4.E State, §5 Resources): `candidate` is overwritten in
    // place for every node the loop explores; `incumbent` holds the best
    // integer-feasible tableau found so far. A new incumbent is adopted by
    // swapping buffer roles, not by cloning or allocating a fresh tableau —
    // the former incumbent buffer becomes the next node's scratch space.
    let height_cap = root.height + 2 * integer_columns.len();
    let mut candidate = Tableau::new(root.width, height_cap);
    let mut incumbent = Tableau::new(root.width, height_cap);
    let mut has_incumbent = false;

    let mut best_eval = f64::INFINITY;
    let mut iterations: u32 = 0;
    let start = Instant::now();

    tracing::debug!(root_objective = root_result, "branch-and-cut starting search");

    let status = 'search: loop {
        if iterations >= options.max_iterations {
            tracing::debug!(iterations, "branch-and-cut exhausted the iteration budget");
            break MilpStatus::Timedout;
        }
        if start.elapsed().as_secs_f64() * 1000.0 >= options.timeout {
            tracing::debug!(iterations, "branch-and-cut exceeded the wall-clock budget");
            break MilpStatus::Timedout;
        }

        let branch = match queue.pop() {
            Some(Reverse(b)) => b,
            None => {
                tracing::debug!(has_incumbent, "branch-and-cut queue exhausted");
                break if has_incumbent {
                    MilpStatus::Optimal
                } else {
                    MilpStatus::Infeasible
                };
            }
        };
        iterations += 1;
        tracing::trace!(
            iteration = iterations,
            queue_depth = queue.len(),
            lp_bound = branch.lp_bound,
            cuts = branch.cuts.len(),
            "branch-and-cut popped branch"
        );

        if branch.lp_bound > best_eval {
            tracing::debug!(lp_bound = branch.lp_bound, best_eval, "branch-and-cut pruned remaining queue");
            break if has_incumbent {
                MilpStatus::Optimal
            } else {
                MilpStatus::Infeasible
            };
        }

        apply_cuts_into(&mut candidate, root, &branch.cuts);
        let mut detector = if options.check_cycles { Some(CycleDetector::new()) } else { None };
        let phase1_status = simplex::phase1(&mut candidate, options, &mut detector);
        let (node_status, node_result) = match phase1_status {
            Status::Optimal => simplex::phase2(&mut candidate, options, &mut detector),
            other => (other, f64::NAN),
        };

        if node_status != Status::Optimal {
            continue;
        }

        let eval = -node_result;
        if eval >= best_eval {
            continue;
        }

        match most_fractional(&candidate, integer_columns, options.precision) {
            None => {
                best_eval = eval;
                std::mem::swap(&mut candidate, &mut incumbent);
                has_incumbent = true;
                tracing::debug!(
                    iteration = iterations,
                    objective = -best_eval,
                    queue_depth = queue.len(),
                    "branch-and-cut found a new incumbent"
                );
                if tolerance_met(-best_eval, -root_eval, options.tolerance) {
                    tracing::debug!(objective = -best_eval, "branch-and-cut tolerance threshold met");
                    break 'search MilpStatus::Optimal;
                }
            }
            Some((col, value)) => {
                let down = Cut { sign: 1.0, column: col, value: value.floor() };
                let up = Cut { sign: -1.0, column: col, value: value.ceil() };
                queue.push(Reverse(Branch { lp_bound: eval, cuts: child_cuts(&branch.cuts, down) }));
                queue.push(Reverse(Branch { lp_bound: eval, cuts: child_cuts(&branch.cuts, up) }));
            }
        }
    };

    let result = if has_incumbent { -best_eval } else { f64::NAN };
    let tableau = if has_incumbent { Some(incumbent) } else { None };
    MilpOutcome { status, tableau, result }
}
