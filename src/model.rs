//! The input model: named objective, named two-sided constraints, an
//! ordered list of variables, and integer/binary membership.
//!
//! Every collection on [`Model`] accepts either a key-keyed mapping or an
//! ordered sequence of `(key, value)` pairs through [`Keyed`], so callers
//! that care about row/column order (most do) use the list form and callers
//! that don't can hand over a `HashMap` directly.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::ModelBuildError;

/// Optimization direction. Defaults to [`Direction::Maximize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Maximize,
    Minimize,
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Maximize
    }
}

impl Direction {
    /// +1 for maximize, −1 for minimize — the internal sign folded into the
    /// objective row at construction (§4.B) and reapplied at readback.
    pub fn sign(self) -> f64 {
        match self {
            Direction::Maximize => 1.0,
            Direction::Minimize => -1.0,
        }
    }
}

/// A two-sided bound on a named linear combination.
///
/// `equal` takes precedence over `min`/`max` when both are present: it is
/// always equivalent to `{min: v, max: v}`, never inferred from a
/// combination of the other fields.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ConstraintBound {
    pub equal: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl ConstraintBound {
    pub fn equal(v: f64) -> Self {
        ConstraintBound { equal: Some(v), min: None, max: None }
    }

    pub fn min(v: f64) -> Self {
        ConstraintBound { equal: None, min: Some(v), max: None }
    }

    pub fn max(v: f64) -> Self {
        ConstraintBound { equal: None, min: None, max: Some(v) }
    }

    pub fn range(min: f64, max: f64) -> Self {
        ConstraintBound { equal: None, min: Some(min), max: Some(max) }
    }

    /// Collapses `equal` into `(min, max)`, per §6 "Constraint bounds".
    pub fn resolve(&self) -> (Option<f64>, Option<f64>) {
        match self.equal {
            Some(v) => (Some(v), Some(v)),
            None => (self.min, self.max),
        }
    }
}

/// Either a key→value mapping or an ordered sequence of `(key, value)`
/// pairs, per §9 "Polymorphic inputs without dynamic dispatch".
///
/// `Map` has no defined iteration order beyond "some order, consistently";
/// callers who need first-occurrence order (row ordering, duplicate
/// variable keys) must use `List`.
///
/// `#[serde(untagged)]` dispatches on the wire shape itself — a JSON object
/// deserializes as `Map`, a JSON array of `[key, value]` pairs as `List` —
/// matching the "either a keyed mapping or an ordered sequence" input shape
/// from §6, so an external JSON/MPS parser can hand in either representation
/// without the caller picking a variant by name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Keyed<V> {
    Map(HashMap<String, V>),
    List(Vec<(String, V)>),
}

impl<V> Keyed<V> {
    /// Normalizes either shape into a single ordered sequence.
    pub fn into_ordered(self) -> Vec<(String, V)> {
        match self {
            Keyed::Map(m) => m.into_iter().collect(),
            Keyed::List(l) => l,
        }
    }

    pub fn iter_ordered(&self) -> Vec<(&str, &V)> {
        match self {
            Keyed::Map(m) => m.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            Keyed::List(l) => l.iter().map(|(k, v)| (k.as_str(), v)).collect(),
        }
    }
}

impl<V> Default for Keyed<V> {
    fn default() -> Self {
        Keyed::List(Vec::new())
    }
}

impl<V> From<HashMap<String, V>> for Keyed<V> {
    fn from(m: HashMap<String, V>) -> Self {
        Keyed::Map(m)
    }
}

impl<V> From<Vec<(String, V)>> for Keyed<V> {
    fn from(l: Vec<(String, V)>) -> Self {
        Keyed::List(l)
    }
}

/// A variable's coefficients across constraint (and objective) keys.
/// Duplicate keys within one variable: last entry wins (§3).
pub type Coefficients = Keyed<f64>;

/// The "all" / "none" / explicit-set shorthand shared by `integers` and
/// `binaries` (§3).
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSet {
    All,
    None,
    Keys(HashSet<String>),
}

/// `integers`/`binaries` accept "a bool or a sequence of keys" on the wire
/// (§6), which doesn't line up with this type's three-variant shape
/// (`All`/`None`/`Keys`), so the derive macro's default tagging is wrong
/// here — `Serialize`/`Deserialize` are hand-written to collapse `All`/
/// `None` to `true`/`false` and `Keys` to an array of strings.
impl serde::Serialize for VariableSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            VariableSet::All => true.serialize(serializer),
            VariableSet::None => false.serialize(serializer),
            VariableSet::Keys(keys) => {
                let ordered: Vec<&String> = keys.iter().collect();
                ordered.serialize(serializer)
            }
        }
    }
}

impl<'de> Deserialize<'de> for VariableSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Bool(bool),
            Keys(Vec<String>),
        }
        Ok(match Repr::deserialize(deserializer)? {
            Repr::Bool(true) => VariableSet::All,
            Repr::Bool(false) => VariableSet::None,
            Repr::Keys(keys) => VariableSet::Keys(keys.into_iter().collect()),
        })
    }
}

impl Default for VariableSet {
    fn default() -> Self {
        VariableSet::None
    }
}

impl VariableSet {
    pub fn contains(&self, key: &str) -> bool {
        match self {
            VariableSet::All => true,
            VariableSet::None => false,
            VariableSet::Keys(set) => set.contains(key),
        }
    }
}

impl From<bool> for VariableSet {
    fn from(all: bool) -> Self {
        if all {
            VariableSet::All
        } else {
            VariableSet::None
        }
    }
}

impl From<HashSet<String>> for VariableSet {
    fn from(keys: HashSet<String>) -> Self {
        VariableSet::Keys(keys)
    }
}

impl From<Vec<String>> for VariableSet {
    fn from(keys: Vec<String>) -> Self {
        VariableSet::Keys(keys.into_iter().collect())
    }
}

/// The input model. Logically immutable — `solve` only ever reads it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Model {
    pub direction: Direction,
    /// Constraint key whose row is to be optimized. Shares a namespace with
    /// `constraints`: the objective may itself appear there to bound it.
    pub objective: Option<String>,
    pub constraints: Keyed<ConstraintBound>,
    /// Ordered; duplicate variable keys are preserved, not merged.
    pub variables: Keyed<Coefficients>,
    pub integers: VariableSet,
    /// Binary implies integer AND `value ≤ 1`; takes precedence over
    /// `integers` for the same key.
    pub binaries: VariableSet,
}

impl Model {
    pub fn new() -> Self {
        Model::default()
    }

    /// Builds a model from a raw dense coefficient matrix: one row per
    /// variable, one column per constraint key in `constraint_keys` order,
    /// plus an `objective` column appended at the end of each row. Mirrors
    /// `achronyme-types::Matrix::new`'s eager dimension check — a collaborator
    /// handing this constructor rows of the wrong width (e.g. an MPS or JSON
    /// parser outside this crate's scope) gets a `ModelBuildError` instead of
    /// a silently truncated or padded tableau.
    pub fn from_rows(
        constraint_keys: &[String],
        variable_keys: &[String],
        objective_key: &str,
        rows: Vec<Vec<f64>>,
    ) -> Result<Model, ModelBuildError> {
        let expected = constraint_keys.len() + 1;
        if rows.len() != variable_keys.len() {
            return Err(ModelBuildError::CoefficientLengthMismatch {
                variable: format!("<{} rows for {} variable keys>", rows.len(), variable_keys.len()),
                expected: variable_keys.len(),
                found: rows.len(),
            });
        }
        let mut variables = Vec::with_capacity(rows.len());
        for (key, row) in variable_keys.iter().zip(rows.into_iter()) {
            if row.len() != expected {
                return Err(ModelBuildError::CoefficientLengthMismatch {
                    variable: key.clone(),
                    expected,
                    found: row.len(),
                });
            }
            let mut coeffs: Vec<(String, f64)> = constraint_keys
                .iter()
                .cloned()
                .zip(row.iter().copied())
                .collect();
            coeffs.push((objective_key.to_string(), row[expected - 1]));
            variables.push((key.clone(), Keyed::List(coeffs)));
        }
        Ok(Model {
            objective: Some(objective_key.to_string()),
            variables: Keyed::List(variables),
            ..Model::default()
        })
    }
}
