//! Property combinator
//!
//! Expands a mapping of iterant-name → allowed-values into the full
//! Cartesian product of single-valued assignments.
//!
//! # Ordering
//! Rows come out in odometer order: keys iterate in their insertion order
//! and the right-most key varies fastest. The order is stable — identical
//! input always yields the identical row sequence, which is what makes
//! pipeline runs reproducible.

use crate::icon::IterantValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of the Cartesian product: a single concrete value per iterant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropCombination(IndexMap<String, IterantValue>);

impl PropCombination {
    /// Empty combination (the identity element)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Value assigned to `name`, if any
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IterantValue> {
        self.0.get(name)
    }

    /// Assign a value to `name`
    #[inline]
    pub fn insert(&mut self, name: impl Into<String>, value: IterantValue) {
        self.0.insert(name.into(), value);
    }

    /// Iterate assignments in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IterantValue)> {
        self.0.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of assignments
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the empty combination
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Produce the full Cartesian product of the given iterant axes
///
/// An empty input map yields exactly one empty combination, so a plugin
/// with no iterants still runs once, unparameterized. An axis with an
/// explicitly empty value vector makes the whole product empty.
#[must_use]
pub fn prop_combinator(props: &IndexMap<String, Vec<IterantValue>>) -> Vec<PropCombination> {
    let mut rows = vec![PropCombination::new()];
    for (name, values) in props {
        let mut next = Vec::with_capacity(rows.len() * values.len());
        for row in &rows {
            for value in values {
                let mut extended = row.clone();
                extended.insert(name.clone(), value.clone());
                next.push(extended);
            }
        }
        rows = next;
    }
    rows
}
