//! Narrowing a configuration's actions to an explicit list of identifiers.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::error::{ConcatenateError, Result};
use crate::types::Action;

/// The outcome of a successful selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    /// Chosen actions, in configuration order.
    pub actions: Vec<Action>,
    /// Labels of actions that have no identifier and can never be selected.
    pub unselectable: Vec<String>,
}

/// Select the actions whose identifier appears in `requested`.
///
/// Checks run in a fixed order and the first failure wins: duplicate
/// identifiers in the configuration, then requested identifiers that do not
/// exist. Actions without an identifier are reported through a warning and
/// in [`Selection::unselectable`]. An empty `requested` list selects nothing.
pub fn select(actions: &[Action], requested: &[String]) -> Result<Selection> {
    let duplicates = duplicate_ids(actions);
    if !duplicates.is_empty() {
        return Err(ConcatenateError::DuplicateIdentifier(duplicates));
    }

    if requested.is_empty() {
        return Ok(Selection {
            actions: Vec::new(),
            unselectable: Vec::new(),
        });
    }

    let known: Vec<&str> = actions.iter().filter_map(Action::selectable_id).collect();
    let known_set: HashSet<&str> = known.iter().copied().collect();

    let mut seen = HashSet::new();
    let missing: Vec<String> = requested
        .iter()
        .filter(|id| !known_set.contains(id.as_str()))
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(ConcatenateError::UnknownIdentifier {
            missing,
            available: known.iter().map(|s| s.to_string()).collect(),
        });
    }

    let unselectable: Vec<String> = actions
        .iter()
        .filter(|a| a.selectable_id().is_none())
        .map(|a| a.label.clone())
        .collect();
    if !unselectable.is_empty() {
        tracing::warn!(
            "Some actions do not have IDs defined and will be excluded from filtering. \
             Actions without IDs: {}",
            unselectable.join(", ")
        );
    }

    let wanted: HashSet<&str> = requested.iter().map(String::as_str).collect();
    let selected = actions
        .iter()
        .filter(|a| a.selectable_id().is_some_and(|id| wanted.contains(id)))
        .cloned()
        .collect();

    Ok(Selection {
        actions: selected,
        unselectable,
    })
}

/// Identifiers that occur more than once, sorted.
fn duplicate_ids(actions: &[Action]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for id in actions.iter().filter_map(Action::selectable_id) {
        *counts.entry(id).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, n)| *n > 1)
        .map(|(id, _)| id.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
