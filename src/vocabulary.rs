//! The closed dispersal trait vocabulary.
//!
//! Trait names are the output keys of the aggregation stage. The list is
//! fixed at compile time and never extended from treatment text or from
//! term-table columns.

use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Every dispersal trait name, in output order.
pub const DISPERSAL_TRAIT_NAMES: &[&str] = &[
    "wing",
    "pappus",
    "hook",
    "plume",
    "fleshy_reward",
    "elaiosome",
    "buoyant_structure",
    "sticky_coating",
    "explosive_dehiscence",
];

/// Suffix marking an explicitly absent trait (`wing_absent`).
pub const ABSENT_SUFFIX: &str = "_absent";

/// Source-table column names that are known misspellings of a trait name.
///
/// Applied once while a table is loaded.
pub const COLUMN_CORRECTIONS: &[(&str, &str)] = &[("bouyant_structure", "buoyant_structure")];

static TRAIT_NAME_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| DISPERSAL_TRAIT_NAMES.iter().copied().collect());

/// Returns true if `name` is a member of the trait vocabulary.
pub fn is_trait_name(name: &str) -> bool {
    TRAIT_NAME_SET.contains(name)
}

/// Returns true if `name` already carries the absence suffix.
pub fn is_absent(name: &str) -> bool {
    name.ends_with(ABSENT_SUFFIX)
}

/// Appends the absence suffix unless it is already present.
pub fn mark_absent(name: &str) -> String {
    if is_absent(name) {
        name.to_string()
    } else {
        format!("{}{}", name, ABSENT_SUFFIX)
    }
}

/// Strips the absence suffix, returning `None` if there was none.
pub fn strip_absent(name: &str) -> Option<&str> {
    name.strip_suffix(ABSENT_SUFFIX)
}

/// Maps a source column name to its canonical spelling.
pub fn correct_column(name: &str) -> &str {
    COLUMN_CORRECTIONS
        .iter()
        .find(|(wrong, _)| *wrong == name)
        .map(|(_, right)| *right)
        .unwrap_or(name)
}
