//! Deterministic ordering helpers.
//!
//! Reports must be identical for identical inputs. Files are iterated in
//! file-id order; within a file, detail strings are de-duplicated and
//! sorted before they become report items.

use std::collections::BTreeSet;

/// Format a `"<file>: <detail>"` report item.
pub fn violation_item(file: &str, detail: &str) -> String {
    format!("{file}: {detail}")
}

/// Append one item per distinct detail, in sorted order.
pub fn push_file_details(items: &mut Vec<String>, file: &str, details: &BTreeSet<String>) {
    items.extend(details.iter().map(|detail| violation_item(file, detail)));
}

/// Positions in `updates` that have no counterpart in `installs`.
pub fn unmatched_positions(updates: &[usize], installs: &[usize]) -> BTreeSet<usize> {
    let installs: BTreeSet<usize> = installs.iter().copied().collect();
    updates
        .iter()
        .copied()
        .filter(|idx| !installs.contains(idx))
        .collect()
}
