//! Typedef and qualifier unwrapping.

use std::collections::HashSet;

use gimli::{constants, DwTag};
use tracing::debug;

use crate::symbols::{DebugGraph, DieRef};

/// Tags that mean "the referenced type, with an annotation".
#[must_use]
pub fn is_type_wrapper(tag: DwTag) -> bool
{
    matches!(
        tag,
        constants::DW_TAG_typedef
            | constants::DW_TAG_const_type
            | constants::DW_TAG_volatile_type
            | constants::DW_TAG_restrict_type
            | constants::DW_TAG_atomic_type
            | constants::DW_TAG_shared_type
    )
}

/// Follow `DW_AT_type` through wrapper entries to the first non-wrapper.
///
/// Stops early and returns the current (still wrapped) entry when:
/// - the entry was already visited (the chain is cyclic);
/// - it has no `DW_AT_type`, or the reference does not resolve.
///
/// `None` in gives `None` out. An entry whose tag cannot be read is returned
/// unchanged for the classifier to reject.
#[must_use]
pub fn strip_type_wrappers(graph: &DebugGraph<'_>, start: Option<DieRef>) -> Option<DieRef>
{
    let mut current = start?;
    let mut seen = HashSet::new();

    while graph.tag(current).is_some_and(is_type_wrapper) {
        if !seen.insert(current) {
            debug!(die = ?current, "cycle in type wrapper chain");
            return Some(current);
        }

        match graph.reference(current, constants::DW_AT_type) {
            Some(next) => current = next,
            None => return Some(current),
        }
    }

    Some(current)
}
