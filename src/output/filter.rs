//! Type-substring filtering of handle-table entries

use crate::core::types::{FilteredEntry, HandleTableEntry, TypeTable};

/// Filter entries by a case-insensitive type-name substring.
///
/// An empty filter selects every type. Entries whose type index is absent
/// from the table are dropped — they cannot be type-dispatched. Output
/// preserves input order.
pub fn filter_entries(
    entries: &[HandleTableEntry],
    types: &TypeTable,
    type_filter: &str,
) -> Vec<FilteredEntry> {
    let needle = type_filter.to_ascii_lowercase();

    entries
        .iter()
        .filter_map(|&entry| {
            let type_name = types.name(entry.type_index)?;
            if needle.is_empty() || type_name.to_ascii_lowercase().contains(&needle) {
                Some(FilteredEntry::new(entry, type_name))
            } else {
                None
            }
        })
        .collect()
}
