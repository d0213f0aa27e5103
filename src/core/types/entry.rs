//! Handle-table records and the object-type table

use super::object_kind::ObjectKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of the system handle table, as supplied by the enumeration layer.
///
/// Read-only input to the resolution core; `granted_access` is replayed
/// verbatim when the handle is duplicated into our context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandleTableEntry {
    /// Process that owns the handle
    pub owner_pid: u32,
    /// Process-local numeric handle value
    pub handle_value: u64,
    /// Index into the object-type table
    pub type_index: u32,
    /// Access mask the owner was granted on this handle
    pub granted_access: u32,
    /// Kernel address of the underlying object
    pub object_address: u64,
}

/// Mapping from object-type index to type name.
///
/// Loaded once before a scan and assumed stable for its duration. Entries
/// whose index is absent here cannot be type-dispatched and are dropped
/// during filtering.
#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: HashMap<u32, String>,
}

impl TypeTable {
    /// Create an empty type table
    pub fn new() -> Self {
        TypeTable {
            entries: HashMap::new(),
        }
    }

    /// Register a type name under an index
    pub fn insert(&mut self, index: u32, name: impl Into<String>) {
        self.entries.insert(index, name.into());
    }

    /// Look up a type name by index
    pub fn name(&self, index: u32) -> Option<&str> {
        self.entries.get(&index).map(String::as_str)
    }

    /// Number of known types
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over (index, name) pairs
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.entries.iter().map(|(&k, v)| (k, v.as_str()))
    }
}

impl FromIterator<(u32, String)> for TypeTable {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        TypeTable {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A handle-table entry that survived type filtering, with its type name
/// and dispatch kind resolved up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredEntry {
    pub entry: HandleTableEntry,
    pub type_name: String,
    pub kind: ObjectKind,
}

impl FilteredEntry {
    pub fn new(entry: HandleTableEntry, type_name: impl Into<String>) -> Self {
        let type_name = type_name.into();
        let kind = ObjectKind::from_type_name(&type_name);
        FilteredEntry {
            entry,
            type_name,
            kind,
        }
    }
}
