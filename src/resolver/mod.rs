//! The object-name resolution pass
//!
//! For a filtered set of handle-table entries belonging to one target
//! process: open the target for duplication, duplicate each handle with its
//! original access mask, and dispatch on object kind to recover a name.
//! Only the target open is batch-fatal; every other failure is per-entry.

pub mod compose;
pub mod inspect;

use crate::core::types::{FilteredEntry, ObjectKind, ProcessId};
use compose::{compose_process_name, compose_thread_name, compose_token_name};
use inspect::{DuplicatedHandle, ObjectInspector};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Sentinel recorded for entries that did not resolve to a name.
pub const PLACEHOLDER: &str = "(N/A)";

/// The outcome of one resolution pass: every filtered entry mapped to a
/// display string (the placeholder when unresolved), plus the count of
/// entries that actually resolved.
///
/// The count distinguishes "the filter matched nothing" from "matched but
/// nothing was accessible".
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    names: HashMap<u64, String>,
    named_count: usize,
}

impl NameTable {
    /// Display string for a handle value; `None` if the handle was not in
    /// the filtered set at all.
    pub fn get(&self, handle_value: u64) -> Option<&str> {
        self.names.get(&handle_value).map(String::as_str)
    }

    /// Display string, falling back to the placeholder for unknown handles.
    pub fn display(&self, handle_value: u64) -> &str {
        self.get(handle_value).unwrap_or(PLACEHOLDER)
    }

    /// Whether the entry resolved to a real name
    pub fn is_resolved(&self, handle_value: u64) -> bool {
        self.get(handle_value).is_some_and(|n| n != PLACEHOLDER)
    }

    /// Number of entries that resolved to a real name
    pub fn named_count(&self) -> usize {
        self.named_count
    }

    /// Number of entries recorded, resolved or not
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether no entries were recorded
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn record(&mut self, handle_value: u64, name: Option<String>) {
        match name {
            Some(name) => {
                self.named_count += 1;
                self.names.insert(handle_value, name);
            }
            None => {
                self.names.insert(handle_value, PLACEHOLDER.to_string());
            }
        }
    }
}

/// Resolves filtered handle-table entries to display names through an
/// [`ObjectInspector`].
pub struct ObjectNameResolver<'a, I: ObjectInspector> {
    inspector: &'a I,
}

impl<'a, I: ObjectInspector> ObjectNameResolver<'a, I> {
    pub fn new(inspector: &'a I) -> Self {
        ObjectNameResolver { inspector }
    }

    /// Run the resolution pass against `target_pid`.
    ///
    /// If the target cannot be opened for duplication (insufficient
    /// privilege, process exited), every entry maps to the placeholder and
    /// the named count is zero. Per-entry duplication or query failures are
    /// never fatal to the batch.
    pub fn resolve(&self, target_pid: ProcessId, entries: &[FilteredEntry]) -> NameTable {
        let mut table = NameTable::default();

        let target = match self.inspector.open_target(target_pid) {
            Ok(target) => target,
            Err(err) => {
                debug!(pid = target_pid, %err, "target open failed, all entries unresolved");
                for filtered in entries {
                    table.record(filtered.entry.handle_value, None);
                }
                return table;
            }
        };

        for filtered in entries {
            let entry = &filtered.entry;
            let name = match target.duplicate(entry.handle_value, entry.granted_access) {
                Ok(duplicate) => self.resolve_one(duplicate.as_ref(), filtered.kind),
                Err(err) => {
                    trace!(
                        handle = format_args!("0x{:X}", entry.handle_value),
                        %err,
                        "duplication failed"
                    );
                    None
                }
            };
            table.record(entry.handle_value, name);
        }

        table
    }

    /// Dispatch one duplicated handle on its object kind.
    fn resolve_one(&self, handle: &dyn DuplicatedHandle, kind: ObjectKind) -> Option<String> {
        match kind {
            ObjectKind::File => handle.file_name(),
            ObjectKind::Process => compose_process_name(&handle.process_identity()),
            ObjectKind::Thread => {
                let thread = handle.thread_identity()?;
                let owner = self.inspector.process_name(thread.owner_pid);
                compose_thread_name(owner.as_deref(), thread.owner_pid, thread.thread_id)
            }
            ObjectKind::Token => {
                let user = handle.token_user()?;
                compose_token_name(&user, handle.token_statistics().as_ref())
            }
            ObjectKind::Other => handle.object_name(),
        }
    }
}
