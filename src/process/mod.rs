//! Process enumeration support
//!
//! Name/pid lookups over a ToolHelp32 snapshot, used to resolve the
//! impersonation donor by name and thread owners by pid.

pub mod enumerator;

pub use enumerator::{pid_by_name, process_name_by_pid, ProcessEnumerator, ProcessRecord};
