//! handle-audit library for inspecting Windows kernel-object handle tables
//!
//! The resolution core (filtering, per-kind name composition, the resolver
//! itself) is platform-independent and works against the [`resolver::inspect`]
//! trait family. The Windows implementation of those traits, together with
//! the handle enumeration and privilege/impersonation machinery, lives in
//! the `windows`, `process` and `privileges` modules and only builds on
//! Windows targets.

pub mod config;
pub mod core;
pub mod output;
pub mod privileges;
pub mod resolver;

#[cfg(windows)]
pub mod process;
#[cfg(windows)]
pub mod windows;

// Re-export main types from core module
pub use core::types::{
    FilteredEntry, HandleTableEntry, ObjectKind, ProcessId, ProcessIdentity, ScanError,
    ScanResult, ThreadId, ThreadIdentity, TokenIdentity, TokenKind, TokenStatistics, TypeTable,
};

pub use privileges::{ImpersonationLevel, PrivilegeReport};
pub use resolver::{NameTable, ObjectNameResolver, PLACEHOLDER};
