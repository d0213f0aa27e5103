//! Core type definitions for the handle scanner
//!
//! Handle-table records and the type table come from the OS enumeration
//! layer; identity records are what the platform boundary decodes out of
//! the fixed native structures so the resolver never touches raw layouts.

mod entry;
mod error;
mod identity;
mod object_kind;

// Re-export all public types
pub use entry::{FilteredEntry, HandleTableEntry, TypeTable};
pub use error::{ScanError, ScanResult};
pub use identity::{ProcessIdentity, ThreadIdentity, TokenIdentity, TokenKind, TokenStatistics};
pub use object_kind::ObjectKind;

// Common type aliases
pub type ProcessId = u32;
pub type ThreadId = u32;
pub type HandleValue = u64;
pub type AccessMask = u32;
