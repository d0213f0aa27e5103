//! Core module containing the fundamental types of the handle scanner
//!
//! Everything here is platform-independent: handle-table records, the
//! object-kind dispatch enum, identity records decoded at the platform
//! boundary, and the error types shared across the crate.

pub mod types;

// Re-export commonly used types for convenience
pub use types::{
    FilteredEntry, HandleTableEntry, ObjectKind, ScanError, ScanResult, TypeTable,
};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const AUTHORS: &str = env!("CARGO_PKG_AUTHORS");
