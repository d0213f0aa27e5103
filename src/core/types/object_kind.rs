//! Closed set of object kinds the resolver can dispatch on

use std::fmt;

/// The object kinds with a dedicated name-resolution strategy.
///
/// Every type name outside the four special-cased kinds maps to `Other`,
/// which falls back to the generic kernel object-name query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    File,
    Process,
    Thread,
    Token,
    Other,
}

impl ObjectKind {
    /// Map an object-type name onto its dispatch kind (case-insensitive).
    pub fn from_type_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("File") {
            ObjectKind::File
        } else if name.eq_ignore_ascii_case("Process") {
            ObjectKind::Process
        } else if name.eq_ignore_ascii_case("Thread") {
            ObjectKind::Thread
        } else if name.eq_ignore_ascii_case("Token") {
            ObjectKind::Token
        } else {
            ObjectKind::Other
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ObjectKind::File => "File",
            ObjectKind::Process => "Process",
            ObjectKind::Thread => "Thread",
            ObjectKind::Token => "Token",
            ObjectKind::Other => "Other",
        };
        write!(f, "{}", s)
    }
}
