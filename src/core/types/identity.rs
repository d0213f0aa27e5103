//! Identity records decoded at the platform boundary
//!
//! The native queries consume fixed binary layouts (basic process/thread
//! information, token statistics). These records are what the platform side
//! decodes them into, so the resolver and the composition rules never see
//! raw structures.

use std::fmt;

/// What a duplicated process handle reveals about its target.
///
/// Either half can be independently absent; composition handles every
/// combination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessIdentity {
    /// Full image path, if the query succeeded
    pub image_path: Option<String>,
    /// Process id from basic process information, if the query succeeded
    pub pid: Option<u32>,
}

/// What a duplicated thread handle reveals about its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadIdentity {
    /// Process owning the thread
    pub owner_pid: u32,
    /// The thread's own id
    pub thread_id: u32,
}

/// Account identity behind a token, from the token-user query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenIdentity {
    pub account: Option<String>,
    pub domain: Option<String>,
}

impl TokenIdentity {
    /// Whether at least one half of the identity is present
    pub fn is_resolved(&self) -> bool {
        self.account.is_some() || self.domain.is_some()
    }
}

/// Token type as reported by token statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Primary,
    Impersonation,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Primary => write!(f, "Primary"),
            TokenKind::Impersonation => write!(f, "Impersonation"),
        }
    }
}

/// The slice of token statistics the scanner displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenStatistics {
    /// Authentication id (locally unique id of the logon session)
    pub auth_id: u64,
    /// Primary or impersonation token
    pub kind: TokenKind,
}
