//! Token privilege enablement and impersonation
//!
//! The report and impersonation-level types are platform-independent; the
//! enabler and the donor-impersonation engine drive the Windows token APIs
//! and only build on Windows.

#[cfg(windows)]
mod enabler;
#[cfg(windows)]
mod impersonate;

#[cfg(windows)]
pub use enabler::PrivilegeEnabler;
#[cfg(windows)]
pub use impersonate::{impersonate_via_donor, ImpersonationGuard};

use std::collections::BTreeMap;
use std::fmt;

/// Per-privilege enablement outcome, built fresh per call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrivilegeReport {
    results: BTreeMap<String, bool>,
}

impl PrivilegeReport {
    pub fn new() -> Self {
        PrivilegeReport {
            results: BTreeMap::new(),
        }
    }

    /// Record the outcome for one privilege name
    pub fn record(&mut self, name: impl Into<String>, enabled: bool) {
        self.results.insert(name.into(), enabled);
    }

    /// Look up the outcome for a privilege name
    pub fn get(&self, name: &str) -> Option<bool> {
        self.results.get(name).copied()
    }

    /// True iff no recorded privilege failed to enable.
    ///
    /// An empty report is trivially all-enabled.
    pub fn all_enabled(&self) -> bool {
        self.results.values().all(|&enabled| enabled)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Iterate over (name, enabled) pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.results.iter().map(|(name, &enabled)| (name.as_str(), enabled))
    }
}

/// Security impersonation levels, ordered weakest to strongest.
///
/// Only `Impersonation` and `Delegation` grant the access rights handle
/// duplication later needs; an apply-call that "succeeds" at
/// `Identification` is still an overall failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ImpersonationLevel {
    Anonymous,
    Identification,
    Impersonation,
    Delegation,
}

impl ImpersonationLevel {
    /// Decode the SECURITY_IMPERSONATION_LEVEL value from a token query
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(ImpersonationLevel::Anonymous),
            1 => Some(ImpersonationLevel::Identification),
            2 => Some(ImpersonationLevel::Impersonation),
            3 => Some(ImpersonationLevel::Delegation),
            _ => None,
        }
    }

    /// Whether this level is strong enough for cross-process handle work
    pub fn is_sufficient(self) -> bool {
        matches!(
            self,
            ImpersonationLevel::Impersonation | ImpersonationLevel::Delegation
        )
    }
}

impl fmt::Display for ImpersonationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ImpersonationLevel::Anonymous => "Anonymous",
            ImpersonationLevel::Identification => "Identification",
            ImpersonationLevel::Impersonation => "Impersonation",
            ImpersonationLevel::Delegation => "Delegation",
        };
        write!(f, "{}", s)
    }
}
