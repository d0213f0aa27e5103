//! Donor-token impersonation
//!
//! A caller's own token frequently lacks the rights needed to open and
//! duplicate handles owned by other processes. This borrows the token of a
//! designated highly privileged system process (by default `smss.exe`,
//! which runs before any user session) and impersonates it on the calling
//! thread, scoped by a guard that reverts on drop.

use super::enabler::PrivilegeEnabler;
use super::ImpersonationLevel;
use crate::core::types::{ScanError, ScanResult};
use crate::process::enumerator;
use crate::windows::bindings::{advapi, kernel32};
use crate::windows::types::OwnedHandle;
use tracing::{debug, info};

/// Scoped impersonation of a donor token on the calling thread.
///
/// The thread reverts to its own security context when the guard drops.
/// The thread's impersonation token is ambient state: do not run two scans
/// on the same thread with overlapping guards.
#[derive(Debug)]
pub struct ImpersonationGuard {
    level: ImpersonationLevel,
}

impl ImpersonationGuard {
    /// Level the impersonation was verified at
    pub fn level(&self) -> ImpersonationLevel {
        self.level
    }
}

impl Drop for ImpersonationGuard {
    fn drop(&mut self) {
        advapi::revert_to_self();
        debug!("impersonation reverted");
    }
}

/// Impersonate `donor_name`'s token on the calling thread.
///
/// Each step aborts with cleanup of everything opened so far; handles in
/// the chain (donor process, donor token, duplicated token) are dropped as
/// soon as the next link exists. Privilege enablement on the duplicated
/// token is best-effort and does not affect the outcome. The apply call
/// alone is not trusted: the thread's resulting token is queried and only
/// `Impersonation` or `Delegation` levels count as success.
pub fn impersonate_via_donor(
    donor_name: &str,
    required_privileges: &[String],
) -> ScanResult<ImpersonationGuard> {
    let donor_pid = enumerator::pid_by_name(donor_name)?;
    debug!(donor = %donor_name, pid = donor_pid, "donor resolved");

    let duplicated = {
        let process = OwnedHandle::new(kernel32::open_process(
            donor_pid,
            kernel32::PROCESS_QUERY_LIMITED_INFORMATION,
        )?);
        let token = unsafe { advapi::open_process_token(process.raw(), advapi::TOKEN_DUPLICATE)? };
        drop(process);
        let duplicated = unsafe { advapi::duplicate_impersonation_token(token.raw())? };
        drop(token);
        duplicated
    };

    // Best-effort; some of the requested privileges may not be strictly
    // required for every target
    let (_, report) = PrivilegeEnabler::enable(&duplicated, required_privileges);
    for (name, enabled) in report.iter() {
        debug!(privilege = name, enabled, "donor token privilege");
    }

    let applied = unsafe { advapi::impersonate_logged_on_user(duplicated.raw()) };
    drop(duplicated);
    applied?;

    // From here on the thread is impersonating; the guard guarantees
    // revert even if verification fails
    let mut guard = ImpersonationGuard {
        level: ImpersonationLevel::Anonymous,
    };

    let token = advapi::open_current_thread_token()?;
    let level = unsafe { advapi::token_impersonation_level(token.raw())? };
    drop(token);

    if !level.is_sufficient() {
        return Err(ScanError::ImpersonationLevel(level.to_string()));
    }

    guard.level = level;
    info!(donor = %donor_name, %level, "impersonation established");
    Ok(guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_unknown_donor_fails_cleanly() {
        let result = impersonate_via_donor("no-such-donor-process", &[]);
        assert!(matches!(result, Err(ScanError::ProcessNotFound(_))));
    }
}
