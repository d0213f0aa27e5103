//! Display-string composition rules for the four special-cased kinds
//!
//! Pure functions so the exact fallback behavior stays testable without a
//! live handle.

use crate::core::types::{ProcessIdentity, TokenIdentity, TokenStatistics};

/// Strip a Windows path down to its base name.
fn base_name(path: &str) -> &str {
    path.rsplit(['\\', '/']).next().unwrap_or(path)
}

/// A process name the way the task list shows it: the executable name
/// without a trailing `.exe`, case-insensitive.
pub fn friendly_process_name(name: &str) -> &str {
    if name.len() > 4
        && name
            .get(name.len() - 4..)
            .is_some_and(|suffix| suffix.eq_ignore_ascii_case(".exe"))
    {
        &name[..name.len() - 4]
    } else {
        name
    }
}

/// Compose the display string for a process object.
///
/// Each half falls back independently: name-only, pid-only, or neither,
/// the last meaning unresolved.
pub fn compose_process_name(identity: &ProcessIdentity) -> Option<String> {
    let name = identity
        .image_path
        .as_deref()
        .map(base_name)
        .filter(|n| !n.is_empty());

    match (name, identity.pid) {
        (Some(name), Some(pid)) => Some(format!("{} (PID: {})", name, pid)),
        (None, Some(pid)) => Some(format!("N/A (PID: {})", pid)),
        (Some(name), None) => Some(format!("{} (PID: N/A)", name)),
        (None, None) => None,
    }
}

/// Compose the display string for a thread object.
///
/// The owner name comes from the process snapshot as an executable name
/// (`svchost.exe`) and is displayed without the suffix (`svchost`).
/// Deliberately produces nothing when the owning process name is
/// unavailable, even though both ids are known; there is no pid/tid-only
/// fallback the way the process case has one.
pub fn compose_thread_name(
    owner_name: Option<&str>,
    owner_pid: u32,
    thread_id: u32,
) -> Option<String> {
    let owner = owner_name.filter(|n| !n.is_empty())?;
    Some(format!(
        "{} (PID: {}, TID: {})",
        friendly_process_name(owner),
        owner_pid,
        thread_id
    ))
}

/// Compose the display string for a token object.
///
/// Prefers `DOMAIN\account`, falls back to whichever half is present;
/// neither half means unresolved even when statistics are available. The
/// statistics suffix is only appended when the identity resolved.
pub fn compose_token_name(
    identity: &TokenIdentity,
    statistics: Option<&TokenStatistics>,
) -> Option<String> {
    let account = identity.account.as_deref().filter(|s| !s.is_empty());
    let domain = identity.domain.as_deref().filter(|s| !s.is_empty());

    let base = match (domain, account) {
        (Some(domain), Some(account)) => format!("{}\\{}", domain, account),
        (None, Some(account)) => account.to_string(),
        (Some(domain), None) => domain.to_string(),
        (None, None) => return None,
    };

    match statistics {
        Some(stats) => Some(format!(
            "{} (AuthId: 0x{:x}, Type: {})",
            base, stats.auth_id, stats.kind
        )),
        None => Some(base),
    }
}
