//! Token privilege enablement

use super::PrivilegeReport;
use crate::windows::bindings::advapi;
use crate::windows::types::OwnedHandle;
use tracing::{debug, warn};
use winapi::um::processthreadsapi::GetCurrentProcess;
use winapi::um::winnt::SE_PRIVILEGE_ENABLED;

/// Enables named privileges on a token, one adjustment per privilege.
pub struct PrivilegeEnabler;

impl PrivilegeEnabler {
    /// Enable each of `required` on `token`.
    ///
    /// Returns the overall outcome plus the per-privilege report. An empty
    /// request trivially succeeds without touching the token. If the
    /// token's privilege set cannot be queried at all, the whole operation
    /// fails with an empty report. A privilege the token does not hold is
    /// recorded as failed, but enabling continues for the rest.
    pub fn enable(token: &OwnedHandle, required: &[String]) -> (bool, PrivilegeReport) {
        let mut report = PrivilegeReport::new();

        if required.is_empty() {
            return (true, report);
        }

        let held = match unsafe { advapi::token_privilege_attributes(token.raw()) } {
            Ok(held) => held,
            Err(err) => {
                warn!(%err, "token privilege query failed");
                return (false, report);
            }
        };

        let mut all_enabled = true;

        for name in required {
            let held_entry = held
                .iter()
                .find(|(held_name, _)| held_name.eq_ignore_ascii_case(name));

            let enabled = match held_entry {
                Some((_, &attributes)) if attributes & SE_PRIVILEGE_ENABLED != 0 => true,
                Some((held_name, _)) => Self::adjust(token, held_name),
                None => {
                    debug!(privilege = %name, "not held by token");
                    false
                }
            };

            if !enabled {
                all_enabled = false;
            }
            report.record(name.clone(), enabled);
        }

        (all_enabled, report)
    }

    /// Enable privileges on the current process's own token.
    pub fn enable_for_current_process(required: &[String]) -> (bool, PrivilegeReport) {
        let token = unsafe {
            advapi::open_process_token(
                GetCurrentProcess(),
                advapi::TOKEN_QUERY | advapi::TOKEN_ADJUST_PRIVILEGES,
            )
        };

        match token {
            Ok(token) => Self::enable(&token, required),
            Err(err) => {
                warn!(%err, "failed to open own process token");
                (false, PrivilegeReport::new())
            }
        }
    }

    /// Single-privilege adjustment: LUID lookup then one
    /// AdjustTokenPrivileges call checked for residual errors.
    fn adjust(token: &OwnedHandle, name: &str) -> bool {
        match advapi::lookup_privilege_value(name) {
            Ok(luid) => {
                let applied = unsafe { advapi::enable_single_privilege(token.raw(), luid) };
                if !applied {
                    debug!(privilege = %name, "adjustment not applied");
                }
                applied
            }
            Err(err) => {
                debug!(privilege = %name, %err, "LUID lookup failed");
                false
            }
        }
    }
}
