//! Advapi32.dll bindings for token and impersonation operations

use crate::core::types::{ScanError, ScanResult, TokenIdentity, TokenKind, TokenStatistics};
use crate::privileges::ImpersonationLevel;
use crate::windows::types::OwnedHandle;
use crate::windows::utils::string_conv::{string_to_wide, wide_to_string};
use std::collections::HashMap;
use std::mem;
use winapi::shared::minwindef::{DWORD, FALSE, TRUE};
use winapi::shared::winerror::ERROR_INSUFFICIENT_BUFFER;
use winapi::um::errhandlingapi::{GetLastError, SetLastError};
use winapi::um::processthreadsapi::{
    GetCurrentThread, OpenProcessToken, OpenThreadToken,
};
use winapi::um::securitybaseapi::{
    AdjustTokenPrivileges, DuplicateTokenEx, GetTokenInformation, ImpersonateLoggedOnUser,
    RevertToSelf,
};
use winapi::um::winbase::{LookupAccountSidW, LookupPrivilegeNameW, LookupPrivilegeValueW};
use winapi::um::winnt::{
    TokenImpersonation, TokenImpersonationLevel, TokenPrivileges, TokenStatistics as
    TokenStatisticsClass, TokenUser, HANDLE, LUID, LUID_AND_ATTRIBUTES, PSID,
    SECURITY_IMPERSONATION_LEVEL, SE_PRIVILEGE_ENABLED, SID_NAME_USE, TOKEN_PRIVILEGES,
    TOKEN_STATISTICS, TOKEN_USER,
};

/// MAXIMUM_ALLOWED access request
pub const MAXIMUM_ALLOWED: u32 = 0x0200_0000;
/// TOKEN_DUPLICATE access right
pub const TOKEN_DUPLICATE: u32 = 0x0002;
/// TOKEN_QUERY access right
pub const TOKEN_QUERY: u32 = 0x0008;
/// TOKEN_ADJUST_PRIVILEGES access right
pub const TOKEN_ADJUST_PRIVILEGES: u32 = 0x0020;
/// SECURITY_IMPERSONATION_LEVEL value SecurityImpersonation
pub const SECURITY_IMPERSONATION: SECURITY_IMPERSONATION_LEVEL = 2;

/// Open a process's primary token.
///
/// # Safety
/// `process` must be a valid process handle
pub unsafe fn open_process_token(process: HANDLE, desired_access: u32) -> ScanResult<OwnedHandle> {
    let mut token: HANDLE = std::ptr::null_mut();
    if OpenProcessToken(process, desired_access, &mut token) == FALSE {
        Err(ScanError::TokenOperation(format!(
            "OpenProcessToken failed: {}",
            ScanError::last_os_error()
        )))
    } else {
        Ok(OwnedHandle::new(token))
    }
}

/// Open the calling thread's impersonation token for query.
pub fn open_current_thread_token() -> ScanResult<OwnedHandle> {
    let mut token: HANDLE = std::ptr::null_mut();
    // OpenAsSelf so the query runs with the process identity even while
    // the thread is impersonating
    let ok = unsafe { OpenThreadToken(GetCurrentThread(), TOKEN_QUERY, TRUE, &mut token) };
    if ok == FALSE {
        Err(ScanError::TokenOperation(format!(
            "OpenThreadToken failed: {}",
            ScanError::last_os_error()
        )))
    } else {
        Ok(OwnedHandle::new(token))
    }
}

/// Duplicate a token into a new impersonation token at the
/// SecurityImpersonation level with maximum allowed access.
///
/// # Safety
/// `token` must be a valid token handle with TOKEN_DUPLICATE
pub unsafe fn duplicate_impersonation_token(token: HANDLE) -> ScanResult<OwnedHandle> {
    let mut duplicated: HANDLE = std::ptr::null_mut();
    let ok = DuplicateTokenEx(
        token,
        MAXIMUM_ALLOWED,
        std::ptr::null_mut(),
        SECURITY_IMPERSONATION,
        TokenImpersonation,
        &mut duplicated,
    );

    if ok == FALSE {
        Err(ScanError::TokenOperation(format!(
            "DuplicateTokenEx failed: {}",
            ScanError::last_os_error()
        )))
    } else {
        Ok(OwnedHandle::new(duplicated))
    }
}

/// Apply a token to the calling thread as its impersonation token.
///
/// # Safety
/// `token` must be a valid impersonation token
pub unsafe fn impersonate_logged_on_user(token: HANDLE) -> ScanResult<()> {
    if ImpersonateLoggedOnUser(token) == FALSE {
        Err(ScanError::TokenOperation(format!(
            "ImpersonateLoggedOnUser failed: {}",
            ScanError::last_os_error()
        )))
    } else {
        Ok(())
    }
}

/// Drop the calling thread's impersonation token.
pub fn revert_to_self() {
    // Errors are not actionable; the thread either had a token or not
    unsafe {
        RevertToSelf();
    }
}

/// Query the impersonation level of a token.
///
/// # Safety
/// `token` must be a valid token handle with TOKEN_QUERY
pub unsafe fn token_impersonation_level(token: HANDLE) -> ScanResult<ImpersonationLevel> {
    let mut level: SECURITY_IMPERSONATION_LEVEL = 0;
    let mut return_length: DWORD = 0;

    let ok = GetTokenInformation(
        token,
        TokenImpersonationLevel,
        &mut level as *mut _ as *mut _,
        mem::size_of::<SECURITY_IMPERSONATION_LEVEL>() as DWORD,
        &mut return_length,
    );

    if ok == FALSE {
        return Err(ScanError::TokenOperation(format!(
            "TokenImpersonationLevel query failed: {}",
            ScanError::last_os_error()
        )));
    }

    ImpersonationLevel::from_raw(level as i32).ok_or_else(|| {
        ScanError::TokenOperation(format!("unknown impersonation level {}", level))
    })
}

/// Query a token's full privilege set as a name -> attributes map.
///
/// # Safety
/// `token` must be a valid token handle with TOKEN_QUERY
pub unsafe fn token_privilege_attributes(token: HANDLE) -> ScanResult<HashMap<String, u32>> {
    let buffer = query_token_info_buffer(token, TokenPrivileges)?;
    let privileges = &*(buffer.as_ptr() as *const TOKEN_PRIVILEGES);
    let entries = std::slice::from_raw_parts(
        privileges.Privileges.as_ptr(),
        privileges.PrivilegeCount as usize,
    );

    let mut map = HashMap::with_capacity(entries.len());
    for entry in entries {
        if let Some(name) = lookup_privilege_name(&entry.Luid) {
            map.insert(name, entry.Attributes);
        }
    }
    Ok(map)
}

/// Resolve a privilege name to its LUID.
pub fn lookup_privilege_value(name: &str) -> ScanResult<LUID> {
    let wide_name = string_to_wide(name);
    let mut luid = LUID {
        LowPart: 0,
        HighPart: 0,
    };

    let ok = unsafe { LookupPrivilegeValueW(std::ptr::null(), wide_name.as_ptr(), &mut luid) };
    if ok == FALSE {
        Err(ScanError::PrivilegeQuery(format!(
            "LookupPrivilegeValue({}) failed",
            name
        )))
    } else {
        Ok(luid)
    }
}

/// Apply a single-privilege enable request to a token.
///
/// AdjustTokenPrivileges can report syntactic success while silently
/// failing to apply (ERROR_NOT_ALL_ASSIGNED), so both the return value and
/// the residual error code are checked.
///
/// # Safety
/// `token` must be a valid token handle with TOKEN_ADJUST_PRIVILEGES
pub unsafe fn enable_single_privilege(token: HANDLE, luid: LUID) -> bool {
    let mut request = TOKEN_PRIVILEGES {
        PrivilegeCount: 1,
        Privileges: [LUID_AND_ATTRIBUTES {
            Luid: luid,
            Attributes: SE_PRIVILEGE_ENABLED,
        }],
    };

    SetLastError(0);
    let ok = AdjustTokenPrivileges(
        token,
        FALSE,
        &mut request,
        mem::size_of::<TOKEN_PRIVILEGES>() as DWORD,
        std::ptr::null_mut(),
        std::ptr::null_mut(),
    );

    ok != FALSE && GetLastError() == 0
}

/// Query the account identity behind a token.
///
/// # Safety
/// `token` must be a valid token handle with TOKEN_QUERY
pub unsafe fn token_user(token: HANDLE) -> ScanResult<TokenIdentity> {
    let buffer = query_token_info_buffer(token, TokenUser)?;
    let user = &*(buffer.as_ptr() as *const TOKEN_USER);
    lookup_account_sid(user.User.Sid)
}

/// Query the statistics of a token.
///
/// # Safety
/// `token` must be a valid token handle with TOKEN_QUERY
pub unsafe fn token_statistics(token: HANDLE) -> ScanResult<TokenStatistics> {
    let mut stats: TOKEN_STATISTICS = mem::zeroed();
    let mut return_length: DWORD = 0;

    let ok = GetTokenInformation(
        token,
        TokenStatisticsClass,
        &mut stats as *mut _ as *mut _,
        mem::size_of::<TOKEN_STATISTICS>() as DWORD,
        &mut return_length,
    );

    if ok == FALSE {
        return Err(ScanError::TokenOperation(format!(
            "TokenStatistics query failed: {}",
            ScanError::last_os_error()
        )));
    }

    let auth_id =
        ((stats.AuthenticationId.HighPart as u64) << 32) | stats.AuthenticationId.LowPart as u64;
    let kind = match stats.TokenType {
        2 => TokenKind::Impersonation,
        _ => TokenKind::Primary,
    };

    Ok(TokenStatistics { auth_id, kind })
}

/// Two-call GetTokenInformation pattern for variable-length classes.
unsafe fn query_token_info_buffer(
    token: HANDLE,
    class: winapi::um::winnt::TOKEN_INFORMATION_CLASS,
) -> ScanResult<Vec<u8>> {
    let mut required: DWORD = 0;
    GetTokenInformation(token, class, std::ptr::null_mut(), 0, &mut required);

    if required == 0 || GetLastError() != ERROR_INSUFFICIENT_BUFFER {
        return Err(ScanError::TokenOperation(format!(
            "GetTokenInformation size query failed: {}",
            ScanError::last_os_error()
        )));
    }

    let mut buffer = vec![0u8; required as usize];
    let ok = GetTokenInformation(
        token,
        class,
        buffer.as_mut_ptr() as *mut _,
        required,
        &mut required,
    );

    if ok == FALSE {
        Err(ScanError::TokenOperation(format!(
            "GetTokenInformation failed: {}",
            ScanError::last_os_error()
        )))
    } else {
        Ok(buffer)
    }
}

unsafe fn lookup_privilege_name(luid: &LUID) -> Option<String> {
    let mut buffer = vec![0u16; 128];
    let mut len = buffer.len() as DWORD;

    let ok = LookupPrivilegeNameW(
        std::ptr::null(),
        luid as *const _ as *mut _,
        buffer.as_mut_ptr(),
        &mut len,
    );

    if ok == FALSE {
        None
    } else {
        Some(wide_to_string(&buffer))
    }
}

unsafe fn lookup_account_sid(sid: PSID) -> ScanResult<TokenIdentity> {
    let mut name = vec![0u16; 256];
    let mut name_len = name.len() as DWORD;
    let mut domain = vec![0u16; 256];
    let mut domain_len = domain.len() as DWORD;
    let mut sid_use: SID_NAME_USE = 0;

    let ok = LookupAccountSidW(
        std::ptr::null(),
        sid,
        name.as_mut_ptr(),
        &mut name_len,
        domain.as_mut_ptr(),
        &mut domain_len,
        &mut sid_use,
    );

    if ok == FALSE {
        return Err(ScanError::TokenOperation(format!(
            "LookupAccountSid failed: {}",
            ScanError::last_os_error()
        )));
    }

    let name = wide_to_string(&name);
    let domain = wide_to_string(&domain);
    Ok(TokenIdentity {
        account: (!name.is_empty()).then_some(name),
        domain: (!domain.is_empty()).then_some(domain),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use winapi::um::processthreadsapi::GetCurrentProcess;

    #[test]
    fn test_access_constants() {
        assert_eq!(MAXIMUM_ALLOWED, 0x0200_0000);
        assert_eq!(TOKEN_DUPLICATE | TOKEN_QUERY | TOKEN_ADJUST_PRIVILEGES, 0x2A);
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_own_token_privileges_query() {
        unsafe {
            let token = open_process_token(GetCurrentProcess(), TOKEN_QUERY).unwrap();
            let privileges = token_privilege_attributes(token.raw()).unwrap();
            // every process token carries SeChangeNotifyPrivilege
            assert!(privileges
                .keys()
                .any(|name| name.eq_ignore_ascii_case("SeChangeNotifyPrivilege")));
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_own_token_user() {
        unsafe {
            let token = open_process_token(GetCurrentProcess(), TOKEN_QUERY).unwrap();
            let identity = token_user(token.raw()).unwrap();
            assert!(identity.is_resolved());
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_own_token_statistics() {
        unsafe {
            let token = open_process_token(GetCurrentProcess(), TOKEN_QUERY).unwrap();
            let stats = token_statistics(token.raw()).unwrap();
            assert_eq!(stats.kind, TokenKind::Primary);
        }
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_lookup_unknown_privilege() {
        assert!(lookup_privilege_value("SeNoSuchPrivilege").is_err());
        assert!(lookup_privilege_value("SeDebugPrivilege").is_ok());
    }
}
