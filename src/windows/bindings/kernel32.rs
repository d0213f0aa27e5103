//! Kernel32.dll bindings for process and file-handle operations

use crate::core::types::{ScanError, ScanResult};
use crate::windows::utils::string_conv::{strip_extended_prefix, wide_to_string};
use winapi::shared::minwindef::{DWORD, FALSE};
use winapi::um::fileapi::GetFinalPathNameByHandleW;
use winapi::um::processthreadsapi::OpenProcess;
use winapi::um::winbase::QueryFullProcessImageNameW;
use winapi::um::winnt::HANDLE;

/// PROCESS_DUP_HANDLE access right
pub const PROCESS_DUP_HANDLE: u32 = 0x0040;
/// PROCESS_QUERY_LIMITED_INFORMATION access right
pub const PROCESS_QUERY_LIMITED_INFORMATION: u32 = 0x1000;

/// Safe wrapper for OpenProcess
pub fn open_process(pid: u32, desired_access: u32) -> ScanResult<HANDLE> {
    unsafe {
        let handle = OpenProcess(desired_access, FALSE, pid);
        if handle.is_null() {
            Err(ScanError::process_open_failed(
                pid,
                ScanError::last_os_error().to_string(),
            ))
        } else {
            Ok(handle)
        }
    }
}

/// Query the final canonical path behind a file handle.
///
/// Returns `None` for unnamed file-like objects (pipes without names,
/// mailslots) where the query fails.
///
/// # Safety
/// The handle must be a valid file handle
pub unsafe fn final_path_by_handle(handle: HANDLE) -> Option<String> {
    let mut buffer = vec![0u16; 1024];
    let len = GetFinalPathNameByHandleW(handle, buffer.as_mut_ptr(), buffer.len() as DWORD, 0);

    if len == 0 {
        return None;
    }

    if len as usize > buffer.len() {
        buffer = vec![0u16; len as usize];
        let len = GetFinalPathNameByHandleW(handle, buffer.as_mut_ptr(), buffer.len() as DWORD, 0);
        if len == 0 {
            return None;
        }
    }

    let path = wide_to_string(&buffer);
    if path.is_empty() {
        None
    } else {
        Some(strip_extended_prefix(&path).to_string())
    }
}

/// Query the full image path of a process from its handle.
///
/// # Safety
/// The handle must be a valid process handle
pub unsafe fn process_image_path(handle: HANDLE) -> Option<String> {
    let mut buffer = vec![0u16; 1024];
    let mut len = buffer.len() as DWORD;

    if QueryFullProcessImageNameW(handle, 0, buffer.as_mut_ptr(), &mut len) == FALSE {
        return None;
    }

    let path = wide_to_string(&buffer[..len as usize]);
    if path.is_empty() {
        None
    } else {
        Some(path)
    }
}
