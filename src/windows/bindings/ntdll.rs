//! NTDLL.dll bindings for handle duplication and object queries

use crate::core::types::{ScanError, ScanResult, ThreadIdentity};
use crate::windows::utils::string_conv::counted_wide_to_string;
use std::mem;
use winapi::shared::minwindef::ULONG;
use winapi::shared::ntdef::{NTSTATUS, PVOID};
use winapi::um::processthreadsapi::GetCurrentProcess;
use winapi::um::winnt::HANDLE;

// NT status codes
pub const STATUS_SUCCESS: NTSTATUS = 0x00000000;
pub const STATUS_BUFFER_OVERFLOW: NTSTATUS = 0x80000005_u32 as i32;
pub const STATUS_INFO_LENGTH_MISMATCH: NTSTATUS = 0xC0000004_u32 as i32;
pub const STATUS_BUFFER_TOO_SMALL: NTSTATUS = 0xC0000023_u32 as i32;
pub const STATUS_ACCESS_DENIED: NTSTATUS = 0xC0000022_u32 as i32;

/// Object information classes for NtQueryObject
#[repr(u32)]
pub enum ObjectInfoClass {
    ObjectNameInformation = 1,
    ObjectTypesInformation = 3,
}

/// System information classes for NtQuerySystemInformation
#[repr(u32)]
pub enum SystemInfoClass {
    SystemExtendedHandleInformation = 64,
}

/// Counted UTF-16 string as the kernel reports it
#[repr(C)]
pub struct UnicodeString {
    pub length: u16,
    pub maximum_length: u16,
    pub buffer: *mut u16,
}

impl UnicodeString {
    /// Decode into an owned string; empty when the buffer is null or empty
    ///
    /// # Safety
    /// The buffer must be valid for `length` bytes
    pub unsafe fn to_string(&self) -> String {
        counted_wide_to_string(self.buffer, self.length)
    }
}

/// CLIENT_ID from thread basic information
#[repr(C)]
pub struct ClientId {
    pub unique_process: usize,
    pub unique_thread: usize,
}

/// Basic process information structure
#[repr(C)]
pub struct ProcessBasicInfo {
    pub exit_status: NTSTATUS,
    pub peb_base_address: PVOID,
    pub affinity_mask: usize,
    pub base_priority: i32,
    pub unique_process_id: usize,
    pub inherited_from_unique_process_id: usize,
}

/// Basic thread information structure
#[repr(C)]
pub struct ThreadBasicInfo {
    pub exit_status: NTSTATUS,
    pub teb_base_address: PVOID,
    pub client_id: ClientId,
    pub affinity_mask: usize,
    pub priority: i32,
    pub base_priority: i32,
}

#[link(name = "ntdll")]
extern "system" {
    fn NtDuplicateObject(
        source_process_handle: HANDLE,
        source_handle: HANDLE,
        target_process_handle: HANDLE,
        target_handle: *mut HANDLE,
        desired_access: ULONG,
        handle_attributes: ULONG,
        options: ULONG,
    ) -> NTSTATUS;

    fn NtQueryObject(
        handle: HANDLE,
        object_info_class: ULONG,
        object_info: PVOID,
        object_info_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;

    fn NtQueryInformationProcess(
        process_handle: HANDLE,
        process_info_class: ULONG,
        process_info: PVOID,
        process_info_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;

    fn NtQueryInformationThread(
        thread_handle: HANDLE,
        thread_info_class: ULONG,
        thread_info: PVOID,
        thread_info_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;

    pub(crate) fn NtQuerySystemInformation(
        system_info_class: ULONG,
        system_info: PVOID,
        system_info_length: ULONG,
        return_length: *mut ULONG,
    ) -> NTSTATUS;
}

/// Check if an NTSTATUS indicates success
pub fn nt_success(status: NTSTATUS) -> bool {
    status >= 0
}

/// Raw NtQueryObject call, used by the enumeration layer for the
/// object-types table walk.
///
/// # Safety
/// `object_info` must be valid for `object_info_length` bytes
pub(crate) unsafe fn nt_query_object(
    handle: HANDLE,
    object_info_class: ULONG,
    object_info: PVOID,
    object_info_length: ULONG,
    return_length: *mut ULONG,
) -> NTSTATUS {
    NtQueryObject(
        handle,
        object_info_class,
        object_info,
        object_info_length,
        return_length,
    )
}

/// Duplicate `handle_value` out of `source_process` into our own context,
/// requesting exactly `desired_access`.
///
/// # Safety
/// `source_process` must be a valid process handle with PROCESS_DUP_HANDLE
pub unsafe fn duplicate_object(
    source_process: HANDLE,
    handle_value: u64,
    desired_access: u32,
) -> ScanResult<HANDLE> {
    let mut duplicated: HANDLE = std::ptr::null_mut();

    let status = NtDuplicateObject(
        source_process,
        handle_value as HANDLE,
        GetCurrentProcess(),
        &mut duplicated,
        desired_access,
        0,
        0,
    );

    if status == STATUS_SUCCESS {
        Ok(duplicated)
    } else {
        Err(ScanError::duplication_failed(handle_value, status))
    }
}

/// Query the generic kernel object name from a handle.
///
/// # Safety
/// The handle must be a valid object handle
pub unsafe fn object_name(handle: HANDLE) -> Option<String> {
    let mut buffer = vec![0u8; 1024];
    let mut return_length: ULONG = 0;

    loop {
        let status = NtQueryObject(
            handle,
            ObjectInfoClass::ObjectNameInformation as ULONG,
            buffer.as_mut_ptr() as PVOID,
            buffer.len() as ULONG,
            &mut return_length,
        );

        match status {
            STATUS_SUCCESS => break,
            STATUS_INFO_LENGTH_MISMATCH | STATUS_BUFFER_OVERFLOW | STATUS_BUFFER_TOO_SMALL
                if return_length as usize > buffer.len() =>
            {
                buffer = vec![0u8; return_length as usize];
            }
            _ => return None,
        }
    }

    // OBJECT_NAME_INFORMATION is a single UNICODE_STRING
    let name_info = &*(buffer.as_ptr() as *const UnicodeString);
    let name = name_info.to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Query basic process information from a process handle.
///
/// # Safety
/// The handle must be a valid process handle
pub unsafe fn process_basic_information(handle: HANDLE) -> ScanResult<ProcessBasicInfo> {
    let mut info: ProcessBasicInfo = mem::zeroed();
    let mut return_length: ULONG = 0;

    // ProcessBasicInformation = 0
    let status = NtQueryInformationProcess(
        handle,
        0,
        &mut info as *mut _ as PVOID,
        mem::size_of::<ProcessBasicInfo>() as ULONG,
        &mut return_length,
    );

    if nt_success(status) {
        Ok(info)
    } else {
        Err(ScanError::WindowsApi(format!(
            "NtQueryInformationProcess failed with status 0x{:08X}",
            status as u32
        )))
    }
}

/// Query basic thread information from a thread handle.
///
/// # Safety
/// The handle must be a valid thread handle
pub unsafe fn thread_basic_information(handle: HANDLE) -> ScanResult<ThreadIdentity> {
    let mut info: ThreadBasicInfo = mem::zeroed();
    let mut return_length: ULONG = 0;

    // ThreadBasicInformation = 0
    let status = NtQueryInformationThread(
        handle,
        0,
        &mut info as *mut _ as PVOID,
        mem::size_of::<ThreadBasicInfo>() as ULONG,
        &mut return_length,
    );

    if nt_success(status) {
        Ok(ThreadIdentity {
            owner_pid: info.client_id.unique_process as u32,
            thread_id: info.client_id.unique_thread as u32,
        })
    } else {
        Err(ScanError::WindowsApi(format!(
            "NtQueryInformationThread failed with status 0x{:08X}",
            status as u32
        )))
    }
}
