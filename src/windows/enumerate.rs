//! System-wide handle snapshot and object-type table
//!
//! The enumeration services the resolution engine consumes: one snapshot of
//! the system handle table per scan, and the object-type index -> name
//! table, both via NTDLL information classes.

use crate::core::types::{HandleTableEntry, ScanError, ScanResult, TypeTable};
use crate::windows::bindings::ntdll::{
    nt_query_object, nt_success, NtQuerySystemInformation, ObjectInfoClass, SystemInfoClass,
    UnicodeString, STATUS_INFO_LENGTH_MISMATCH,
};
use std::ffi::c_void;
use std::mem;
use tracing::debug;
use winapi::shared::minwindef::ULONG;
use winapi::shared::ntdef::PVOID;

// Snapshot buffers grow geometrically from 1 MiB; a table that still does
// not fit in 256 MiB is treated as an enumeration failure.
const INITIAL_SNAPSHOT_BUFFER: usize = 1024 * 1024;
const MAX_SNAPSHOT_BUFFER: usize = 256 * 1024 * 1024;

#[repr(C)]
struct SystemHandleTableEntryInfoEx {
    object: *mut c_void,
    unique_process_id: usize,
    handle_value: usize,
    granted_access: ULONG,
    creator_back_trace_index: u16,
    object_type_index: u16,
    handle_attributes: ULONG,
    reserved: ULONG,
}

#[repr(C)]
struct SystemHandleInformationEx {
    number_of_handles: usize,
    reserved: usize,
    handles: [SystemHandleTableEntryInfoEx; 1],
}

/// Take one snapshot of the system-wide handle table.
pub fn system_handle_snapshot() -> ScanResult<Vec<HandleTableEntry>> {
    let mut buffer_size = INITIAL_SNAPSHOT_BUFFER;
    let buffer = loop {
        let mut buffer = vec![0u8; buffer_size];
        let mut return_length: ULONG = 0;

        let status = unsafe {
            NtQuerySystemInformation(
                SystemInfoClass::SystemExtendedHandleInformation as ULONG,
                buffer.as_mut_ptr() as PVOID,
                buffer.len() as ULONG,
                &mut return_length,
            )
        };

        if status == STATUS_INFO_LENGTH_MISMATCH {
            buffer_size *= 2;
            if buffer_size > MAX_SNAPSHOT_BUFFER {
                return Err(ScanError::EnumerationFailed(
                    "system handle table exceeds snapshot buffer limit".to_string(),
                ));
            }
            continue;
        }

        if !nt_success(status) {
            return Err(ScanError::EnumerationFailed(format!(
                "NtQuerySystemInformation failed with status 0x{:08X}",
                status as u32
            )));
        }

        break buffer;
    };

    let entries = unsafe {
        let info = &*(buffer.as_ptr() as *const SystemHandleInformationEx);
        let header = mem::size_of::<usize>() * 2;
        let max_entries =
            (buffer.len() - header) / mem::size_of::<SystemHandleTableEntryInfoEx>();
        std::slice::from_raw_parts(
            info.handles.as_ptr(),
            info.number_of_handles.min(max_entries),
        )
    };

    let snapshot: Vec<HandleTableEntry> = entries
        .iter()
        .map(|entry| HandleTableEntry {
            owner_pid: entry.unique_process_id as u32,
            handle_value: entry.handle_value as u64,
            type_index: entry.object_type_index as u32,
            granted_access: entry.granted_access,
            object_address: entry.object as u64,
        })
        .collect();

    debug!(handles = snapshot.len(), "system handle snapshot taken");
    Ok(snapshot)
}

/// Handle-table rows belonging to one process, in snapshot order.
pub fn handles_for_process(pid: u32) -> ScanResult<Vec<HandleTableEntry>> {
    let snapshot = system_handle_snapshot()?;
    Ok(snapshot
        .into_iter()
        .filter(|entry| entry.owner_pid == pid)
        .collect())
}

// OBJECT_TYPE_INFORMATION, x86-64 layout. The TypeName buffer follows each
// record, padded to pointer alignment.
#[repr(C)]
struct ObjectTypeInformation {
    type_name: UnicodeString,
    total_number_of_objects: ULONG,
    total_number_of_handles: ULONG,
    total_paged_pool_usage: ULONG,
    total_non_paged_pool_usage: ULONG,
    total_name_pool_usage: ULONG,
    total_handle_table_usage: ULONG,
    high_water_number_of_objects: ULONG,
    high_water_number_of_handles: ULONG,
    high_water_paged_pool_usage: ULONG,
    high_water_non_paged_pool_usage: ULONG,
    high_water_name_pool_usage: ULONG,
    high_water_handle_table_usage: ULONG,
    invalid_attributes: ULONG,
    generic_mapping: [ULONG; 4],
    valid_access_mask: ULONG,
    security_required: u8,
    maintain_handle_count: u8,
    type_index: u8,
    reserved_byte: i8,
    pool_type: ULONG,
    default_paged_pool_charge: ULONG,
    default_non_paged_pool_charge: ULONG,
}

fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

/// Load the object-type index -> name table.
pub fn object_type_table() -> ScanResult<TypeTable> {
    let mut return_length: ULONG = 0;

    // Size probe; ObjectTypesInformation always reports the needed length
    let status = unsafe {
        nt_query_object(
            std::ptr::null_mut(),
            ObjectInfoClass::ObjectTypesInformation as ULONG,
            std::ptr::null_mut(),
            0,
            &mut return_length,
        )
    };

    if nt_success(status) || return_length == 0 {
        return Err(ScanError::EnumerationFailed(format!(
            "ObjectTypesInformation size probe returned status 0x{:08X}",
            status as u32
        )));
    }

    let mut buffer = vec![0u8; return_length as usize];
    let status = unsafe {
        nt_query_object(
            std::ptr::null_mut(),
            ObjectInfoClass::ObjectTypesInformation as ULONG,
            buffer.as_mut_ptr() as PVOID,
            buffer.len() as ULONG,
            &mut return_length,
        )
    };

    if !nt_success(status) {
        return Err(ScanError::EnumerationFailed(format!(
            "ObjectTypesInformation query failed with status 0x{:08X}",
            status as u32
        )));
    }

    let pointer_align = mem::size_of::<usize>();
    let mut table = TypeTable::new();

    unsafe {
        let base = buffer.as_ptr();
        let number_of_types = *(base as *const ULONG) as usize;
        let mut offset = align_up(mem::size_of::<ULONG>(), pointer_align);

        for _ in 0..number_of_types {
            if offset + mem::size_of::<ObjectTypeInformation>() > buffer.len() {
                break;
            }
            let info = &*(base.add(offset) as *const ObjectTypeInformation);
            let name = info.type_name.to_string();
            if !name.is_empty() {
                table.insert(info.type_index as u32, name);
            }

            offset += mem::size_of::<ObjectTypeInformation>()
                + align_up(info.type_name.maximum_length as usize, pointer_align);
        }
    }

    debug!(types = table.len(), "object type table loaded");
    Ok(table)
}
