//! Windows implementation of the resolver's inspection traits
//!
//! Each layer owns its native handle through [`OwnedHandle`], so the
//! process handle and every duplicated handle are released exactly once
//! when the corresponding trait object drops.

use crate::core::types::{
    ProcessId, ProcessIdentity, ScanResult, ThreadIdentity, TokenIdentity, TokenStatistics,
};
use crate::process::enumerator;
use crate::resolver::inspect::{DuplicatedHandle, ObjectInspector, TargetProcess};
use crate::windows::bindings::{advapi, kernel32, ntdll};
use crate::windows::types::OwnedHandle;

/// Live-OS inspector backing a real scan.
#[derive(Debug, Default)]
pub struct NativeInspector;

impl NativeInspector {
    pub fn new() -> Self {
        NativeInspector
    }
}

impl ObjectInspector for NativeInspector {
    fn open_target(&self, pid: ProcessId) -> ScanResult<Box<dyn TargetProcess + '_>> {
        let raw = kernel32::open_process(pid, kernel32::PROCESS_DUP_HANDLE)?;
        Ok(Box::new(NativeTarget {
            process: OwnedHandle::new(raw),
        }))
    }

    fn process_name(&self, pid: ProcessId) -> Option<String> {
        enumerator::process_name_by_pid(pid)
    }
}

struct NativeTarget {
    process: OwnedHandle,
}

impl TargetProcess for NativeTarget {
    fn duplicate(
        &self,
        handle_value: u64,
        access: u32,
    ) -> ScanResult<Box<dyn DuplicatedHandle + '_>> {
        let raw = unsafe { ntdll::duplicate_object(self.process.raw(), handle_value, access)? };
        Ok(Box::new(NativeDuplicate {
            handle: OwnedHandle::new(raw),
        }))
    }
}

struct NativeDuplicate {
    handle: OwnedHandle,
}

impl DuplicatedHandle for NativeDuplicate {
    fn file_name(&self) -> Option<String> {
        unsafe { kernel32::final_path_by_handle(self.handle.raw()) }
    }

    fn process_identity(&self) -> ProcessIdentity {
        let image_path = unsafe { kernel32::process_image_path(self.handle.raw()) };
        let pid = unsafe {
            ntdll::process_basic_information(self.handle.raw())
                .ok()
                .map(|info| info.unique_process_id as u32)
                .filter(|&pid| pid != 0)
        };
        ProcessIdentity { image_path, pid }
    }

    fn thread_identity(&self) -> Option<ThreadIdentity> {
        unsafe { ntdll::thread_basic_information(self.handle.raw()).ok() }
    }

    fn token_user(&self) -> Option<TokenIdentity> {
        unsafe { advapi::token_user(self.handle.raw()).ok() }
    }

    fn token_statistics(&self) -> Option<TokenStatistics> {
        unsafe { advapi::token_statistics(self.handle.raw()).ok() }
    }

    fn object_name(&self) -> Option<String> {
        unsafe { ntdll::object_name(self.handle.raw()) }
    }
}
