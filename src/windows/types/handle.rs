//! Safe HANDLE wrapper with automatic cleanup

use std::ptr;
use winapi::um::handleapi::CloseHandle;
use winapi::um::winnt::HANDLE;

/// Owned Windows HANDLE with RAII semantics.
///
/// Every native handle the scanner opens (process, token, duplicated
/// object) lives in one of these, so release happens exactly once on every
/// exit path.
pub struct OwnedHandle {
    handle: HANDLE,
}

impl OwnedHandle {
    /// Take ownership of a raw handle
    pub fn new(handle: HANDLE) -> Self {
        OwnedHandle { handle }
    }

    /// Create a null handle
    pub fn null() -> Self {
        OwnedHandle {
            handle: ptr::null_mut(),
        }
    }

    /// Check if handle is null
    pub fn is_null(&self) -> bool {
        self.handle.is_null()
    }

    /// Get the raw handle without giving up ownership
    pub fn raw(&self) -> HANDLE {
        self.handle
    }

    /// Release ownership, preventing automatic cleanup
    pub fn take(mut self) -> HANDLE {
        let handle = self.handle;
        self.handle = ptr::null_mut();
        handle
    }
}

impl Drop for OwnedHandle {
    fn drop(&mut self) {
        if !self.handle.is_null() {
            // Errors on cleanup are not actionable
            unsafe {
                CloseHandle(self.handle);
            }
        }
    }
}

// HANDLEs are process-local
unsafe impl Send for OwnedHandle {}
unsafe impl Sync for OwnedHandle {}
