//! Custom error types for handle-audit

use thiserror::Error;

/// Main error type for scan operations
///
/// Fatal conditions surface as `Err`; per-entry conditions (duplication or
/// name-query failures) are swallowed by the resolver and only show up as
/// placeholder entries, never as errors crossing component boundaries.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Process not found: {0}")]
    ProcessNotFound(String),

    #[error("Failed to open process {pid}: {reason}")]
    ProcessOpenFailed { pid: u32, reason: String },

    #[error("Token operation failed: {0}")]
    TokenOperation(String),

    #[error("Failed to query token privileges: {0}")]
    PrivilegeQuery(String),

    #[error("Impersonation level {0} is insufficient")]
    ImpersonationLevel(String),

    #[error("Failed to duplicate handle 0x{handle:X}: status 0x{status:08X}")]
    DuplicationFailed { handle: u64, status: u32 },

    #[error("Handle enumeration failed: {0}")]
    EnumerationFailed(String),

    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApiError(#[from] ::windows::core::Error),

    #[error("Windows API: {0}")]
    WindowsApi(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for scan operations
pub type ScanResult<T> = Result<T, ScanError>;

impl ScanError {
    /// Creates a new Windows API error with the last error code
    #[cfg(windows)]
    pub fn last_os_error() -> Self {
        ScanError::WindowsApiError(::windows::core::Error::from_win32())
    }

    /// Creates a process-open error
    pub fn process_open_failed(pid: u32, reason: impl Into<String>) -> Self {
        ScanError::ProcessOpenFailed {
            pid,
            reason: reason.into(),
        }
    }

    /// Creates a duplication error from an NTSTATUS
    pub fn duplication_failed(handle: u64, status: i32) -> Self {
        ScanError::DuplicationFailed {
            handle,
            status: status as u32,
        }
    }
}
