//! Process enumeration using the Windows ToolHelp32 API

use crate::core::types::{ScanError, ScanResult};
use crate::windows::types::OwnedHandle;
use std::mem;
use winapi::shared::minwindef::FALSE;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::tlhelp32::{
    CreateToolhelp32Snapshot, Process32FirstW, Process32NextW, PROCESSENTRY32W,
    TH32CS_SNAPPROCESS,
};

/// One process from a snapshot walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: u32,
    pub name: String,
}

/// Iterator over the processes in one ToolHelp32 snapshot
pub struct ProcessEnumerator {
    snapshot: OwnedHandle,
    first_called: bool,
}

impl ProcessEnumerator {
    /// Take a process snapshot
    pub fn new() -> ScanResult<Self> {
        let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) };
        if snapshot.is_null() || snapshot == INVALID_HANDLE_VALUE {
            return Err(ScanError::EnumerationFailed(
                "CreateToolhelp32Snapshot failed".to_string(),
            ));
        }
        Ok(ProcessEnumerator {
            snapshot: OwnedHandle::new(snapshot),
            first_called: false,
        })
    }

    fn next_record(&mut self) -> Option<ProcessRecord> {
        unsafe {
            let mut entry: PROCESSENTRY32W = mem::zeroed();
            entry.dwSize = mem::size_of::<PROCESSENTRY32W>() as u32;

            let success = if !self.first_called {
                self.first_called = true;
                Process32FirstW(self.snapshot.raw(), &mut entry)
            } else {
                Process32NextW(self.snapshot.raw(), &mut entry)
            };

            if success == FALSE {
                return None;
            }

            let name = {
                let wide = &entry.szExeFile;
                let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
                String::from_utf16_lossy(&wide[..len])
            };

            Some(ProcessRecord {
                pid: entry.th32ProcessID,
                name,
            })
        }
    }
}

impl Iterator for ProcessEnumerator {
    type Item = ProcessRecord;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_record()
    }
}

/// Resolve a process id by executable name, case-insensitive, with or
/// without the `.exe` suffix. The first match in snapshot order wins.
pub fn pid_by_name(name: &str) -> ScanResult<u32> {
    let trimmed = name.trim();
    let matches = |candidate: &str| {
        candidate.eq_ignore_ascii_case(trimmed)
            || candidate
                .to_ascii_lowercase()
                .strip_suffix(".exe")
                .is_some_and(|stem| stem.eq_ignore_ascii_case(trimmed))
    };

    ProcessEnumerator::new()?
        .find(|record| matches(&record.name))
        .map(|record| record.pid)
        .ok_or_else(|| ScanError::ProcessNotFound(name.to_string()))
}

/// Best-effort lookup of a process name by id.
///
/// Returns `None` both when the process is gone and when the snapshot
/// itself fails; callers treat either as "name unavailable".
pub fn process_name_by_pid(pid: u32) -> Option<String> {
    let enumerator = ProcessEnumerator::new().ok()?;
    enumerator
        .into_iter()
        .find(|record| record.pid == pid)
        .map(|record| record.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_snapshot_walk_is_nonempty() {
        let records: Vec<ProcessRecord> = ProcessEnumerator::new().unwrap().collect();
        assert!(!records.is_empty());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_system_process_lookup() {
        // the System pseudo-process is always pid 4
        let name = process_name_by_pid(4);
        assert!(name.is_some());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_pid_by_name_not_found() {
        let result = pid_by_name("no-such-process-name.exe");
        assert!(matches!(result, Err(ScanError::ProcessNotFound(_))));
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_pid_by_name_suffix_insensitive() {
        // smss is always running; resolve it both ways
        let with_suffix = pid_by_name("smss.exe");
        let without_suffix = pid_by_name("smss");
        if let (Ok(a), Ok(b)) = (&with_suffix, &without_suffix) {
            assert_eq!(a, b);
        }
    }
}
