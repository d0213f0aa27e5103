//! Live-OS smoke tests: scan the current process end to end
#![cfg(windows)]

use handle_audit::output::filter_entries;
use handle_audit::privileges::PrivilegeEnabler;
use handle_audit::process::{pid_by_name, process_name_by_pid, ProcessEnumerator};
use handle_audit::windows::{handles_for_process, object_type_table, system_handle_snapshot, NativeInspector};
use handle_audit::{ObjectNameResolver, ScanError};

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_snapshot_contains_current_process() {
    let pid = std::process::id();
    let snapshot = system_handle_snapshot().unwrap();
    assert!(!snapshot.is_empty());
    assert!(snapshot.iter().any(|entry| entry.owner_pid == pid));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_handles_for_process_filters_by_owner() {
    let pid = std::process::id();
    let entries = handles_for_process(pid).unwrap();
    assert!(!entries.is_empty());
    assert!(entries.iter().all(|entry| entry.owner_pid == pid));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_type_table_has_core_kinds() {
    let types = object_type_table().unwrap();
    assert!(!types.is_empty());
    let names: Vec<&str> = types.iter().map(|(_, name)| name).collect();
    assert!(names.contains(&"File"));
    assert!(names.contains(&"Process"));
    assert!(names.contains(&"Thread"));
    assert!(names.contains(&"Token"));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_self_scan_resolves_something() {
    let pid = std::process::id();
    let types = object_type_table().unwrap();
    let entries = handles_for_process(pid).unwrap();
    let filtered = filter_entries(&entries, &types, "");
    assert!(!filtered.is_empty());

    let inspector = NativeInspector::new();
    let names = ObjectNameResolver::new(&inspector).resolve(pid, &filtered);

    // every filtered entry gets a row, and scanning ourselves should
    // resolve at least one object
    assert_eq!(names.len(), filtered.len());
    assert!(names.named_count() > 0);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_empty_privilege_list_is_trivially_enabled() {
    let (all_enabled, report) = PrivilegeEnabler::enable_for_current_process(&[]);
    assert!(all_enabled);
    assert!(report.is_empty());
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_unheld_privilege_reported_disabled() {
    // SeCreateTokenPrivilege is never held by a normal test process
    let required = vec!["SeCreateTokenPrivilege".to_string()];
    let (all_enabled, report) = PrivilegeEnabler::enable_for_current_process(&required);
    assert!(!all_enabled);
    assert_eq!(report.get("SeCreateTokenPrivilege"), Some(false));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_process_enumeration_sees_self() {
    let pid = std::process::id();
    let records: Vec<_> = ProcessEnumerator::new().unwrap().collect();
    assert!(records.iter().any(|record| record.pid == pid));

    let name = process_name_by_pid(pid).unwrap();
    assert!(!name.is_empty());
    assert_eq!(pid_by_name(&name).unwrap(), pid);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_missing_process_is_not_found() {
    let result = pid_by_name("no-such-process-name.exe");
    assert!(matches!(result, Err(ScanError::ProcessNotFound(_))));
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn test_scan_of_exited_pid_yields_placeholders() {
    // pid 0 is the idle process; opening it for duplication always fails,
    // so a scan against it must degrade to all-unresolved, not error
    let types = object_type_table().unwrap();
    let entries = handles_for_process(std::process::id()).unwrap();
    let filtered = filter_entries(&entries[..1.min(entries.len())], &types, "");

    let inspector = NativeInspector::new();
    let names = ObjectNameResolver::new(&inspector).resolve(0, &filtered);
    assert_eq!(names.named_count(), 0);
}
