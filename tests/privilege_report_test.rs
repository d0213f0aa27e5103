//! Privilege report accounting and impersonation-level gating

use handle_audit::{ImpersonationLevel, PrivilegeReport};

#[test]
fn test_empty_report_counts_as_all_enabled() {
    let report = PrivilegeReport::new();
    assert!(report.all_enabled());
    assert!(report.is_empty());
    assert_eq!(report.len(), 0);
}

#[test]
fn test_one_disabled_privilege_fails_the_set() {
    let mut report = PrivilegeReport::new();
    report.record("SeDebugPrivilege", true);
    report.record("SeBackupPrivilege", false);

    assert!(!report.all_enabled());
    assert_eq!(report.get("SeDebugPrivilege"), Some(true));
    assert_eq!(report.get("SeBackupPrivilege"), Some(false));
    assert_eq!(report.get("SeTcbPrivilege"), None);
}

#[test]
fn test_re_recording_updates_in_place() {
    let mut report = PrivilegeReport::new();
    report.record("SeDebugPrivilege", false);
    report.record("SeDebugPrivilege", true);

    assert_eq!(report.len(), 1);
    assert!(report.all_enabled());
}

#[test]
fn test_iteration_is_name_ordered() {
    let mut report = PrivilegeReport::new();
    report.record("SeTcbPrivilege", true);
    report.record("SeBackupPrivilege", true);
    report.record("SeDebugPrivilege", false);

    let names: Vec<&str> = report.iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["SeBackupPrivilege", "SeDebugPrivilege", "SeTcbPrivilege"]
    );
}

#[test]
fn test_impersonation_levels_from_raw() {
    assert_eq!(
        ImpersonationLevel::from_raw(0),
        Some(ImpersonationLevel::Anonymous)
    );
    assert_eq!(
        ImpersonationLevel::from_raw(1),
        Some(ImpersonationLevel::Identification)
    );
    assert_eq!(
        ImpersonationLevel::from_raw(2),
        Some(ImpersonationLevel::Impersonation)
    );
    assert_eq!(
        ImpersonationLevel::from_raw(3),
        Some(ImpersonationLevel::Delegation)
    );
    assert_eq!(ImpersonationLevel::from_raw(4), None);
    assert_eq!(ImpersonationLevel::from_raw(-1), None);
}

#[test]
fn test_only_impersonation_and_delegation_suffice() {
    assert!(!ImpersonationLevel::Anonymous.is_sufficient());
    assert!(!ImpersonationLevel::Identification.is_sufficient());
    assert!(ImpersonationLevel::Impersonation.is_sufficient());
    assert!(ImpersonationLevel::Delegation.is_sufficient());
}
