//! Machine-readable scan report

use crate::core::types::FilteredEntry;
use crate::resolver::{NameTable, PLACEHOLDER};
use serde::Serialize;

/// One row of the scan report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub handle: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub address: String,
    pub access: String,
    /// `None` when the entry did not resolve to a name
    pub name: Option<String>,
}

/// Full scan report for one target process.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub pid: u32,
    pub process: String,
    pub named_count: usize,
    pub rows: Vec<ReportRow>,
}

/// Build the report, honoring the same suppression rule as the table:
/// without `show_all`, unresolved rows are omitted.
pub fn build_report(
    target_pid: u32,
    target_name: &str,
    entries: &[FilteredEntry],
    names: &NameTable,
    show_all: bool,
) -> ScanReport {
    let rows = entries
        .iter()
        .filter(|filtered| show_all || names.is_resolved(filtered.entry.handle_value))
        .map(|filtered| {
            let display = names.display(filtered.entry.handle_value);
            ReportRow {
                handle: format!("0x{:X}", filtered.entry.handle_value),
                type_name: filtered.type_name.clone(),
                address: format!("0x{:016X}", filtered.entry.object_address),
                access: format!("0x{:08X}", filtered.entry.granted_access),
                name: (display != PLACEHOLDER).then(|| display.to_string()),
            }
        })
        .collect();

    ScanReport {
        pid: target_pid,
        process: target_name.to_string(),
        named_count: names.named_count(),
        rows,
    }
}

impl ScanReport {
    /// Serialize as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
