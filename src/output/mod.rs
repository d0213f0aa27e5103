//! Result filtering and presentation

pub mod filter;
pub mod report;
pub mod table;

pub use filter::filter_entries;
pub use report::{build_report, ReportRow, ScanReport};
pub use table::{render_table, MSG_NO_ENTRIES, MSG_NO_ENTRIES_OR_DENIED};
