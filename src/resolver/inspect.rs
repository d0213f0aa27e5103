//! Platform seam the resolver works against
//!
//! The Windows implementation lives in `crate::windows::inspector`; tests
//! substitute mocks so the resolution logic runs without a live OS. Handle
//! lifetime is tied to trait-object lifetime: dropping a [`DuplicatedHandle`]
//! or [`TargetProcess`] releases the underlying native handle.

use crate::core::types::{
    ProcessId, ProcessIdentity, ScanResult, ThreadIdentity, TokenIdentity, TokenStatistics,
};

/// Entry point into the platform's object-inspection primitives.
pub trait ObjectInspector {
    /// Open `pid` for handle duplication only.
    ///
    /// Failure here is the one batch-fatal condition of a resolution pass.
    fn open_target(&self, pid: ProcessId) -> ScanResult<Box<dyn TargetProcess + '_>>;

    /// Best-effort lookup of a process name by id, used for the thread
    /// strategy. A transient failure (owner already exited) is `None`,
    /// never an error.
    fn process_name(&self, pid: ProcessId) -> Option<String>;
}

/// A process opened for handle duplication.
pub trait TargetProcess {
    /// Duplicate `handle_value` out of the target into our context,
    /// requesting exactly `access` — not "same access", not maximum
    /// allowed. Some object types refuse queries unless the original
    /// rights profile is preserved.
    fn duplicate(&self, handle_value: u64, access: u32)
        -> ScanResult<Box<dyn DuplicatedHandle + '_>>;
}

/// A handle duplicated into our context, queried per object kind.
///
/// Every query is best-effort: `None` (or an empty record) means the
/// name-query failed, which is tolerated and contributes at most a partial
/// name.
pub trait DuplicatedHandle {
    /// Final canonical path for file-like objects
    fn file_name(&self) -> Option<String>;

    /// Image path and owning pid for process objects
    fn process_identity(&self) -> ProcessIdentity;

    /// Owning pid and thread id for thread objects
    fn thread_identity(&self) -> Option<ThreadIdentity>;

    /// Account identity for token objects
    fn token_user(&self) -> Option<TokenIdentity>;

    /// Statistics for token objects
    fn token_statistics(&self) -> Option<TokenStatistics>;

    /// Generic kernel object name for everything else
    fn object_name(&self) -> Option<String>;
}
