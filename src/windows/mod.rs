//! Windows platform layer
//!
//! FFI bindings, RAII handle types, the enumeration services, and the
//! native implementation of the resolver's inspection traits. Nothing
//! outside this module (and `process`/`privileges`) touches raw handles.

pub mod bindings;
pub mod enumerate;
pub mod inspector;
pub mod types;
pub mod utils;

pub use enumerate::{handles_for_process, object_type_table, system_handle_snapshot};
pub use inspector::NativeInspector;
pub use types::OwnedHandle;
