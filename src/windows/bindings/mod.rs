//! Windows API bindings
//!
//! Low-level FFI bindings to Windows system libraries. All unsafe calls
//! are contained here behind thin wrappers with error handling.

pub mod advapi;
pub mod kernel32;
pub mod ntdll;
