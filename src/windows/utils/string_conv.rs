//! String conversion utilities for Windows API

use std::ffi::{OsStr, OsString};
use std::os::windows::ffi::{OsStrExt, OsStringExt};

/// Convert a Rust string to a null-terminated wide string (UTF-16)
pub fn string_to_wide(s: &str) -> Vec<u16> {
    OsStr::new(s)
        .encode_wide()
        .chain(std::iter::once(0))
        .collect()
}

/// Convert a wide string (UTF-16) to a Rust string, stopping at the first null
pub fn wide_to_string(wide: &[u16]) -> String {
    let len = wide.iter().position(|&c| c == 0).unwrap_or(wide.len());
    let os_string = OsString::from_wide(&wide[..len]);
    os_string.to_string_lossy().into_owned()
}

/// Decode a counted UNICODE_STRING buffer (no null terminator expected)
///
/// # Safety
/// `buffer` must point to at least `length_bytes` valid bytes of UTF-16 data
pub unsafe fn counted_wide_to_string(buffer: *const u16, length_bytes: u16) -> String {
    if buffer.is_null() || length_bytes == 0 {
        return String::new();
    }
    let slice = std::slice::from_raw_parts(buffer, (length_bytes / 2) as usize);
    String::from_utf16_lossy(slice)
}

/// Strip the `\\?\` extended-length prefix GetFinalPathNameByHandle yields
pub fn strip_extended_prefix(path: &str) -> &str {
    path.strip_prefix(r"\\?\").unwrap_or(path)
}
