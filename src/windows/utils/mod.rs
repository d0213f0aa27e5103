//! Windows helper utilities

pub mod string_conv;

pub use string_conv::{string_to_wide, strip_extended_prefix, wide_to_string};
