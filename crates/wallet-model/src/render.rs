//! Indentation-aware key/value rendering shared by the entity `Display`
//! impls. Debug aid only; nothing parses this output.

use std::fmt::Display;

const INDENT: &str = "  ";

pub(crate) fn kv_line(key: impl Display, value: &str, indent: usize) -> String {
    format!("{}{}: {}\n", INDENT.repeat(indent), key, value)
}

/// Renders an optional field, `-` for absent.
pub(crate) fn opt<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".to_string(),
    }
}

/// Strips the single trailing newline the line helpers always leave.
pub(crate) fn trim_trailing(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
    }
    s
}
