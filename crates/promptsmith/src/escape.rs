//! Text helpers for values placed inside quoted YAML scalars.

use std::path::Path;

/// Escapes backslashes and double quotes for a double-quoted YAML scalar.
///
/// ```
/// assert_eq!(promptsmith::escape_yaml(r#"say "hi" \o/"#), r#"say \"hi\" \\o/"#);
/// ```
pub fn escape_yaml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(ch),
        }
    }
    out
}

/// Folds a multi-line description into one comma-separated line.
///
/// Lines are trimmed, empty lines dropped, and the result is escaped with
/// [`escape_yaml`].
pub fn newlines_to_comma(s: &str) -> String {
    let joined = s
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ");
    escape_yaml(&joined)
}

/// Returns the last component of a path, or an empty string.
pub fn file_name(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
