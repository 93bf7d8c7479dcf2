//! Removal of empty fields from generated YAML.
//!
//! Templates render optional values as `key: ""` when the value is absent.
//! [`prune_empty_fields`] strips those lines, then strips mapping headers
//! that are left without any non-empty child, and finally collapses runs of
//! blank lines.

/// Drops empty-valued lines and headers whose children were all empty.
///
/// # Rules
///
/// - A line whose trimmed form ends with `: ""` or `: ''` is dropped.
/// - A header is a non-blank, non-comment line that either ends in `:`
///   (with no `: ` inside) or is followed by a more deeply indented,
///   non-blank, non-comment line. A header is dropped when none of the
///   deeper-indented lines below it (up to the first line at or above its
///   indentation) is a non-empty-valued line.
/// - Blank and comment lines never count as children.
/// - Tabs count as two columns of indentation.
///
/// ```
/// use promptsmith::prune_empty_fields;
///
/// let yaml = "title: \"Demo\"\nextra:\n  note: \"\"\n  hint: ''\nend: 1";
/// assert_eq!(prune_empty_fields(yaml), "title: \"Demo\"\nend: 1");
/// ```
pub fn prune_empty_fields(yaml: &str) -> String {
    let lines: Vec<&str> = yaml.split('\n').collect();
    let mut kept: Vec<&str> = Vec::with_capacity(lines.len());

    for (i, line) in lines.iter().enumerate() {
        if is_empty_value(line) {
            continue;
        }
        if is_header(line, lines.get(i + 1).copied()) && !has_live_child(&lines, i) {
            continue;
        }
        kept.push(line);
    }

    collapse_blank_runs(&kept)
}

fn has_live_child(lines: &[&str], header: usize) -> bool {
    let indent = indent_of(lines[header]);
    for child in &lines[header + 1..] {
        if is_blank_or_comment(child) {
            continue;
        }
        if indent_of(child) <= indent {
            return false;
        }
        if !is_empty_value(child) {
            return true;
        }
    }
    false
}

fn is_empty_value(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.ends_with(": \"\"") || trimmed.ends_with(": ''")
}

fn is_header(line: &str, next: Option<&str>) -> bool {
    if is_blank_or_comment(line) {
        return false;
    }
    let trimmed = line.trim();
    if trimmed.ends_with(':') && !trimmed.contains(": ") {
        return true;
    }
    next.is_some_and(|next| !is_blank_or_comment(next) && indent_of(next) > indent_of(line))
}

fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.is_empty() || trimmed.starts_with('#')
}

fn indent_of(line: &str) -> usize {
    let mut width = 0;
    for ch in line.chars() {
        match ch {
            ' ' => width += 1,
            '\t' => width += 2,
            _ => break,
        }
    }
    width
}

fn collapse_blank_runs(lines: &[&str]) -> String {
    let mut out: Vec<&str> = Vec::with_capacity(lines.len());
    let mut previous_blank = false;
    for line in lines {
        let blank = line.trim().is_empty();
        if !(blank && previous_blank) {
            out.push(line);
        }
        previous_blank = blank;
    }
    out.join("\n")
}
