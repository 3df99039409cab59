//! Comment leaders and closing fences

/// Line-comment leaders, longest first
const LINE_LEADERS: [&str; 6] = ["///", "//!", "//", "#", "--", "*"];

/// Block openers stripped from the line they appear on
const OPENERS: [&str; 4] = ["/**", "/*", "\"\"\"", "'''"];

/// Closers that end a body when they close a line
const CLOSERS: [&str; 3] = ["*/", "\"\"\"", "'''"];

/// How a line's comment syntax begins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Leader {
    /// Line comment marker repeated on every line (`//`, `#`, ` *`)
    Line(&'static str),
    /// Block opener; continuation lines carry no required leader
    Opener,
    /// Bare text (docstring interior)
    None,
}

/// Split a line into its leader and the remaining text
pub fn split_leader(line: &str) -> (Leader, &str) {
    let trimmed = line.trim_start();
    if let Some(rest) = OPENERS.iter().find_map(|o| trimmed.strip_prefix(o)) {
        return (Leader::Opener, rest);
    }
    // `*/` is a closer, not a `*` leader
    if trimmed.starts_with("*/") {
        return (Leader::None, trimmed);
    }
    for leader in LINE_LEADERS {
        if let Some(rest) = trimmed.strip_prefix(leader) {
            return (Leader::Line(leader), rest);
        }
    }
    (Leader::None, trimmed)
}

/// Strip a trailing block closer, if any
pub fn strip_closer(text: &str) -> (&str, bool) {
    let trimmed = text.trim_end();
    for closer in CLOSERS {
        if let Some(before) = trimmed.strip_suffix(closer) {
            return (before, true);
        }
    }
    (text, false)
}

/// Line that ends a body outright: a bare closer or a YAML document marker
pub fn is_fence(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed == "---"
        || trimmed == "..."
        || CLOSERS.iter().any(|c| trimmed.starts_with(c))
}
