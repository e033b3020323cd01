//! Identifier and text helpers for generated sources.

/// Whether `name` is exported (starts with an upper-case letter).
pub fn is_exported(name: &str) -> bool { name.chars().next().is_some_and(char::is_uppercase) }

/// Upper-case the first character.
pub fn title(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-case the first character.
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Prefix `name` with `prefix`, keeping the exportedness of `name`.
///
/// `prefix_ident("new", "LoginEvent")` is `NewLoginEvent`,
/// `prefix_ident("new", "loginEvent")` is `newLoginEvent`.
pub fn prefix_ident(prefix: &str, name: &str) -> String {
    if is_exported(name) {
        format!("{}{}", title(prefix), title(name))
    } else {
        format!("{}{}", prefix.to_lowercase(), title(name))
    }
}

/// Trim trailing whitespace from each line, collapse runs of blank lines and
/// drop trailing blank lines.
/// Always ensures the returned string ends with a single newline when not empty.
pub fn clean_generated_source(src: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    for line in src.lines().map(str::trim_end) {
        if line.is_empty() && matches!(lines.last(), Some(prev) if prev.is_empty()) {
            continue;
        }
        lines.push(line);
    }

    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }

    if lines.is_empty() {
        String::new()
    } else {
        format!("{}\n", lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_ident() {
        assert_eq!(prefix_ident("new", "LoginEvent"), "NewLoginEvent");
        assert_eq!(prefix_ident("New", "loginEvent"), "newLoginEvent");
        assert_eq!(prefix_ident("new", "ÉtéEvent"), "NewÉtéEvent");
        assert_eq!(prefix_ident("new", ""), "new");
    }

    #[test]
    fn test_lower_first() {
        assert_eq!(lower_first("LoginEvent"), "loginEvent");
        assert_eq!(lower_first(""), "");
    }

    #[test]
    fn test_clean_generated_source() {
        assert_eq!(clean_generated_source("a  \n\n\n\tb\t\n\n"), "a\n\n\tb\n");
        assert_eq!(clean_generated_source("\n \n"), "");
    }
}
