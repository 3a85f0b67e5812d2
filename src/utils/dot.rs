//! DOT format helpers for Graphviz output.

/// Escapes a string for use inside a quoted DOT label.
///
/// Handles quotes, backslashes, line breaks and the angle brackets DOT treats
/// as HTML-like label delimiters.
///
/// # Examples
///
/// ```rust,ignore
/// use ssaform::utils::escape_dot;
///
/// assert_eq!(escape_dot("Tag<\"x\">"), "Tag\\<\\\"x\\\"\\>");
/// ```
#[must_use]
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
        .replace('<', "\\<")
        .replace('>', "\\>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_dot_plain() {
        assert_eq!(escape_dot("add"), "add");
    }

    #[test]
    fn test_escape_dot_special() {
        assert_eq!(escape_dot("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_dot("a\\b"), "a\\\\b");
        assert_eq!(escape_dot("l1\r\nl2"), "l1\\nl2");
        assert_eq!(escape_dot("Vec<T>"), "Vec\\<T\\>");
    }
}
