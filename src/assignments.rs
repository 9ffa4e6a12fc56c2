//! Assignment line extraction for pasted macro palettes
//!
//! A palette document declares variables with comment-style assignment lines:
//!
//! ```text
//! // 命中修正 = +2
//! // 武器A命中 = 2d+{冒険者レベル}+{器用}{命中修正}
//! ```
//!
//! Everything up to the first `=` is the name, the remainder is the raw
//! expression. Both sides are trimmed. Later definitions of the same name
//! overwrite earlier ones.

use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

static ASSIGNMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^//\s*([^=]+?)\s*=\s*(.+)$").unwrap());

static NEWLINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\r\n?").unwrap());

/// Error raised when a document has nothing to expand against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignmentError {
    #[error("no assignment definitions (// name = expression) found")]
    Empty,
}

/// Convert CRLF and lone CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    NEWLINE_RE.replace_all(text, "\n").into_owned()
}

/// Variable name -> raw expression, built once per document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentMap {
    entries: HashMap<String, String>,
}

impl AssignmentMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self { entries: HashMap::new() }
    }

    /// Record an assignment, trimming both sides. Overwrites any earlier value.
    pub fn insert(&mut self, name: &str, expression: &str) {
        self.entries.insert(name.trim().to_string(), expression.trim().to_string());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(|s| s.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all (name, expression) pairs in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.entries.iter()
    }
}

/// Parse a single line as an assignment, returning `(name, expression)`.
///
/// Lines are matched as-is; a line with leading whitespace before `//` is not
/// an assignment.
pub fn parse_assignment_line(line: &str) -> Option<(&str, &str)> {
    let caps = ASSIGNMENT_RE.captures(line)?;
    let name = caps.get(1)?.as_str().trim();
    let expression = caps.get(2)?.as_str().trim();
    Some((name, expression))
}

/// Collect every assignment line into an [`AssignmentMap`].
///
/// # Errors
///
/// Returns [`AssignmentError::Empty`] when no line is an assignment.
///
/// # Example
///
/// ```
/// use jetpalette::assignments::parse_assignments;
///
/// let lines = ["// a = 1", "2d 冒険者＋筋力", "// a = 2"];
/// let map = parse_assignments(&lines).unwrap();
/// assert_eq!(map.get("a"), Some("2"));
/// ```
pub fn parse_assignments<S: AsRef<str>>(lines: &[S]) -> Result<AssignmentMap, AssignmentError> {
    let mut map = AssignmentMap::new();
    for line in lines {
        if let Some((name, expression)) = parse_assignment_line(line.as_ref()) {
            map.insert(name, expression);
        }
    }

    if map.is_empty() {
        return Err(AssignmentError::Empty);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\nd"), "a\nb\nc\nd");
        assert_eq!(normalize_newlines("plain"), "plain");
    }

    #[test]
    fn test_parse_line_trims_both_sides() {
        assert_eq!(parse_assignment_line("//  命中修正  =  +2 "), Some(("命中修正", "+2")));
        assert_eq!(parse_assignment_line("//a=b"), Some(("a", "b")));
    }

    #[test]
    fn test_name_stops_at_first_equals() {
        assert_eq!(parse_assignment_line("// a = b = c"), Some(("a", "b = c")));
    }

    #[test]
    fn test_non_assignment_lines() {
        assert_eq!(parse_assignment_line("2d+3 命中"), None);
        assert_eq!(parse_assignment_line("// just a comment"), None);
        assert_eq!(parse_assignment_line("// a ="), None);
        assert_eq!(parse_assignment_line("  // a = 1"), None);
    }

    #[test]
    fn test_last_assignment_wins() {
        let map = parse_assignments(&["// x = 1", "// x = 2"]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("x"), Some("2"));
    }

    #[test]
    fn test_empty_document_is_error() {
        let err = parse_assignments(&["2d 冒険者＋筋力", "", "k20 ダメージ"]).unwrap_err();
        assert_eq!(err, AssignmentError::Empty);
        assert_eq!(err.to_string(), "no assignment definitions (// name = expression) found");
    }

    #[test]
    fn test_accepts_owned_lines() {
        let lines = vec!["// a = {b}".to_string(), "// b = 3".to_string()];
        let map = parse_assignments(&lines).unwrap();
        assert!(map.contains("a"));
        assert_eq!(map.get("b"), Some("3"));
    }
}
