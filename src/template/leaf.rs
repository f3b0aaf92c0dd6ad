//! Leaf templates: constant text, regex leaves and integers

use super::Template;
use crate::cursor::Cursor;
use crate::error::{FabError, Result};
use crate::value::{as_integer, as_text};
use regex::{Captures, Regex};
use serde_json::Value;

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| FabError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Captures of a match starting exactly at the cursor
///
/// Searches the whole text from the cursor offset, so `^` and `\b` see the
/// input that precedes the cursor. The leftmost match starts at the cursor
/// whenever any match does.
fn captures_at_cursor<'a>(regex: &Regex, cursor: &Cursor<'a>) -> Option<Captures<'a>> {
    regex
        .captures_at(cursor.text(), cursor.pos())
        .filter(|caps| caps.get(0).is_some_and(|m| m.start() == cursor.pos()))
}

// ============================================================================
// FIXED
// ============================================================================

/// Constant text
///
/// Fills the same text for any input. Matches the literal text, or a looser
/// accept pattern when one was given (e.g. `" "` that also accepts `" +"`),
/// and surfaces the matched text.
#[derive(Debug, Clone)]
pub struct Fixed {
    text: String,
    accept: Option<Regex>,
}

impl Fixed {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            accept: None,
        }
    }

    /// Fixed text that matches anything `pattern` accepts
    pub fn with_pattern(text: impl Into<String>, pattern: &str) -> Result<Self> {
        Ok(Self {
            text: text.into(),
            accept: Some(compile(pattern)?),
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the accepted text at the cursor, returning it
    pub(crate) fn match_text<'a>(&self, cursor: &mut Cursor<'a>) -> Option<&'a str> {
        let rest = cursor.rest();
        let len = match &self.accept {
            Some(re) => captures_at_cursor(re, cursor)?.get(0)?.len(),
            None if rest.starts_with(self.text.as_str()) => self.text.len(),
            None => return None,
        };
        cursor.advance(len);
        Some(&rest[..len])
    }
}

impl From<&str> for Fixed {
    fn from(text: &str) -> Self {
        Fixed::new(text)
    }
}

impl From<String> for Fixed {
    fn from(text: String) -> Self {
        Fixed::new(text)
    }
}

impl Template for Fixed {
    fn fill(&self, _value: &Value) -> Result<String> {
        Ok(self.text.clone())
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        self.match_text(cursor).map(|s| Value::String(s.to_string()))
    }
}

// ============================================================================
// PATTERN
// ============================================================================

/// Regex-backed string leaf
///
/// Matches the expression at the cursor and surfaces the whole match, or the
/// first capture group when the expression has one. Fills strings unchanged.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    source: String,
    group: usize,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = compile(pattern)?;
        // captures_len counts the implicit whole-match group
        let group = if regex.captures_len() > 1 { 1 } else { 0 };
        Ok(Self {
            regex,
            source: pattern.to_string(),
            group,
        })
    }

    /// The expression as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Consume a match at the cursor, returning the surfaced text
    pub(crate) fn match_text<'a>(&self, cursor: &mut Cursor<'a>) -> Option<&'a str> {
        let caps = captures_at_cursor(&self.regex, cursor)?;
        // A group that sat out the match surfaces nothing
        let surfaced = caps.get(self.group)?.as_str();
        let len = caps.get(0)?.len();
        cursor.advance(len);
        Some(surfaced)
    }
}

impl Template for Pattern {
    fn fill(&self, value: &Value) -> Result<String> {
        Ok(as_text(value, "Pattern")?.unwrap_or_default().to_string())
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        self.match_text(cursor).map(|s| Value::String(s.to_string()))
    }
}

// ============================================================================
// INTEGER
// ============================================================================

/// Base-10 signed integer (`-?[0-9]+`)
///
/// Digits that do not fit an `i64` are a non-match and the cursor is rolled
/// back to where the digits started.
#[derive(Debug, Clone)]
pub struct Integer {
    digits: Pattern,
}

impl Integer {
    pub fn new() -> Self {
        static DIGITS: once_cell::sync::Lazy<Pattern> =
            once_cell::sync::Lazy::new(|| Pattern::new(r"-?[0-9]+").unwrap());
        Self {
            digits: DIGITS.clone(),
        }
    }
}

impl Default for Integer {
    fn default() -> Self {
        Self::new()
    }
}

impl Template for Integer {
    fn fill(&self, value: &Value) -> Result<String> {
        Ok(as_integer(value, "Integer")?
            .map(|n| n.to_string())
            .unwrap_or_default())
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        let revert = cursor.checkpoint();
        let digits = self.digits.match_text(cursor)?;
        match digits.parse::<i64>() {
            Ok(n) => Some(Value::from(n)),
            Err(e) => {
                tracing::trace!(digits, error = %e, "integer out of range, rolling back");
                cursor.rollback(revert);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fixed_fill_ignores_value() {
        let t = Fixed::new("Yes");
        assert_eq!(t.fill(&json!(null)).unwrap(), "Yes");
        assert_eq!(t.fill(&json!({"anything": [1, 2]})).unwrap(), "Yes");
    }

    #[test]
    fn test_fixed_match_literal() {
        let t = Fixed::new("a.b");
        let m = t.parse("a.bc").unwrap();
        assert_eq!(m.value, json!("a.b"));
        assert_eq!(m.end, 3);

        // Literal, not a regex
        assert!(t.parse("axb").is_none());
    }

    #[test]
    fn test_fixed_failure_leaves_cursor() {
        let t = Fixed::new("Q: ");
        let mut cursor = Cursor::at("xxQ: ", 1).unwrap();
        assert!(t.try_match(&mut cursor).is_none());
        assert_eq!(cursor.pos(), 1);
    }

    #[test]
    fn test_fixed_with_pattern() {
        let t = Fixed::with_pattern("\n", r"\n+").unwrap();
        assert_eq!(t.fill(&json!(null)).unwrap(), "\n");
        let m = t.parse("\n\n\nx").unwrap();
        assert_eq!(m.value, json!("\n\n\n"));
        assert_eq!(m.end, 3);
    }

    #[test]
    fn test_fixed_pattern_only_matches_at_cursor() {
        let t = Fixed::with_pattern(" ", " +").unwrap();
        assert!(t.parse("x  ").is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Pattern::new("(unclosed").unwrap_err();
        assert!(matches!(err, FabError::InvalidPattern { .. }));
        assert!(Fixed::with_pattern("x", "[").is_err());
    }

    #[test]
    fn test_pattern_whole_match() {
        let t = Pattern::new("[a-z]+").unwrap();
        let m = t.parse("abc123").unwrap();
        assert_eq!(m.value, json!("abc"));
        assert_eq!(m.end, 3);
        assert_eq!(t.as_str(), "[a-z]+");
    }

    #[test]
    fn test_pattern_first_group() {
        let t = Pattern::new(r"<(\w+)>").unwrap();
        let m = t.parse("<tag> rest").unwrap();
        assert_eq!(m.value, json!("tag"));
        assert_eq!(m.end, 5);
    }

    #[test]
    fn test_pattern_unused_group_is_no_match() {
        let t = Pattern::new(r"(a)?b").unwrap();
        let mut cursor = Cursor::new("b");
        assert!(t.try_match(&mut cursor).is_none());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_pattern_alternation_is_grouped() {
        // Neither branch may match past the cursor
        let t = Pattern::new("a|b").unwrap();
        assert!(t.parse("xb").is_none());
        assert_eq!(t.parse("b").unwrap().value, json!("b"));
    }

    #[test]
    fn test_pattern_sees_text_before_cursor() {
        // Mid-word: no boundary between 'a' and 'b'
        let word = Pattern::new(r"\b[a-z]+").unwrap();
        assert!(word.parse_at("ab", 1).is_none());
        assert_eq!(word.parse_at("a b", 2).unwrap().value, json!("b"));

        let not_boundary = Pattern::new(r"\B[a-z]").unwrap();
        assert_eq!(not_boundary.parse_at("ab", 1).unwrap().end, 2);

        // `^` only holds at the start of the input
        let start = Pattern::new("^x").unwrap();
        assert!(start.parse_at("ax", 1).is_none());
        assert_eq!(start.parse_at("xa", 0).unwrap().value, json!("x"));
    }

    #[test]
    fn test_fixed_pattern_sees_text_before_cursor() {
        let t = Fixed::with_pattern(" ", r"\b +").unwrap();
        assert_eq!(t.parse_at("a  b", 1).unwrap().end, 3);
        assert!(t.parse_at("a  b", 2).is_none());
    }

    #[test]
    fn test_pattern_fill() {
        let t = Pattern::new(".*").unwrap();
        assert_eq!(t.fill(&json!("as is")).unwrap(), "as is");
        assert_eq!(t.fill(&json!(null)).unwrap(), "");
        assert!(t.fill(&json!(5)).is_err());
    }

    #[test]
    fn test_integer_match() {
        let m = Integer::new().parse("12x").unwrap();
        assert_eq!(m.value, json!(12));
        assert_eq!(m.end, 2);

        let m = Integer::new().parse("-40").unwrap();
        assert_eq!(m.value, json!(-40));
    }

    #[test]
    fn test_integer_no_digits() {
        let mut cursor = Cursor::new("x12");
        assert!(Integer::new().try_match(&mut cursor).is_none());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_integer_overflow_rolls_back() {
        let text = "ab99999999999999999999999";
        let mut cursor = Cursor::at(text, 2).unwrap();
        assert!(Integer::new().try_match(&mut cursor).is_none());
        assert_eq!(cursor.pos(), 2);
    }

    #[test]
    fn test_integer_fill() {
        let t = Integer::new();
        assert_eq!(t.fill(&json!(42)).unwrap(), "42");
        assert_eq!(t.fill(&json!(-3)).unwrap(), "-3");
        assert_eq!(t.fill(&json!("7")).unwrap(), "7");
        assert_eq!(t.fill(&json!(null)).unwrap(), "");
        assert!(t.fill(&json!(true)).is_err());
    }
}
