//! Fixed decoration around a content template

use super::{Fixed, IntoTemplate, Template, TemplateRef};
use crate::cursor::Cursor;
use crate::error::Result;
use serde_json::Value;

/// Content wrapped in a required prefix and an optional suffix
///
/// The suffix is only filled when the content value is present, so an empty
/// slot does not leave dangling punctuation behind.
///
/// When matching, a missing suffix is tolerated by default: the suffix is
/// consumed if it is there and otherwise ignored. [`Affix::require_suffix`]
/// makes a missing suffix a non-match.
#[derive(Debug, Clone)]
pub struct Affix {
    prefix: Fixed,
    content: TemplateRef,
    suffix: Option<Fixed>,
    strict_suffix: bool,
}

impl Affix {
    pub fn new(
        prefix: impl Into<Fixed>,
        content: impl IntoTemplate,
        suffix: Option<Fixed>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            content: content.into_template(),
            suffix,
            strict_suffix: false,
        }
    }

    /// Leading text only
    pub fn prefix(prefix: impl Into<Fixed>, content: impl IntoTemplate) -> Self {
        Self::new(prefix, content, None)
    }

    /// Trailing text only
    pub fn suffix(content: impl IntoTemplate, suffix: impl Into<Fixed>) -> Self {
        Self::new("", content, Some(suffix.into()))
    }

    /// Leading and trailing text
    pub fn wrap(
        prefix: impl Into<Fixed>,
        content: impl IntoTemplate,
        suffix: impl Into<Fixed>,
    ) -> Self {
        Self::new(prefix, content, Some(suffix.into()))
    }

    /// Fail the match when the suffix is missing
    pub fn require_suffix(mut self) -> Self {
        self.strict_suffix = true;
        self
    }
}

impl Template for Affix {
    fn fill(&self, value: &Value) -> Result<String> {
        let mut out = String::from(self.prefix.text());
        out.push_str(&self.content.fill(value)?);
        if let Some(suffix) = &self.suffix {
            if !value.is_null() {
                out.push_str(suffix.text());
            }
        }
        Ok(out)
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        self.prefix.match_text(cursor)?;
        let value = self.content.try_match(cursor)?;
        if let Some(suffix) = &self.suffix {
            if suffix.match_text(cursor).is_none() {
                if self.strict_suffix {
                    return None;
                }
                tracing::trace!(pos = cursor.pos(), suffix = suffix.text(), "suffix missing, ignored");
            }
        }
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{NUM, SENTENCE, YES_NO};
    use serde_json::json;

    #[test]
    fn test_prefix_fill_and_match() {
        let t = Affix::prefix("A: ", YES_NO.clone());
        assert_eq!(t.fill(&json!(true)).unwrap(), "A: Yes");
        assert_eq!(t.fill(&json!(null)).unwrap(), "A: ");

        let m = t.parse("A: No").unwrap();
        assert_eq!(m.value, json!(false));
        assert_eq!(m.end, 5);
    }

    #[test]
    fn test_missing_prefix_leaves_cursor() {
        let t = Affix::prefix("A: ", YES_NO.clone());
        let mut cursor = Cursor::new("Q: Yes");
        assert!(t.try_match(&mut cursor).is_none());
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn test_content_failure_keeps_prefix_consumed() {
        let t = Affix::prefix("A: ", YES_NO.clone());
        let mut cursor = Cursor::new("A: Maybe");
        assert!(t.try_match(&mut cursor).is_none());
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn test_suffix_dropped_for_null() {
        let t = Affix::wrap("Q: ", SENTENCE.clone(), "\n");
        assert_eq!(t.fill(&json!("Why?")).unwrap(), "Q: Why?\n");
        assert_eq!(t.fill(&json!(null)).unwrap(), "Q: ");
    }

    #[test]
    fn test_suffix_consumed_when_present() {
        let t = Affix::suffix(NUM.clone(), ". ");
        let m = t.parse("3. rest").unwrap();
        assert_eq!(m.value, json!(3));
        assert_eq!(m.end, 3);
    }

    #[test]
    fn test_missing_suffix_is_tolerated() {
        let t = Affix::suffix(NUM.clone(), ". ");
        let m = t.parse("3) rest").unwrap();
        assert_eq!(m.value, json!(3));
        assert_eq!(m.end, 1);
    }

    #[test]
    fn test_require_suffix() {
        let t = Affix::suffix(NUM.clone(), ". ").require_suffix();
        assert!(t.parse("3) rest").is_none());
        assert_eq!(t.parse("3. rest").unwrap().end, 3);
    }

    #[test]
    fn test_fill_propagates_content_errors() {
        let t = Affix::prefix("n=", NUM.clone());
        assert!(t.fill(&json!("not a number")).is_err());
    }
}
