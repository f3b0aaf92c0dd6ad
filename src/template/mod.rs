//! # Bidirectional Templates
//!
//! A template tree renders data into text with [`Template::fill`] and reads
//! the same data back out of text with [`Template::parse`]. Both directions
//! walk the same tree, so a prompt layout and the parser for model output
//! built from it cannot drift apart.
//!
//! ## Node Types
//!
//! | Node | Data | Notes |
//! |------|------|-------|
//! | [`Fixed`] | ignored / matched text | constant text, optional looser accept pattern |
//! | [`Pattern`] | string | regex leaf, surfaces first group if any |
//! | [`Integer`] | integer | `-?[0-9]+`, rolls back on overflow |
//! | [`Append`] | array (fixed arity) | heterogeneous concatenation |
//! | [`Repeat`] | array | delimiter-separated, optional trailing delimiter |
//! | [`NumberedList`] | array | Repeat with an ordinal label per item |
//! | [`Affix`] | content's data | fixed prefix / suffix decoration |
//! | [`Record`] | object | named fields, absent keys are elided |
//! | [`Choice`] | one declared value | first declared option wins |
//!
//! ## Example
//!
//! ```rust
//! use prompt_fab::template::{Affix, NumberedList, Template, EOL, NUM, SENTENCE};
//! use serde_json::json;
//!
//! let list = NumberedList::new(Affix::suffix(NUM.clone(), ". "), SENTENCE.clone(), EOL.clone())
//!     .with_trailing_delimiter(true);
//! let text = list.fill(&json!(["First.", "Second."])).unwrap();
//! assert_eq!(text, "1. First.\n2. Second.\n");
//!
//! let parsed = list.parse(&text).unwrap();
//! assert_eq!(parsed.value, json!(["First.", "Second."]));
//! ```
//!
//! ## Rollback Boundary
//!
//! Only [`Repeat`] (trailing delimiter) and [`Integer`] (unparseable digits)
//! restore the cursor after partially consuming input. [`Append`] and
//! [`Affix`] leave the cursor wherever the failing child left it.

mod affix;
mod choice;
mod leaf;
mod record;
mod sequence;

pub use affix::Affix;
pub use choice::Choice;
pub use leaf::{Fixed, Integer, Pattern};
pub use record::Record;
pub use sequence::{Append, NumberedList, Repeat};

use crate::cursor::Cursor;
use crate::error::Result;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Core trait implemented by every template node
///
/// Nodes are immutable after construction. All match state lives in the
/// cursor, so one tree can serve any number of concurrent fills and parses.
pub trait Template: Send + Sync + fmt::Debug {
    /// Render `value` into text
    ///
    /// Null is the absent value. Values outside the node's domain are a
    /// programming error and come back as [`crate::FabError`].
    fn fill(&self, value: &Value) -> Result<String>;

    /// Match at the cursor, advancing it on success
    ///
    /// `None` means no match. Whether the cursor moved on failure depends on
    /// the node (see the module docs on the rollback boundary).
    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value>;

    /// Match a prefix of `text`
    fn parse(&self, text: &str) -> Option<Match> {
        self.parse_at(text, 0)
    }

    /// Match a prefix of `text[start..]`
    ///
    /// `start` is a byte offset; offsets past the end or inside a character
    /// never match.
    fn parse_at(&self, text: &str, start: usize) -> Option<Match> {
        let mut cursor = Cursor::at(text, start)?;
        let value = self.try_match(&mut cursor)?;
        Some(Match {
            value,
            end: cursor.pos(),
        })
    }

    /// Match the whole of `text`
    fn parse_full(&self, text: &str) -> Option<Value> {
        self.parse(text)
            .filter(|m| m.end == text.len())
            .map(|m| m.value)
    }
}

/// Successful match: parsed value and the byte offset where matching stopped
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub value: Value,
    pub end: usize,
}

/// Shared handle to a template node
pub type TemplateRef = Arc<dyn Template>;

/// Anything usable as a child template
///
/// Strings are promoted to [`Fixed`] literals.
pub trait IntoTemplate {
    fn into_template(self) -> TemplateRef;
}

impl<T: Template + 'static> IntoTemplate for T {
    fn into_template(self) -> TemplateRef {
        Arc::new(self)
    }
}

impl IntoTemplate for TemplateRef {
    fn into_template(self) -> TemplateRef {
        self
    }
}

impl IntoTemplate for &str {
    fn into_template(self) -> TemplateRef {
        Arc::new(Fixed::new(self))
    }
}

impl IntoTemplate for String {
    fn into_template(self) -> TemplateRef {
        Arc::new(Fixed::new(self))
    }
}

// ============================================================================
// PREDEFINED TEMPLATES
// ============================================================================

/// One line of text, optionally ending in `.`, `?` or `!`
pub static SENTENCE: Lazy<Pattern> =
    Lazy::new(|| Pattern::new(r"[^\n\.\?\!]+[\.\?\!]?").unwrap());

/// A newline
pub static EOL: Lazy<Fixed> = Lazy::new(|| Fixed::new("\n"));

/// Fills one space, matches a run of spaces
pub static SPACE: Lazy<Fixed> = Lazy::new(|| Fixed::with_pattern(" ", " +").unwrap());

/// `false` <-> "No", `true` <-> "Yes"
pub static YES_NO: Lazy<Choice> = Lazy::new(|| {
    Choice::new()
        .option(false, "No")
        .option(true, "Yes")
});

/// Base-10 signed integer
pub static NUM: Lazy<Integer> = Lazy::new(Integer::new);

/// Empty text, always matches
pub static NOTHING: Lazy<Fixed> = Lazy::new(|| Fixed::new(""));
