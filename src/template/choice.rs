//! Bidirectional enumerations

use super::{Fixed, Template};
use crate::cursor::Cursor;
use crate::error::{FabError, Result};
use serde_json::Value;

/// A closed set of values, each rendered as its own fixed text
///
/// Options are kept in declaration order and matching returns the first
/// option whose text matches, even when a later option would match more of
/// the input. Declare longer alternatives first when they share a prefix.
#[derive(Debug, Clone, Default)]
pub struct Choice {
    options: Vec<(Value, Fixed)>,
}

impl Choice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next option
    ///
    /// Re-declaring a value keeps the first declaration for fills; the later
    /// text is still tried when matching.
    pub fn option(mut self, value: impl Into<Value>, text: impl Into<Fixed>) -> Self {
        self.options.push((value.into(), text.into()));
        self
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.options.iter().map(|(value, _)| value)
    }
}

impl<V: Into<Value>, T: Into<Fixed>> FromIterator<(V, T)> for Choice {
    fn from_iter<I: IntoIterator<Item = (V, T)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |choice, (value, text)| choice.option(value, text))
    }
}

impl Template for Choice {
    fn fill(&self, value: &Value) -> Result<String> {
        if value.is_null() {
            return Ok(String::new());
        }
        self.options
            .iter()
            .find(|(v, _)| v == value)
            .map(|(_, text)| text.text().to_string())
            .ok_or_else(|| FabError::UnknownOption {
                value: value.to_string(),
            })
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        self.options
            .iter()
            .find(|(_, text)| text.match_text(cursor).is_some())
            .map(|(value, _)| value.clone())
    }
}
