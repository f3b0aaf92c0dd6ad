//! Sequencing combinators: Append, Repeat and NumberedList

use super::{Fixed, IntoTemplate, Template, TemplateRef};
use crate::cursor::Cursor;
use crate::error::{FabError, Result};
use crate::value::as_sequence;
use serde_json::Value;

// ============================================================================
// APPEND
// ============================================================================

/// Fixed-arity concatenation of heterogeneous templates
///
/// Fills from an array with exactly one value per slot and matches into an
/// array of the same length. A failing slot fails the whole node; the cursor
/// is not restored.
#[derive(Debug, Clone, Default)]
pub struct Append {
    items: Vec<TemplateRef>,
}

impl Append {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the next slot
    pub fn then(mut self, item: impl IntoTemplate) -> Self {
        self.items.push(item.into_template());
        self
    }

    pub fn arity(&self) -> usize {
        self.items.len()
    }
}

impl FromIterator<TemplateRef> for Append {
    fn from_iter<I: IntoIterator<Item = TemplateRef>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl Template for Append {
    fn fill(&self, value: &Value) -> Result<String> {
        let Some(values) = as_sequence(value, "Append")? else {
            return Ok(String::new());
        };
        if values.len() != self.items.len() {
            return Err(FabError::ArityMismatch {
                template: "Append",
                expected: self.items.len(),
                found: values.len(),
            });
        }
        self.items
            .iter()
            .zip(values)
            .map(|(item, v)| item.fill(v))
            .collect()
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        self.items
            .iter()
            .map(|item| item.try_match(cursor))
            .collect::<Option<Vec<_>>>()
            .map(Value::Array)
    }
}

// ============================================================================
// REPEAT
// ============================================================================

/// Variable-length, delimiter-separated sequence of one item template
///
/// Zero items is a valid match. Without `trailing_delimiter`, a delimiter
/// that is not followed by another item is given back to the input.
#[derive(Debug, Clone)]
pub struct Repeat {
    item: TemplateRef,
    delimiter: Fixed,
    trailing_delimiter: bool,
}

impl Repeat {
    pub fn new(item: impl IntoTemplate, delimiter: impl Into<Fixed>) -> Self {
        Self {
            item: item.into_template(),
            delimiter: delimiter.into(),
            trailing_delimiter: false,
        }
    }

    /// Emit a delimiter after the last item and keep one when matching
    pub fn with_trailing_delimiter(mut self, trailing: bool) -> Self {
        self.trailing_delimiter = trailing;
        self
    }

    fn fill_items(&self, values: &[Value]) -> Result<String> {
        let delimiter = self.delimiter.text();
        let mut out = String::new();
        for (i, v) in values.iter().enumerate() {
            if i > 0 {
                out.push_str(delimiter);
            }
            out.push_str(&self.item.fill(v)?);
        }
        if self.trailing_delimiter {
            out.push_str(delimiter);
        }
        Ok(out)
    }

    fn match_items(&self, cursor: &mut Cursor<'_>) -> Vec<Value> {
        let mut values = Vec::new();
        let mut revert = cursor.checkpoint();
        let mut after_delimiter = false;

        loop {
            let start = cursor.pos();
            let Some(v) = self.item.try_match(cursor) else {
                break;
            };
            values.push(v);
            revert = cursor.checkpoint();
            after_delimiter = self.delimiter.match_text(cursor).is_some();
            if !after_delimiter || cursor.pos() == start {
                break;
            }
        }

        if after_delimiter && !self.trailing_delimiter {
            tracing::trace!(pos = revert.pos(), "giving back trailing delimiter");
            cursor.rollback(revert);
        }
        values
    }
}

impl Template for Repeat {
    fn fill(&self, value: &Value) -> Result<String> {
        match as_sequence(value, "Repeat")? {
            Some(values) => self.fill_items(values),
            None => Ok(String::new()),
        }
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        Some(Value::Array(self.match_items(cursor)))
    }
}

// ============================================================================
// NUMBERED LIST
// ============================================================================

/// Repeat whose items carry an ordinal label
///
/// Labels are filled from the item's position (starting at 1 unless set
/// otherwise). When matching, the label's text is dropped without checking
/// it, so gaps or misnumbered items are accepted.
#[derive(Debug, Clone)]
pub struct NumberedList {
    repeat: Repeat,
    start: i64,
}

impl NumberedList {
    pub fn new(
        label: impl IntoTemplate,
        item: impl IntoTemplate,
        delimiter: impl Into<Fixed>,
    ) -> Self {
        let pair = Append::new().then(label).then(item);
        Self {
            repeat: Repeat::new(pair, delimiter),
            start: 1,
        }
    }

    pub fn with_trailing_delimiter(mut self, trailing: bool) -> Self {
        self.repeat = self.repeat.with_trailing_delimiter(trailing);
        self
    }

    /// First ordinal
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = start;
        self
    }
}

impl Template for NumberedList {
    fn fill(&self, value: &Value) -> Result<String> {
        let Some(values) = as_sequence(value, "NumberedList")? else {
            return Ok(String::new());
        };
        let labelled: Vec<Value> = (self.start..)
            .zip(values)
            .map(|(n, v)| Value::Array(vec![Value::String(n.to_string()), v.clone()]))
            .collect();
        self.repeat.fill_items(&labelled)
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        let items = self
            .repeat
            .match_items(cursor)
            .into_iter()
            .filter_map(|pair| match pair {
                Value::Array(mut slots) if slots.len() == 2 => slots.pop(),
                _ => None,
            })
            .collect();
        Some(Value::Array(items))
    }
}
