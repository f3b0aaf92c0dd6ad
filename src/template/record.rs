//! Named-field records

use super::{IntoTemplate, Template, TemplateRef};
use crate::cursor::Cursor;
use crate::error::Result;
use crate::value::as_record;
use serde_json::{Map, Value};

/// Ordered named fields, filled from and matched into a JSON object
///
/// Fields are visited in declaration order. A field whose key is absent from
/// the data contributes nothing to the fill, decoration included (a key that
/// is present with a null value still fills its decoration). A field that
/// fails to match is left out of the result; a record match never fails.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: Vec<(String, TemplateRef)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the next field
    pub fn field(mut self, name: impl Into<String>, template: impl IntoTemplate) -> Self {
        self.fields.push((name.into(), template.into_template()));
        self
    }

    /// Field names in declaration order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Template for Record {
    fn fill(&self, value: &Value) -> Result<String> {
        let Some(data) = as_record(value, "Record")? else {
            return Ok(String::new());
        };
        let mut out = String::new();
        for (name, template) in &self.fields {
            if let Some(v) = data.get(name) {
                out.push_str(&template.fill(v)?);
            }
        }
        Ok(out)
    }

    fn try_match(&self, cursor: &mut Cursor<'_>) -> Option<Value> {
        let mut data = Map::new();
        for (name, template) in &self.fields {
            if let Some(v) = template.try_match(cursor) {
                data.insert(name.clone(), v);
            }
        }
        Some(Value::Object(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{Affix, EOL, NUM, SENTENCE, YES_NO};
    use serde_json::json;

    fn pair() -> Record {
        Record::new()
            .field("a", Affix::suffix(NUM.clone(), " "))
            .field("b", NUM.clone())
    }

    #[test]
    fn test_fill_and_match() {
        let t = pair();
        assert_eq!(t.fill(&json!({"a": 1, "b": 2})).unwrap(), "1 2");

        let m = t.parse("1 2").unwrap();
        assert_eq!(m.value, json!({"a": 1, "b": 2}));
        assert_eq!(m.end, 3);
    }

    #[test]
    fn test_absent_field_drops_decoration() {
        assert_eq!(pair().fill(&json!({"b": 2})).unwrap(), "2");
    }

    #[test]
    fn test_null_field_keeps_prefix() {
        let t = Record::new()
            .field("question", Affix::wrap("Q: ", SENTENCE.clone(), EOL.clone()))
            .field("answer", Affix::prefix("A: ", YES_NO.clone()));
        let text = t
            .fill(&json!({"question": "Is it?", "answer": null}))
            .unwrap();
        assert_eq!(text, "Q: Is it?\nA: ");
    }

    #[test]
    fn test_unmatched_field_is_omitted() {
        let t = Record::new()
            .field("label", Affix::suffix(NUM.clone(), ": "))
            .field("text", SENTENCE.clone());
        let m = t.parse("no number here").unwrap();
        assert_eq!(m.value, json!({"text": "no number here"}));
    }

    #[test]
    fn test_match_never_fails() {
        let m = pair().parse("").unwrap();
        assert_eq!(m.value, json!({}));
        assert_eq!(m.end, 0);
    }

    #[test]
    fn test_extra_keys_ignored() {
        assert_eq!(pair().fill(&json!({"b": 5, "zzz": true})).unwrap(), "5");
    }

    #[test]
    fn test_fill_domain() {
        assert_eq!(pair().fill(&json!(null)).unwrap(), "");
        assert!(pair().fill(&json!([1, 2])).is_err());
        assert!(pair().fill(&json!({"b": "x"})).is_err());
    }

    #[test]
    fn test_field_names_in_order() {
        let names: Vec<_> = pair().field_names().map(str::to_string).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
