//! Yes/no question answering prompt
//!
//! ```text
//! Answer "Yes" or "No" to the following questions.
//!
//! Q: Is the sky blue?
//! A: Yes
//!
//! Q: Can you eat soup with a spoon?
//! A:
//! ```

use crate::error::Result;
use crate::template::{Affix, Record, Repeat, EOL, SENTENCE, YES_NO};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const INSTRUCTIONS: &str = "Answer \"Yes\" or \"No\" to the following questions.\n\n";

/// One question with an optional answer (`None` leaves the slot open)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QaExample {
    pub question: String,
    #[serde(default)]
    pub answer: Option<bool>,
}

impl QaExample {
    pub fn new(question: impl Into<String>, answer: Option<bool>) -> Self {
        Self {
            question: question.into(),
            answer,
        }
    }
}

/// Instructions followed by blank-line separated Q/A records
pub fn yes_no_qa() -> Affix {
    let row = Record::new()
        .field("question", Affix::wrap("Q: ", SENTENCE.clone(), EOL.clone()))
        .field("answer", Affix::prefix("A: ", YES_NO.clone()));
    Affix::prefix(INSTRUCTIONS, Repeat::new(row, "\n\n"))
}

/// Template data for a list of examples
///
/// Every example keeps its `answer` key, so an open answer still renders
/// the `A: ` prefix.
pub fn to_data(examples: &[QaExample]) -> Result<Value> {
    Ok(serde_json::to_value(examples)?)
}

/// Examples back from parsed template data, skipping rows without a question
pub fn from_data(value: &Value) -> Vec<QaExample> {
    value
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|row| {
                    let question = row.get("question")?.as_str()?;
                    let answer = row.get("answer").and_then(Value::as_bool);
                    Some(QaExample::new(question, answer))
                })
                .collect()
        })
        .unwrap_or_default()
}
