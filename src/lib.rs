//! prompt-fab - bidirectional prompt templates
//!
//! One template tree both fills data into a prompt and parses model output
//! back into data.

pub mod config;
pub mod cursor;
pub mod error;
pub mod provider;
pub mod qa;
pub mod template;
pub mod value;

pub use config::FabConfig;
pub use cursor::{Checkpoint, Cursor};
pub use error::{FabError, FixSuggestion};
pub use serde_json::Value;
pub use template::{
    Affix, Append, Choice, Fixed, Integer, IntoTemplate, Match, NumberedList, Pattern, Record,
    Repeat, Template, TemplateRef, EOL, NOTHING, NUM, SENTENCE, SPACE, YES_NO,
};
