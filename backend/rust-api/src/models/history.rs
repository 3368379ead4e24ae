use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// One line of the tutoring transcript.
///
/// Plain JSON strings are what the learner typed; every other value is a reply
/// produced by the completion model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    User(String),
    Reply(Reply),
}

/// A model reply, stored exactly as the model produced it so it can be replayed
/// and round-tripped without losing fields. Use [`Reply::stage`] to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reply(Value);

/// Read-only view of a reply, dispatched on its `stage` tag.
///
/// Fields are read leniently: a missing or ill-typed text field reads as empty
/// and `correctAnswerIndex` is never looked at.
#[derive(Debug, Clone, PartialEq)]
pub enum Stage<'a> {
    Introduction {
        message: &'a str,
        prompt: &'a str,
    },
    Mcq {
        /// Feedback on the previous answer, if any.
        message: Option<&'a str>,
        question: &'a str,
        choices: Vec<Cow<'a, str>>,
    },
    ConfidenceCheck {
        message: &'a str,
    },
    End,
    Unrecognized,
}

impl Reply {
    /// Parses the raw text returned by the completion model.
    ///
    /// Empty content becomes `{}`, which renders as nothing. Anything else must
    /// be JSON.
    pub fn from_completion_text(text: &str) -> Result<Self, serde_json::Error> {
        if text.is_empty() {
            return Ok(Self::empty());
        }
        serde_json::from_str(text).map(Self)
    }

    /// The `{}` reply.
    pub fn empty() -> Self {
        Self(Value::Object(Default::default()))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn stage(&self) -> Stage<'_> {
        let value = &self.0;
        match value.get("stage").and_then(Value::as_str) {
            Some("introduction_and_explanation") => Stage::Introduction {
                message: text_field(value, "message"),
                prompt: text_field(value, "prompt"),
            },
            Some("mcq") => Stage::Mcq {
                message: value.get("message").and_then(Value::as_str),
                question: text_field(value, "question"),
                choices: value
                    .get("choices")
                    .and_then(Value::as_array)
                    .map(|choices| choices.iter().map(choice_text).collect())
                    .unwrap_or_default(),
            },
            Some("confidence_check") => Stage::ConfidenceCheck {
                message: text_field(value, "message"),
            },
            Some("end") => Stage::End,
            _ => Stage::Unrecognized,
        }
    }

    /// Label used in logs and metrics.
    pub fn stage_label(&self) -> &'static str {
        match self.stage() {
            Stage::Introduction { .. } => "introduction_and_explanation",
            Stage::Mcq { .. } => "mcq",
            Stage::ConfidenceCheck { .. } => "confidence_check",
            Stage::End => "end",
            Stage::Unrecognized => "unrecognized",
        }
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

fn text_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or_default()
}

fn choice_text(choice: &Value) -> Cow<'_, str> {
    match choice {
        Value::String(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Ordered, append-only transcript carried by the page between submissions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes the `history` form field. A blank field is the start of a session.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(raw)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.0)
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the next transcript: this one followed by the learner's input and
    /// the model's reply.
    pub fn extended(mut self, input: String, reply: Reply) -> Self {
        self.0.push(HistoryEntry::User(input));
        self.0.push(HistoryEntry::Reply(reply));
        self
    }
}

impl From<Vec<HistoryEntry>> for History {
    fn from(entries: Vec<HistoryEntry>) -> Self {
        Self(entries)
    }
}
