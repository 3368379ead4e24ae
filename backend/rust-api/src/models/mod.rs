use serde::Deserialize;
use validator::Validate;

pub mod history;

pub use history::{History, HistoryEntry, Reply, Stage};

/// Body of the chat form posted back to `/`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitForm {
    /// JSON-encoded transcript so far. Absent on the first submission.
    #[serde(default)]
    pub history: String,

    #[validate(length(
        min = 1,
        max = 4000,
        message = "Message must be between 1 and 4000 characters"
    ))]
    pub input: String,
}
