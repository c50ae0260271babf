use serde::{Deserialize, Serialize};

/// A stage transition reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub message: String,
    /// Completion in percent, 0 to 100.
    pub percentage: u8,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>, percentage: u8) -> Self {
        Self {
            message: message.into(),
            percentage: percentage.min(100),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.percentage == 100
    }
}
