use serde::Deserialize;
use thiserror::Error;

use crate::domain::ContactId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("contact name is required")]
    EmptyName,
    #[error("unknown temperature filter '{0}'")]
    UnknownTemperature(String),
    #[error("unknown stage filter '{0}'")]
    UnknownStage(String),
    #[error("rows per page must be one of 25, 50 or 100 (got {0})")]
    RowsPerPage(u32),
    #[error("contact {0} has no server identifier")]
    PositionalId(ContactId),
}

/// Error envelope the contacts backend returns alongside non-2xx statuses.
/// Both fields are optional; whichever is present wins, `message` first.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .filter(|m| !m.trim().is_empty())
            .or(self.error.filter(|m| !m.trim().is_empty()))
    }
}
