use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Identifier of a contact row.
///
/// Rows that arrive without a server identifier get a 1-based positional id
/// so they can still be rendered and selected. Positional ids are never sent
/// back to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ContactId {
    Server(String),
    Positional(usize),
}

impl ContactId {
    pub fn server(id: impl Into<String>) -> Self {
        Self::Server(id.into())
    }

    pub fn server_id(&self) -> Option<&str> {
        match self {
            Self::Server(id) => Some(id),
            Self::Positional(_) => None,
        }
    }

    pub fn require_server_id(&self) -> Result<&str, ValidationError> {
        self.server_id()
            .ok_or_else(|| ValidationError::PositionalId(self.clone()))
    }
}

impl fmt::Display for ContactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Server(id) => f.write_str(id),
            Self::Positional(index) => write!(f, "#{index}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Temperature {
    Hot,
    Warm,
    Cold,
    Frozen,
    Unspecified,
}

impl Temperature {
    pub const KNOWN: [Temperature; 4] = [Self::Hot, Self::Warm, Self::Cold, Self::Frozen];

    /// Lenient mapping used for server data: anything unrecognised is `Unspecified`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "hot" => Self::Hot,
            "warm" => Self::Warm,
            "cold" => Self::Cold,
            "frozen" => Self::Frozen,
            _ => Self::Unspecified,
        }
    }

    /// Strict parse used for user-supplied filter values.
    pub fn parse_filter(value: &str) -> Result<Self, ValidationError> {
        match Self::from_label(value) {
            Self::Unspecified => Err(ValidationError::UnknownTemperature(value.to_string())),
            known => Ok(known),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hot => "hot",
            Self::Warm => "warm",
            Self::Cold => "cold",
            Self::Frozen => "frozen",
            Self::Unspecified => "unspecified",
        }
    }
}

impl From<String> for Temperature {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Temperature> for String {
    fn from(value: Temperature) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pipeline position of a contact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Stage {
    Contact,
    Subscriber,
    Lead,
    Mql,
    Sql,
    Customer,
    Frozen,
    Other(String),
}

impl Stage {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "contact" => Self::Contact,
            "subscriber" => Self::Subscriber,
            "lead" => Self::Lead,
            "mql" => Self::Mql,
            "sql" => Self::Sql,
            "customer" => Self::Customer,
            "frozen" => Self::Frozen,
            _ => Self::Other(label.to_string()),
        }
    }

    pub fn parse_filter(value: &str) -> Result<Self, ValidationError> {
        match Self::from_label(value) {
            Self::Other(raw) => Err(ValidationError::UnknownStage(raw)),
            known => Ok(known),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Contact => "contact",
            Self::Subscriber => "subscriber",
            Self::Lead => "lead",
            Self::Mql => "mql",
            Self::Sql => "sql",
            Self::Customer => "customer",
            Self::Frozen => "frozen",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Stage {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Stage> for String {
    fn from(value: Stage) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a contact came from. Free-form on the wire; the known labels are
/// matched case-sensitively, as the backend emits them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Source {
    Instagram,
    Facebook,
    Email,
    Import,
    #[default]
    Manual,
    Other(String),
}

impl Source {
    pub fn from_label(label: &str) -> Self {
        match label {
            "Instagram" => Self::Instagram,
            "Facebook" => Self::Facebook,
            "Email" => Self::Email,
            "Import" => Self::Import,
            "Manual" => Self::Manual,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Instagram => "Instagram",
            Self::Facebook => "Facebook",
            Self::Email => "Email",
            Self::Import => "Import",
            Self::Manual => "Manual",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for Source {
    fn from(value: String) -> Self {
        Self::from_label(&value)
    }
}

impl From<Source> for String {
    fn from(value: Source) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical contact row as rendered by the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub avatar: Option<String>,
    pub source: Source,
    pub temperature: Temperature,
    pub stage: Stage,
    pub group: Option<String>,
    pub last_contact: String,
    pub tags: Vec<String>,
    pub created_at: String,
}

impl Contact {
    pub fn last_contact_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.last_contact)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(&self.created_at)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactStats {
    pub total: u64,
    pub hot: u64,
    pub ghl_transfers: u64,
    pub frozen: u64,
}

#[cfg(test)]
#[path = "tests/domain_tests.rs"]
mod tests;
