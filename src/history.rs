//! Message records and the server-supplied exchange history.
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Query,
    Response,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageRecord {
    pub role: Role,
    pub content: String,
    /// ISO-8601 timestamp.
    pub timestamp: String,
}

impl MessageRecord {
    pub fn new(role: Role, content: impl Into<String>, timestamp: Option<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: timestamp.unwrap_or_else(current_timestamp),
        }
    }
}

/// One past exchange as returned by the `/chat` endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
    pub query: String,
    pub response: String,
    pub timestamp: String,
}

impl HistoryEntry {
    /// Expands the entry into its query and response records, both stamped
    /// with the entry's timestamp.
    pub fn into_records(self) -> [MessageRecord; 2] {
        [
            MessageRecord::new(Role::Query, self.query, Some(self.timestamp.clone())),
            MessageRecord::new(Role::Response, self.response, Some(self.timestamp)),
        ]
    }
}

fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
