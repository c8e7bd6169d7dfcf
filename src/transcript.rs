//! Transcript entries, timestamp labels and the sink they are appended to.
//!
//! Query content echoes what the user typed and is carried as
//! [`Body::Plain`]; only server-originated responses are [`Body::Markup`]
//! and may be rendered with formatting.

use crate::history::{MessageRecord, Role};
use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const TIME_FORMAT: &str = "%-I:%M %p";
const ABSOLUTE_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    /// Untrusted text, displayed without interpretation.
    Plain(String),
    /// Server text eligible for structured (markdown) rendering.
    Markup(String),
}

impl Body {
    pub fn as_str(&self) -> &str {
        match self {
            Body::Plain(s) | Body::Markup(s) => s,
        }
    }
}

/// A displayable transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub role: Role,
    pub body: Body,
    pub timestamp: String,
    pub label: String,
}

/// The "append entry" capability the controllers render through.
pub trait TranscriptSink {
    fn push(&mut self, entry: Entry);

    /// Drops every entry, used when a session is re-seeded.
    fn reset(&mut self);
}

/// In-memory sink.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&Entry> {
        self.entries.last()
    }
}

impl TranscriptSink for Transcript {
    fn push(&mut self, entry: Entry) {
        self.entries.push(entry);
    }

    fn reset(&mut self) {
        self.entries.clear();
    }
}

/// Turns message records into entries and appends them to a sink.
pub struct Renderer<S> {
    sink: S,
    clock: fn() -> DateTime<Local>,
}

impl<S: TranscriptSink> Renderer<S> {
    pub fn new(sink: S) -> Self {
        Self::with_clock(sink, Local::now)
    }

    pub fn with_clock(sink: S, clock: fn() -> DateTime<Local>) -> Self {
        Self { sink, clock }
    }

    /// Appends a message, stamping it with the current time when no
    /// timestamp is given.
    pub fn append(&mut self, role: Role, content: impl Into<String>, timestamp: Option<String>) {
        self.append_record(MessageRecord::new(role, content, timestamp));
    }

    pub fn append_record(&mut self, record: MessageRecord) {
        let label = label_for(&record.timestamp, (self.clock)());
        let body = match record.role {
            Role::Query => Body::Plain(record.content),
            Role::Response => Body::Markup(record.content),
        };
        self.sink.push(Entry {
            role: record.role,
            body,
            timestamp: record.timestamp,
            label,
        });
    }

    pub fn reset(&mut self) {
        self.sink.reset();
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

/// Parses an RFC 3339 or naive ISO-8601 timestamp. Naive values are taken
/// as local time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .and_then(|naive| resolve_local(naive, |n| Local.from_local_datetime(n)))
}

/// Maps a wall-clock time to an instant. Ambiguous times take the earlier
/// instant; times skipped by a forward clock change move one hour ahead.
fn resolve_local<Tz: TimeZone>(
    naive: NaiveDateTime,
    lookup: impl Fn(&NaiveDateTime) -> LocalResult<DateTime<Tz>>,
) -> Option<DateTime<Tz>> {
    lookup(&naive)
        .earliest()
        .or_else(|| lookup(&(naive + Duration::hours(1))).earliest())
}

/// Label for a raw timestamp; unparseable input is shown verbatim.
pub fn label_for(raw: &str, now: DateTime<Local>) -> String {
    match parse_timestamp(raw) {
        Some(ts) => relative_label(&ts, &now),
        None => raw.to_string(),
    }
}

/// Relative label by calendar day: today, yesterday, up to six days ago,
/// then the absolute date.
pub fn relative_label<Tz: TimeZone>(ts: &DateTime<Tz>, now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let days = (now.date_naive() - ts.date_naive()).num_days();
    let time = ts.format(TIME_FORMAT);
    match days {
        0 => format!("Today at {time}"),
        1 => format!("Yesterday at {time}"),
        2..=6 => format!("{days} days ago at {time}"),
        _ => ts.format(ABSOLUTE_FORMAT).to_string(),
    }
}
