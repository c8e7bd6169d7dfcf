//! Transcript sink that prints to the terminal.

use crate::history::Role;
use crate::transcript::{Body, Entry, TranscriptSink};
use console::style;
use std::io::{self, Write};
use termimad::MadSkin;

/// Prints entries as they are appended. Responses are rendered as markdown;
/// queries are printed verbatim with control characters escaped.
pub struct TerminalSink<W: Write = io::Stdout> {
    out: W,
    skin: MadSkin,
}

impl TerminalSink {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            skin: MadSkin::default(),
        }
    }

    pub fn render(&self, entry: &Entry) -> String {
        let label = style(&entry.label).dim();
        match (&entry.role, &entry.body) {
            (Role::Query, body) => format!(
                "{label}\n{} {}\n",
                style("You:").cyan().bold(),
                escape_plain(body.as_str())
            ),
            (Role::Response, Body::Markup(text)) => {
                format!("{label}\n{}", self.skin.term_text(text))
            }
            (Role::Response, Body::Plain(text)) => format!("{label}\n{}\n", escape_plain(text)),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TranscriptSink for TerminalSink<W> {
    fn push(&mut self, entry: Entry) {
        let rendered = self.render(&entry);
        if let Err(e) = writeln!(self.out, "{rendered}").and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write transcript entry");
        }
    }

    fn reset(&mut self) {
        let divider = style("--- new session ---").dim();
        if let Err(e) = writeln!(self.out, "{divider}").and_then(|_| self.out.flush()) {
            tracing::warn!(error = %e, "failed to write session divider");
        }
    }
}

/// Escapes control characters other than newline and tab so user input
/// cannot drive the terminal.
pub fn escape_plain(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_control() && c != '\n' && c != '\t' {
            out.extend(c.escape_default());
        } else {
            out.push(c);
        }
    }
    out
}
