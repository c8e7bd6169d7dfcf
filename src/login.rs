//! Identity validation and session activation.

use crate::error::ChatError;
use crate::exchange::Exchange;
use crate::history::Role;
use crate::session::SessionState;
use crate::transcript::{Renderer, TranscriptSink};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub(crate) const MISSING_IDENTITY: &str = "Please enter your employee ID";
const IDENTITY_IN_USE: &str = "A session is already active for another employee ID";

pub fn welcome_message(limit: u32) -> String {
    format!(
        "Welcome! Ask me anything about your salary and deductions. \
         You can ask up to {limit} questions in this session."
    )
}

/// Validates an employee ID with one greeting exchange and activates the
/// session from the reply.
pub struct LoginController {
    exchange: Arc<dyn Exchange>,
    greeting_query: String,
}

impl LoginController {
    pub fn new(exchange: Arc<dyn Exchange>, greeting_query: impl Into<String>) -> Self {
        Self {
            exchange,
            greeting_query: greeting_query.into(),
        }
    }

    /// Logs in as `identity`.
    ///
    /// On success the transcript is reset, the welcome message appended and
    /// the returned history replayed, each past exchange counting one
    /// question. On failure neither the session nor the transcript change.
    #[instrument(skip_all, fields(session = %session.id()))]
    pub async fn login<S: TranscriptSink>(
        &self,
        identity: &str,
        session: &mut SessionState,
        renderer: &mut Renderer<S>,
    ) -> Result<(), ChatError> {
        let identity = identity.trim();
        if identity.is_empty() {
            return Err(ChatError::validation(MISSING_IDENTITY));
        }
        if session.is_active() && session.identity() != Some(identity) {
            return Err(ChatError::validation(IDENTITY_IN_USE));
        }

        let reply = self
            .exchange
            .send(identity, &self.greeting_query)
            .await
            .map_err(|e| {
                warn!(employee_id = identity, error = %e, "login rejected");
                ChatError::RejectedIdentity(e.message())
            })?;

        let history_len = reply.history.len();
        renderer.reset();
        session.activate(identity, u32::try_from(history_len).unwrap_or(u32::MAX));
        renderer.append(Role::Response, welcome_message(session.limit()), None);
        for entry in reply.history {
            for record in entry.into_records() {
                renderer.append_record(record);
            }
        }

        info!(
            employee_id = identity,
            history_len,
            question_count = session.question_count(),
            "session activated"
        );
        Ok(())
    }
}
