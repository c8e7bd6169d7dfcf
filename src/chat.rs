//! Quota-gated question submission.

use crate::error::ChatError;
use crate::exchange::Exchange;
use crate::history::Role;
use crate::session::SessionState;
use crate::transcript::{Renderer, TranscriptSink};
use std::sync::Arc;
use tracing::{info, instrument, warn};

pub(crate) const MISSING_QUERY: &str = "Please enter a question";
const NOT_LOGGED_IN: &str = "Please log in with your employee ID first";
const BUSY: &str = "Please wait for the current answer";

pub fn quota_reached_message(limit: u32) -> String {
    format!(
        "You have reached the maximum of {limit} questions for this session. \
         Start a new session to ask more."
    )
}

/// Whether the question input accepts a submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputState {
    Ready,
    /// An exchange is outstanding.
    InFlight,
    /// The quota is used up; stays this way until the session is reset.
    Exhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Answered,
    /// The exchange failed; the error is in the transcript and the charge
    /// was reverted.
    Failed,
    /// Nothing was sent because the quota is used up.
    QuotaExhausted,
}

pub struct ChatController {
    exchange: Arc<dyn Exchange>,
    input: InputState,
}

impl ChatController {
    pub fn new(exchange: Arc<dyn Exchange>) -> Self {
        Self {
            exchange,
            input: InputState::Ready,
        }
    }

    pub fn input_state(&self) -> InputState {
        self.input
    }

    /// Re-derives the input state from the session, after (re)activation.
    pub fn sync_input(&mut self, session: &SessionState) {
        self.input = if session.can_ask() {
            InputState::Ready
        } else {
            InputState::Exhausted
        };
    }

    /// Submits one question.
    ///
    /// The question is charged before the exchange starts and the charge is
    /// reverted if the exchange fails. Exchange failures are reported in the
    /// transcript, not through the returned error.
    #[instrument(skip_all, fields(session = %session.id(), count = session.question_count()))]
    pub async fn submit<S: TranscriptSink>(
        &mut self,
        query: &str,
        session: &mut SessionState,
        renderer: &mut Renderer<S>,
    ) -> Result<SubmitOutcome, ChatError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ChatError::validation(MISSING_QUERY));
        }
        if self.input == InputState::InFlight {
            return Err(ChatError::validation(BUSY));
        }
        let identity = match (session.is_active(), session.identity()) {
            (true, Some(identity)) => identity.to_string(),
            _ => return Err(ChatError::validation(NOT_LOGGED_IN)),
        };

        if !session.can_ask() {
            renderer.append(Role::Response, quota_reached_message(session.limit()), None);
            self.input = InputState::Exhausted;
            info!(limit = session.limit(), "submit refused, quota reached");
            return Ok(SubmitOutcome::QuotaExhausted);
        }

        renderer.append(Role::Query, query, None);
        session.record_attempt();
        self.input = InputState::InFlight;

        let outcome = match self.exchange.send(&identity, query).await {
            Ok(reply) => {
                renderer.append(Role::Response, reply.response, None);
                SubmitOutcome::Answered
            }
            Err(e) => {
                warn!(error = %e, "exchange failed, reverting charge");
                renderer.append(Role::Response, format!("Error: {}", e.message()), None);
                session.record_failure();
                SubmitOutcome::Failed
            }
        };

        self.sync_input(session);
        info!(
            ?outcome,
            question_count = session.question_count(),
            limit = session.limit(),
            "question submitted"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExchangeError;
    use crate::exchange::ExchangeReply;
    use crate::testing::ScriptedExchange;
    use crate::transcript::{Body, Transcript};

    fn active_session(count: u32) -> SessionState {
        let mut session = SessionState::new(10);
        session.activate("E123", count);
        session
    }

    #[tokio::test]
    async fn count_tracks_successful_submits_up_to_limit() {
        let exchange = ScriptedExchange::answering("ok", 10);
        let mut chat = ChatController::new(exchange.clone());
        let mut session = active_session(0);
        let mut renderer = Renderer::new(Transcript::new());

        for n in 1..=12u32 {
            chat.submit("How much tax did I pay?", &mut session, &mut renderer)
                .await
                .unwrap();
            assert_eq!(session.question_count(), n.min(10));
        }
        assert_eq!(exchange.calls().len(), 10);
    }

    #[tokio::test]
    async fn ninth_to_tenth_question_exhausts_input() {
        let exchange = ScriptedExchange::answering("Your salary is 5,000.", 1);
        let mut chat = ChatController::new(exchange.clone());
        let mut session = active_session(9);
        let mut renderer = Renderer::new(Transcript::new());

        let outcome = chat
            .submit("What is my salary?", &mut session, &mut renderer)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Answered);
        assert_eq!(session.counter_label(), "10/10");
        assert_eq!(chat.input_state(), InputState::Exhausted);

        let outcome = chat
            .submit("And my bonus?", &mut session, &mut renderer)
            .await
            .unwrap();
        assert_eq!(outcome, SubmitOutcome::QuotaExhausted);
        assert_eq!(exchange.calls().len(), 1);
        assert_eq!(session.counter_label(), "10/10");
        assert_eq!(
            renderer.sink().last().map(|e| e.body.clone()),
            Some(Body::Markup(quota_reached_message(10)))
        );
    }

    #[tokio::test]
    async fn failed_exchange_reverts_charge() {
        let exchange = ScriptedExchange::new(vec![Err(ExchangeError::Transport(
            "connection refused".into(),
        ))]);
        let mut chat = ChatController::new(exchange);
        let mut session = active_session(3);
        let mut renderer = Renderer::new(Transcript::new());

        let outcome = chat
            .submit("What is my salary?", &mut session, &mut renderer)
            .await
            .unwrap();

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(session.counter_label(), "3/10");
        assert_eq!(chat.input_state(), InputState::Ready);
        let entries = renderer.sink().entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].body, Body::Plain("What is my salary?".into()));
        assert_eq!(entries[1].role, Role::Response);
        assert_eq!(entries[1].body.as_str(), "Error: connection refused");
    }

    #[tokio::test]
    async fn failure_at_last_slot_reopens_input() {
        let exchange = ScriptedExchange::new(vec![Err(ExchangeError::Status {
            status: 500,
            message: "API Error: quota".into(),
        })]);
        let mut chat = ChatController::new(exchange);
        let mut session = active_session(9);
        let mut renderer = Renderer::new(Transcript::new());

        chat.submit("Deductions?", &mut session, &mut renderer)
            .await
            .unwrap();

        assert_eq!(session.question_count(), 9);
        assert!(session.can_ask());
        assert_eq!(chat.input_state(), InputState::Ready);
    }

    #[tokio::test]
    async fn mixed_results_converge_to_successes() {
        let ok = |s: &str| -> Result<ExchangeReply, ExchangeError> {
            Ok(ExchangeReply {
                response: s.to_string(),
                history: Vec::new(),
            })
        };
        let exchange = ScriptedExchange::new(vec![
            ok("a"),
            Err(ExchangeError::Malformed("missing field `response`".into())),
            ok("b"),
            Err(ExchangeError::Transport("timed out".into())),
        ]);
        let mut chat = ChatController::new(exchange);
        let mut session = active_session(0);
        let mut renderer = Renderer::new(Transcript::new());

        for _ in 0..4 {
            chat.submit("q", &mut session, &mut renderer).await.unwrap();
        }

        assert_eq!(session.question_count(), 2);
        assert_eq!(renderer.sink().len(), 8);
    }

    #[tokio::test]
    async fn submit_before_login_is_a_validation_error() {
        let exchange = ScriptedExchange::answering("ok", 1);
        let mut chat = ChatController::new(exchange.clone());
        let mut session = SessionState::new(10);
        let mut renderer = Renderer::new(Transcript::new());

        let err = chat
            .submit("hello", &mut session, &mut renderer)
            .await
            .unwrap_err();

        assert_eq!(err, ChatError::Validation(NOT_LOGGED_IN.into()));
        assert!(renderer.sink().is_empty());
        assert!(exchange.calls().is_empty());
    }

    #[tokio::test]
    async fn blank_query_is_rejected_without_charge() {
        let exchange = ScriptedExchange::answering("ok", 1);
        let mut chat = ChatController::new(exchange.clone());
        let mut session = active_session(2);
        let mut renderer = Renderer::new(Transcript::new());

        let err = chat
            .submit("  \n", &mut session, &mut renderer)
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(session.question_count(), 2);
        assert!(exchange.calls().is_empty());
    }

    #[tokio::test]
    async fn exchange_uses_active_identity() {
        let exchange = ScriptedExchange::answering("ok", 1);
        let mut chat = ChatController::new(exchange.clone());
        let mut session = active_session(0);
        let mut renderer = Renderer::new(Transcript::new());

        chat.submit(" What is my PF deduction? ", &mut session, &mut renderer)
            .await
            .unwrap();

        assert_eq!(
            exchange.calls(),
            vec![("E123".to_string(), "What is my PF deduction?".to_string())]
        );
    }
}
