//! Application state: one session, its transcript, and the error banner.

use crate::chat::{ChatController, InputState, SubmitOutcome};
use crate::config::ClientConfig;
use crate::error::ChatError;
use crate::exchange::Exchange;
use crate::login::LoginController;
use crate::session::SessionState;
use crate::transcript::{Renderer, TranscriptSink};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Transient error message that hides itself after a fixed time.
#[derive(Debug, Clone)]
pub struct Banner {
    ttl: Duration,
    current: Option<(String, Instant)>,
}

impl Banner {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, current: None }
    }

    pub fn raise(&mut self, message: impl Into<String>) {
        self.raise_at(message, Instant::now());
    }

    pub fn raise_at(&mut self, message: impl Into<String>, at: Instant) {
        self.current = Some((message.into(), at));
    }

    pub fn visible(&self) -> Option<&str> {
        self.visible_at(Instant::now())
    }

    pub fn visible_at(&self, now: Instant) -> Option<&str> {
        match &self.current {
            Some((message, raised)) if now.saturating_duration_since(*raised) < self.ttl => {
                Some(message.as_str())
            }
            _ => None,
        }
    }
}

/// Everything a front end drives.
pub struct App<S> {
    session: SessionState,
    renderer: Renderer<S>,
    login: LoginController,
    chat: ChatController,
    banner: Banner,
}

impl<S: TranscriptSink> App<S> {
    pub fn new(config: &ClientConfig, exchange: Arc<dyn Exchange>, sink: S) -> Self {
        Self::with_renderer(config, exchange, Renderer::new(sink))
    }

    pub fn with_renderer(
        config: &ClientConfig,
        exchange: Arc<dyn Exchange>,
        renderer: Renderer<S>,
    ) -> Self {
        Self {
            session: SessionState::new(config.question_limit),
            renderer,
            login: LoginController::new(exchange.clone(), config.greeting_query.clone()),
            chat: ChatController::new(exchange),
            banner: Banner::new(config.banner_ttl()),
        }
    }

    /// Logs in; failures are also raised on the banner.
    pub async fn login(&mut self, identity: &str) -> Result<(), ChatError> {
        let result = self
            .login
            .login(identity, &mut self.session, &mut self.renderer)
            .await;
        match &result {
            Ok(()) => self.chat.sync_input(&self.session),
            Err(e) => self.banner.raise(e.to_string()),
        }
        result
    }

    /// Submits a question; validation failures are also raised on the banner.
    pub async fn submit(&mut self, query: &str) -> Result<SubmitOutcome, ChatError> {
        let result = self
            .chat
            .submit(query, &mut self.session, &mut self.renderer)
            .await;
        if let Err(e) = &result {
            self.banner.raise(e.to_string());
        }
        result
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn transcript(&self) -> &S {
        self.renderer.sink()
    }

    pub fn input_state(&self) -> InputState {
        self.chat.input_state()
    }

    pub fn counter_label(&self) -> String {
        self.session.counter_label()
    }

    pub fn banner(&self) -> &Banner {
        &self.banner
    }
}
