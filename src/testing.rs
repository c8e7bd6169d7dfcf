//! Test double for [`Exchange`].

use crate::error::ExchangeError;
use crate::exchange::{Exchange, ExchangeReply};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Replays canned results in order and records every call.
pub struct ScriptedExchange {
    replies: Mutex<VecDeque<Result<ExchangeReply, ExchangeError>>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl ScriptedExchange {
    pub fn new(replies: Vec<Result<ExchangeReply, ExchangeError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn answering(response: &str, times: usize) -> Arc<Self> {
        Self::new(
            (0..times)
                .map(|_| {
                    Ok(ExchangeReply {
                        response: response.to_string(),
                        history: Vec::new(),
                    })
                })
                .collect(),
        )
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Exchange for ScriptedExchange {
    async fn send(&self, identity: &str, query: &str) -> Result<ExchangeReply, ExchangeError> {
        self.calls
            .lock()
            .unwrap()
            .push((identity.to_string(), query.to_string()));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ExchangeError::Transport("no scripted reply".to_string())))
    }
}
