//! One request/response cycle against the `/chat` endpoint.

use crate::error::{ExchangeError, GENERIC_FAILURE};
use crate::history::HistoryEntry;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

/// A successful answer, with any past exchanges the server returned.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExchangeReply {
    pub response: String,
    pub history: Vec<HistoryEntry>,
}

/// Something that can answer a question for an employee.
///
/// Implementations make exactly one attempt per call.
#[async_trait]
pub trait Exchange: Send + Sync {
    async fn send(&self, identity: &str, query: &str) -> Result<ExchangeReply, ExchangeError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    employee_id: &'a str,
    query: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
    #[serde(default)]
    history: Option<Vec<HistoryEntry>>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// [`Exchange`] over HTTP: `POST {endpoint}/chat`.
#[derive(Clone)]
pub struct HttpExchange {
    client: Client,
    url: String,
}

impl HttpExchange {
    pub fn new(endpoint: &str) -> Self {
        Self {
            client: Client::new(),
            url: format!("{}/chat", endpoint.trim_end_matches('/')),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Exchange for HttpExchange {
    #[instrument(skip(self, query))]
    async fn send(&self, identity: &str, query: &str) -> Result<ExchangeReply, ExchangeError> {
        let response = self
            .client
            .post(&self.url)
            .json(&ChatRequest {
                employee_id: identity,
                query,
            })
            .send()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ExchangeError::Transport(e.to_string()))?;
        debug!(url = %self.url, status = status.as_u16(), bytes = body.len(), "received /chat response");

        if !status.is_success() {
            let message = error_message(&body).unwrap_or_else(|| GENERIC_FAILURE.to_string());
            warn!(status = status.as_u16(), %message, "/chat returned an error status");
            return Err(ExchangeError::Status {
                status: status.as_u16(),
                message,
            });
        }

        // A success status carrying only `{ "error": ... }` still reports the
        // server's message.
        parse_reply(&body).map_err(|e| match error_message(&body) {
            Some(message) => ExchangeError::Status {
                status: status.as_u16(),
                message,
            },
            None => e,
        })
    }
}

/// The body's `error` string, when it carries one with any text.
fn error_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}

/// Strictly decodes a success body.
pub(crate) fn parse_reply(body: &[u8]) -> Result<ExchangeReply, ExchangeError> {
    let parsed: ChatResponse = serde_json::from_slice(body).map_err(|e| {
        warn!(error = %e, "malformed /chat response");
        ExchangeError::Malformed(e.to_string())
    })?;
    Ok(ExchangeReply {
        response: parsed.response,
        history: parsed.history.unwrap_or_default(),
    })
}
