//! Ordered conversational transcript for the Q&A feature.
//!
//! The transcript is append-only: submitting a question appends a user
//! turn and a pending assistant placeholder, and the only mutation after
//! that is the single in-place resolution of the placeholder. Failures
//! are absorbed into the transcript as the assistant's own reply rather
//! than surfaced separately — a chat expects the assistant to report its
//! own trouble.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::error::GatewayError;
use crate::gateway::Backend;
use crate::state::{FetchState, RequestToken};

/// Fixed assistant reply used when the backend call fails.
const ANSWER_FAILED: &str = "Sorry, I encountered an error. Please try again.";

/// Who authored a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person asking.
    User,
    /// The answering backend.
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// One turn in the transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who authored the turn.
    pub role: Role,
    /// The turn text; empty while this is the pending placeholder.
    pub text: String,
    /// True while this is the in-flight assistant placeholder.
    pub pending: bool,
    /// When the turn was appended (or, for the placeholder, resolved).
    pub created_at: DateTime<Utc>,
}

impl ConversationTurn {
    fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            pending: false,
            created_at: Utc::now(),
        }
    }

    fn pending_assistant() -> Self {
        Self {
            role: Role::Assistant,
            text: String::new(),
            pending: true,
            created_at: Utc::now(),
        }
    }
}

/// Maintains the append-only Q&A transcript.
pub struct ConversationController {
    gateway: Arc<dyn Backend>,
    transcript: Vec<ConversationTurn>,
    state: FetchState<()>,
}

impl ConversationController {
    pub fn new(gateway: Arc<dyn Backend>) -> Self {
        Self {
            gateway,
            transcript: Vec::new(),
            state: FetchState::new(),
        }
    }

    /// The transcript, in causal submission order.
    pub fn transcript(&self) -> &[ConversationTurn] {
        &self.transcript
    }

    /// True while an answer is outstanding.
    pub fn is_pending(&self) -> bool {
        self.state.is_pending()
    }

    /// First half of [`submit`](Self::submit). Appends the user turn and
    /// the assistant placeholder and returns the request token. Returns
    /// `None` — leaving the transcript untouched — for blank input or
    /// while an earlier submission is still pending (submissions are
    /// serialized to preserve turn ordering).
    pub fn begin_submit(&mut self, text: &str) -> Option<RequestToken> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        if self.state.is_pending() {
            tracing::debug!("previous answer still pending; rejecting submission");
            return None;
        }
        self.transcript.push(ConversationTurn::user(text));
        self.transcript.push(ConversationTurn::pending_assistant());
        Some(self.state.start())
    }

    /// Second half of [`submit`](Self::submit): resolve the placeholder
    /// in place with the answer, or with the fixed error reply. Stale
    /// outcomes are discarded; returns whether the outcome was applied.
    pub fn finish_submit(&mut self, token: RequestToken, result: Result<String, GatewayError>) -> bool {
        let (applied, text) = match result {
            Ok(answer) => (self.state.resolve(token, ()), answer),
            Err(e) => {
                tracing::warn!(error = %e, "query failed");
                (self.state.reject(token, ANSWER_FAILED), ANSWER_FAILED.to_owned())
            }
        };
        if !applied {
            return false;
        }
        if let Some(turn) = self.transcript.iter_mut().rev().find(|turn| turn.pending) {
            turn.text = text;
            turn.pending = false;
            turn.created_at = Utc::now();
        }
        true
    }

    /// Submit a question. Returns whether a request was issued; blank
    /// input and double submission are no-ops.
    pub async fn submit(&mut self, text: &str) -> bool {
        let Some(token) = self.begin_submit(text) else {
            return false;
        };
        let query = text.trim().to_owned();
        let result = self.gateway.ask_query(&query).await;
        self.finish_submit(token, result);
        true
    }

    /// Clear the transcript for a fresh session.
    pub fn reset(&mut self) {
        self.transcript.clear();
        self.state.reset();
    }
}
