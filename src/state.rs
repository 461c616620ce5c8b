//! Per-feature asynchronous operation state machine.
//!
//! Every feature controller owns one [`FetchState`] and is its only
//! writer. The machine enforces two rules: no transition skips `Pending`,
//! and a result is delivered only while `Pending` *and* only when it
//! carries the token minted for that `Pending` — anything else is a stale
//! response and is discarded.

/// Token minted for each `Pending` transition.
///
/// Tokens come from a per-machine generation counter that never repeats,
/// so a late response from a superseded request can never match the
/// current `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// The observable phase of one asynchronous operation.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchPhase<T> {
    /// Nothing requested yet, or reset.
    Idle,
    /// A request is in flight.
    Pending {
        /// Token the in-flight request must present to deliver a result.
        token: RequestToken,
    },
    /// The most recent request succeeded.
    Succeeded {
        /// The fetched value.
        value: T,
    },
    /// The most recent request failed.
    Failed {
        /// User-facing failure message.
        message: String,
    },
}

/// State machine for one feature's asynchronous operation.
#[derive(Debug, Clone)]
pub struct FetchState<T> {
    phase: FetchPhase<T>,
    generation: u64,
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FetchState<T> {
    /// A fresh machine in `Idle`.
    pub fn new() -> Self {
        Self {
            phase: FetchPhase::Idle,
            generation: 0,
        }
    }

    /// The current phase.
    pub fn phase(&self) -> &FetchPhase<T> {
        &self.phase
    }

    /// True while a request is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self.phase, FetchPhase::Pending { .. })
    }

    /// True in `Idle`.
    pub fn is_idle(&self) -> bool {
        matches!(self.phase, FetchPhase::Idle)
    }

    /// The success payload, if in `Succeeded`.
    pub fn value(&self) -> Option<&T> {
        match &self.phase {
            FetchPhase::Succeeded { value } => Some(value),
            _ => None,
        }
    }

    /// The failure message, if in `Failed`.
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FetchPhase::Failed { message } => Some(message),
            _ => None,
        }
    }

    /// Enter `Pending`, clearing any previous payload and minting a fresh
    /// token. Valid from every phase: `Idle` (first fetch), `Succeeded`
    /// (re-fetch), `Failed` (retry), and `Pending` (supersede).
    pub fn start(&mut self) -> RequestToken {
        self.generation += 1;
        let token = RequestToken(self.generation);
        self.phase = FetchPhase::Pending { token };
        token
    }

    /// Deliver a success for the request identified by `token`.
    ///
    /// Returns `false` — changing nothing — when the machine is no longer
    /// in the `Pending` that minted `token`.
    pub fn resolve(&mut self, token: RequestToken, value: T) -> bool {
        if !self.accepts(token) {
            return false;
        }
        self.phase = FetchPhase::Succeeded { value };
        true
    }

    /// Deliver a failure for the request identified by `token`.
    ///
    /// Returns `false` — changing nothing — when the machine is no longer
    /// in the `Pending` that minted `token`.
    pub fn reject(&mut self, token: RequestToken, message: impl Into<String>) -> bool {
        if !self.accepts(token) {
            return false;
        }
        self.phase = FetchPhase::Failed {
            message: message.into(),
        };
        true
    }

    /// Return to `Idle`, dropping any payload. The generation counter is
    /// kept so tokens are never reused across resets.
    pub fn reset(&mut self) {
        self.phase = FetchPhase::Idle;
    }

    fn accepts(&self, token: RequestToken) -> bool {
        matches!(self.phase, FetchPhase::Pending { token: current } if current == token)
    }
}
