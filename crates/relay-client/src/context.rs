//! Per-call cancellation and deadlines.
//!
//! A [`CallContext`] is handed to every client call. The call races the
//! request against the context: if the token is cancelled or the deadline
//! passes first, the request future is dropped (aborting the connection) and
//! the call fails with a transport-kind error.
//!
//! No deadline is imposed unless one is set here or on the injected HTTP
//! client.

use std::future::Future;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// Wrap an existing token, e.g. one shared with the rest of a pipeline run.
    pub fn with_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Set a deadline `timeout` from now. An earlier existing deadline wins.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_deadline(Instant::now() + timeout)
    }

    /// Set an absolute deadline. An earlier existing deadline wins.
    pub fn with_deadline(mut self, at: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(at),
            None => at,
        });
        self
    }

    /// Derive a context that is cancelled whenever this one is, but whose own
    /// cancellation does not propagate back.
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Drive `call` to completion unless the context ends first.
    pub(crate) async fn run<T, F>(&self, url: &str, call: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        let expired = async {
            match self.deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(ClientError::Cancelled { url: url.to_string() }),
            _ = expired => Err(ClientError::DeadlineExceeded { url: url.to_string() }),
            out = call => out,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
