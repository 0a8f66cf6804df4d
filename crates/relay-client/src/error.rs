/// Coarse classification of a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The node was unreachable, erroring, or the call was abandoned.
    Transport,
    /// The node answered 2xx but the reply was unusable.
    Protocol,
    /// The call was rejected before anything was sent.
    Validation,
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    // ── Transport ─────────────────────────────────────────────────────────

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("call to {url} was cancelled")]
    Cancelled { url: String },

    #[error("call to {url} exceeded its deadline")]
    DeadlineExceeded { url: String },

    // ── Protocol ──────────────────────────────────────────────────────────

    #[error("malformed reply from {url}: {reason}")]
    Protocol {
        url: String,
        reason: String,
        /// Leading fragment of the response body.
        body: String,
    },

    // ── Validation ────────────────────────────────────────────────────────

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport { .. }
            | Self::Status { .. }
            | Self::Cancelled { .. }
            | Self::DeadlineExceeded { .. } => ErrorKind::Transport,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Validation(_) | Self::Config(_) => ErrorKind::Validation,
        }
    }

    pub fn is_transport(&self) -> bool {
        self.kind() == ErrorKind::Transport
    }

    pub fn is_protocol(&self) -> bool {
        self.kind() == ErrorKind::Protocol
    }

    /// True when the call context was cancelled or its deadline passed.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. } | Self::DeadlineExceeded { .. })
    }

    /// HTTP status of the reply, when one was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { source, .. } => source.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn protocol(url: &str, reason: impl ToString, body: &[u8], limit: usize) -> Self {
        Self::Protocol {
            url: url.to_string(),
            reason: reason.to_string(),
            body: body_fragment(body, limit),
        }
    }
}

/// First `limit` bytes of a body as (lossy) UTF-8.
pub(crate) fn body_fragment(body: &[u8], limit: usize) -> String {
    let end = body.len().min(limit);
    String::from_utf8_lossy(&body[..end]).into_owned()
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        let url = "http://node:9000/predict".to_string();
        assert_eq!(
            ClientError::Status { url: url.clone(), status: 500, body: String::new() }.kind(),
            ErrorKind::Transport
        );
        assert!(ClientError::Cancelled { url: url.clone() }.is_cancellation());
        assert!(ClientError::DeadlineExceeded { url: url.clone() }.is_transport());
        assert!(ClientError::protocol(&url, "bad", b"{", 16).is_protocol());
        assert_eq!(ClientError::Validation("x".into()).kind(), ErrorKind::Validation);
    }

    #[test]
    fn status_is_exposed() {
        let err = ClientError::Status { url: "u".into(), status: 503, body: "down".into() };
        assert_eq!(err.status(), Some(503));
        assert_eq!(ClientError::Cancelled { url: "u".into() }.status(), None);
    }

    #[test]
    fn fragment_is_capped() {
        assert_eq!(body_fragment(b"abcdef", 3), "abc");
        assert_eq!(body_fragment(b"ab", 8), "ab");
        assert_eq!(body_fragment(&[0xff, b'a'], 8), "\u{fffd}a");
    }
}
