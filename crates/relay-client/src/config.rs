// Client configuration: transport, codec, endpoint layout.

use std::fmt;
use std::sync::Arc;

use relay_codec::{JsonCodec, PayloadCodec};
use relay_types::EndpointPaths;

use crate::error::{ClientError, Result};

/// Default cap on how much of an error body is kept for diagnosis.
pub const DEFAULT_ERROR_BODY_LIMIT: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Http => "http",
            Self::Https => "https",
        })
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Injected HTTP client. Carries the connection pool, TLS policy and any
    /// client-wide timeout. `None` builds a default client with no timeout.
    pub http: Option<reqwest::Client>,

    /// Codec for request and response bodies. Default: [`JsonCodec`].
    pub codec: Arc<dyn PayloadCodec>,

    /// Path served for each operation.
    pub paths: EndpointPaths,

    pub scheme: Scheme,

    /// Bytes of a failing response body kept in the error.
    /// Default: 1 KiB.
    pub error_body_limit: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            http: None,
            codec: Arc::new(JsonCodec),
            paths: EndpointPaths::default(),
            scheme: Scheme::Http,
            error_body_limit: DEFAULT_ERROR_BODY_LIMIT,
        }
    }
}

impl ClientConfig {
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    pub fn with_codec(mut self, codec: Arc<dyn PayloadCodec>) -> Self {
        self.codec = codec;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.paths.validate().map_err(ClientError::Config)?;
        if self.error_body_limit == 0 {
            return Err(ClientError::Config("error_body_limit must be > 0".into()));
        }
        Ok(())
    }
}
