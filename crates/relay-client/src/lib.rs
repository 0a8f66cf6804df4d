//! `relay-client` — call pipeline nodes over HTTP.
//!
//! A pipeline executor uses one [`RestClient`] to reach every node, whatever
//! role the node plays:
//!
//! | Operation | Inputs | Output |
//! |---|---|---|
//! | predict / transform-input / transform-output | 1 payload | 1 payload |
//! | route | 1 payload | branch index |
//! | combine | 2+ payloads | 1 payload |
//!
//! # Example
//! ```rust,no_run
//! use relay_client::{CallContext, ClientConfig, RestClient};
//! use relay_codec::Payload;
//! use std::time::Duration;
//!
//! # async fn run() -> Result<(), relay_client::ClientError> {
//! let client = RestClient::new(ClientConfig::default())?;
//! let ctx = CallContext::background().with_timeout(Duration::from_secs(5));
//! let input = Payload::from(r#"{"data":{"ndarray":[1.1,2.0]}}"#);
//!
//! let prediction = client.predict(&ctx, "model-a", 9000, &input).await?;
//! let branch = client.route(&ctx, "router", 9000, &prediction).await?;
//! # let _ = branch;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod route;

// ── Public re-exports ────────────────────────────────────────────────────────

pub use client::RestClient;
pub use config::{ClientConfig, Scheme};
pub use context::CallContext;
pub use error::{ClientError, ErrorKind, Result};
pub use route::{route_index, RouteError};
pub use tokio_util::sync::CancellationToken;
