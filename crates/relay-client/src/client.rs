//! REST client for pipeline nodes.
//!
//! Every operation is a `POST` of an encoded payload to the node's
//! operation path; every successful reply is decoded with the configured
//! codec before it is handed back. Calls hold no state beyond the immutable
//! configuration, so one [`RestClient`] is shared freely across tasks; the
//! connection pool lives in the injected `reqwest::Client`.
//!
//! Nothing is retried, cached or logged above `debug` here: failures go back
//! to the caller as a [`ClientError`].

use std::sync::Arc;

use bytes::Bytes;
use relay_codec::{Payload, PayloadCodec};
use relay_types::{EndpointPaths, Operation, TensorMessage};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use tracing::debug;

use crate::config::{ClientConfig, Scheme};
use crate::context::CallContext;
use crate::error::{body_fragment, ClientError, Result};
use crate::route::route_index;

/// A decoded 2xx reply.
struct Reply {
    url: String,
    raw: Bytes,
    msg: TensorMessage,
}

#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    codec: Arc<dyn PayloadCodec>,
    paths: EndpointPaths,
    scheme: Scheme,
    error_body_limit: usize,
}

impl RestClient {
    /// Validate `config` and build the client.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let http = match config.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| ClientError::Config(format!("cannot build HTTP client: {e}")))?,
        };

        Ok(Self {
            http,
            codec: config.codec,
            paths: config.paths,
            scheme: config.scheme,
            error_body_limit: config.error_body_limit,
        })
    }

    pub fn codec(&self) -> &dyn PayloadCodec {
        self.codec.as_ref()
    }

    // ── Operations ───────────────────────────────────────────────────────

    pub async fn predict(
        &self,
        ctx: &CallContext,
        host: &str,
        port: u16,
        payload: &Payload,
    ) -> Result<Payload> {
        self.call(ctx, Operation::Predict, host, port, std::slice::from_ref(payload))
            .await
    }

    pub async fn transform_input(
        &self,
        ctx: &CallContext,
        host: &str,
        port: u16,
        payload: &Payload,
    ) -> Result<Payload> {
        self.call(ctx, Operation::TransformInput, host, port, std::slice::from_ref(payload))
            .await
    }

    pub async fn transform_output(
        &self,
        ctx: &CallContext,
        host: &str,
        port: u16,
        payload: &Payload,
    ) -> Result<Payload> {
        self.call(ctx, Operation::TransformOutput, host, port, std::slice::from_ref(payload))
            .await
    }

    /// Ask a router node which child branch to take.
    pub async fn route(
        &self,
        ctx: &CallContext,
        host: &str,
        port: u16,
        payload: &Payload,
    ) -> Result<usize> {
        let reply = self
            .invoke(ctx, Operation::Route, host, port, std::slice::from_ref(payload))
            .await?;
        route_index(&reply.msg)
            .map_err(|e| ClientError::protocol(&reply.url, e, &reply.raw, self.error_body_limit))
    }

    /// Send two or more payloads, in order, to a combiner node.
    pub async fn combine(
        &self,
        ctx: &CallContext,
        host: &str,
        port: u16,
        payloads: &[Payload],
    ) -> Result<Payload> {
        self.call(ctx, Operation::Combine, host, port, payloads).await
    }

    /// Invoke `op` on `host:port`. Route replies are returned as payloads
    /// here; use [`route`](Self::route) for the branch index.
    pub async fn call(
        &self,
        ctx: &CallContext,
        op: Operation,
        host: &str,
        port: u16,
        inputs: &[Payload],
    ) -> Result<Payload> {
        let reply = self.invoke(ctx, op, host, port, inputs).await?;
        Ok(Payload::Bytes(reply.raw))
    }

    // ── Internals ────────────────────────────────────────────────────────

    /// Send the request and decode the 2xx reply.
    async fn invoke(
        &self,
        ctx: &CallContext,
        op: Operation,
        host: &str,
        port: u16,
        inputs: &[Payload],
    ) -> Result<Reply> {
        op.check_arity(inputs.len()).map_err(ClientError::Validation)?;

        let url = self.url(op, host, port);
        let body = self.request_body(op, inputs)?;
        debug!(%op, %url, inputs = inputs.len(), bytes = body.len(), "dispatching");

        let raw = ctx.run(&url, self.exchange(&url, body)).await?;
        let msg = self
            .codec
            .decode(&raw)
            .map_err(|e| ClientError::protocol(&url, e, &raw, self.error_body_limit))?;
        debug!(%op, %url, bytes = raw.len(), "reply decoded");

        Ok(Reply { url, raw, msg })
    }

    fn url(&self, op: Operation, host: &str, port: u16) -> String {
        let path = self.paths.path_for(op);
        if host.contains(':') && !host.starts_with('[') {
            format!("{}://[{}]:{}{}", self.scheme, host, port, path)
        } else {
            format!("{}://{}:{}{}", self.scheme, host, port, path)
        }
    }

    /// Encode the inputs for `op`. Blank wire parts are refused: spliced
    /// into a sequence they would leave the body unparseable.
    fn request_body(&self, op: Operation, inputs: &[Payload]) -> Result<Bytes> {
        let mut parts = Vec::with_capacity(inputs.len());
        for (i, payload) in inputs.iter().enumerate() {
            let part = payload.to_bytes(self.codec());
            if part.iter().all(u8::is_ascii_whitespace) {
                return Err(ClientError::Validation(format!("payload {i} is empty")));
            }
            parts.push(part);
        }

        if op.takes_sequence() {
            Ok(self.codec.encode_sequence(&parts))
        } else {
            // Arity was checked by the caller: exactly one input.
            Ok(parts.pop().unwrap_or_default())
        }
    }

    /// One HTTP round-trip. Non-2xx statuses become [`ClientError::Status`].
    async fn exchange(&self, url: &str, body: Bytes) -> Result<Bytes> {
        let content_type = self.codec.content_type();
        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, content_type)
            .header(ACCEPT, content_type)
            .body(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        let status = response.status();
        let reply = response
            .bytes()
            .await
            .map_err(|source| ClientError::Transport { url: url.to_string(), source })?;

        if !status.is_success() {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: body_fragment(&reply, self.error_body_limit),
            });
        }
        Ok(reply)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use relay_codec::JsonCodec;
    use relay_types::NdValue;

    fn client() -> RestClient {
        RestClient::new(ClientConfig::default()).unwrap()
    }

    #[test]
    fn urls_follow_paths() {
        let c = client();
        assert_eq!(c.url(Operation::Predict, "model-a", 9000), "http://model-a:9000/predict");
        assert_eq!(c.url(Operation::Combine, "10.0.0.2", 80), "http://10.0.0.2:80/aggregate");
        assert_eq!(c.url(Operation::TransformInput, "::1", 81), "http://[::1]:81/transform-input");

        let c = RestClient::new(ClientConfig {
            scheme: Scheme::Https,
            ..ClientConfig::default()
        })
        .unwrap();
        assert_eq!(c.url(Operation::Route, "r", 443), "https://r:443/route");
    }

    #[test]
    fn single_body_is_sent_verbatim() {
        let raw = r#" {"data":{"ndarray":[1.1,2.0]}}"#;
        let body = client()
            .request_body(Operation::Predict, &[Payload::from(raw)])
            .unwrap();
        assert_eq!(body.as_ref(), raw.as_bytes());
    }

    #[test]
    fn combine_body_keeps_input_order() {
        let first = TensorMessage::ndarray(vec![NdValue::Scalar(1.0)]);
        let second = TensorMessage::ndarray(vec![NdValue::Scalar(2.0)]);
        let body = client()
            .request_body(
                Operation::Combine,
                &[Payload::from(first.clone()), Payload::from(second.clone())],
            )
            .unwrap();
        assert_eq!(JsonCodec.decode_sequence(&body).unwrap(), vec![first, second]);
    }

    #[test]
    fn blank_parts_are_refused() {
        let c = client();
        let good = Payload::from(r#"{"data":{"ndarray":[1]}}"#);
        for blank in ["", " \n\t "] {
            let err = c
                .request_body(Operation::Combine, &[good.clone(), Payload::from(blank)])
                .unwrap_err();
            assert!(matches!(err, ClientError::Validation(ref m) if m == "payload 1 is empty"), "{err:?}");

            let err = c
                .request_body(Operation::Predict, &[Payload::from(blank)])
                .unwrap_err();
            assert!(matches!(err, ClientError::Validation(_)));
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let err = RestClient::new(ClientConfig {
            error_body_limit: 0,
            ..ClientConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[tokio::test]
    async fn combine_with_one_payload_is_rejected_before_sending() {
        // Nothing listens on port 9; a send attempt would surface as Transport.
        let err = client()
            .combine(&CallContext::background(), "127.0.0.1", 9, &[Payload::from("{}")])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Validation(_)));
    }

    #[tokio::test]
    async fn combine_with_an_empty_part_is_rejected_before_sending() {
        let inputs = [Payload::from(r#"{"data":{"ndarray":[1]}}"#), Payload::from(Bytes::new())];
        let err = client()
            .combine(&CallContext::background(), "127.0.0.1", 9, &inputs)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Validation);
    }
}
