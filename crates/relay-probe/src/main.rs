//! relay-probe — call one pipeline node by hand.
//!
//! ```bash
//! # Predict against a local model node
//! RUST_LOG=debug relay-probe predict --port 9000 --body '{"data":{"ndarray":[[1.1,2.0]]}}'
//!
//! # Combine two inputs, order preserved
//! relay-probe combine --host combiner --port 9000 --body "$A" --body "$B"
//!
//! # Ask a router for a branch, giving up after 500 ms
//! relay-probe route --port 9001 --body-file request.json --timeout-ms 500
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relay_client::{CallContext, ClientConfig, ClientError, RestClient, Scheme};
use relay_codec::Payload;
use relay_types::Operation;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(
    name    = "relay-probe",
    version = env!("CARGO_PKG_VERSION"),
    about   = "Call one pipeline node and print its reply"
)]
struct Cli {
    /// predict | transform-input | transform-output | route | combine
    operation: Operation,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long)]
    port: u16,

    /// JSON request body. Repeat for combine.
    #[arg(long = "body")]
    bodies: Vec<String>,

    /// Read a request body from a file. Repeatable; appended after `--body`.
    #[arg(long = "body-file")]
    body_files: Vec<PathBuf>,

    /// Abandon the call after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Call the node over https.
    #[arg(long)]
    tls: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    // Default log level: INFO. RUST_LOG=relay_client=debug shows each request.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli      = Cli::parse();
    let payloads = load_payloads(&cli)?;

    let client = RestClient::new(ClientConfig {
        scheme: if cli.tls { Scheme::Https } else { Scheme::Http },
        ..ClientConfig::default()
    })?;

    let mut ctx = CallContext::background();
    if let Some(ms) = cli.timeout_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }

    let canceller = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Ctrl-C — cancelling call");
            canceller.cancel();
        }
    });

    info!(
        op = %cli.operation,
        host = %cli.host,
        port = cli.port,
        inputs = payloads.len(),
        "calling node"
    );

    match cli.operation {
        Operation::Route => {
            let payload = payloads.first().context("route needs a body")?;
            let branch = client
                .route(&ctx, &cli.host, cli.port, payload)
                .await
                .map_err(report)?;
            println!("{branch}");
        }
        op => {
            let reply = client
                .call(&ctx, op, &cli.host, cli.port, &payloads)
                .await
                .map_err(report)?;
            let msg = reply.to_message(client.codec())?;
            info!(shape = ?msg.data.shape(), names = ?msg.names, "reply decoded");
            println!("{}", String::from_utf8_lossy(&reply.to_bytes(client.codec())));
        }
    }
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Collect `--body` then `--body-file` inputs and check the count suits the
/// operation before anything is sent.
fn load_payloads(cli: &Cli) -> Result<Vec<Payload>> {
    let mut payloads: Vec<Payload> = cli
        .bodies
        .iter()
        .map(|body| Payload::from(body.clone().into_bytes()))
        .collect();

    for path in &cli.body_files {
        let bytes = std::fs::read(path)
            .with_context(|| format!("reading body file {}", path.display()))?;
        payloads.push(Payload::from(bytes));
    }

    cli.operation
        .check_arity(payloads.len())
        .map_err(anyhow::Error::msg)?;
    Ok(payloads)
}

/// Prefix the error with its kind so scripts can tell transport from
/// protocol failures.
fn report(err: ClientError) -> anyhow::Error {
    let kind = err.kind();
    anyhow::Error::new(err).context(format!("{kind:?} error"))
}
