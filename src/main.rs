//! Daemon entrypoint: line-delimited JSON-RPC 2.0 over stdio.
//!
//! stdout carries protocol traffic only; all diagnostics go to stderr.
//! Requests are handled one at a time, each running to completion on a
//! blocking worker before the next line is read.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

use sfx_daemon::config::{DaemonConfig, API_KEY_ENV};
use sfx_daemon::provider::ElevenLabsProxy;
use sfx_daemon::rpc;
use sfx_daemon::service::SfxService;

#[derive(Debug, Parser)]
#[command(
    name = "sfx-daemon",
    version,
    about = "Sound effect generation daemon backed by the ElevenLabs API"
)]
struct Args {
    /// Default directory for generated files (overrides SFX_OUTPUT_DIR).
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Maximum retries for transient provider errors.
    #[arg(long)]
    max_retries: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = DaemonConfig::from_env();
    if let Some(dir) = args.output_dir {
        config.output_root = dir;
    }
    if let Some(retries) = args.max_retries {
        config.max_retries = retries;
    }

    if !config.has_api_key() {
        eprintln!(
            "Warning: {} is not set. Generation requests will fail until it is configured.",
            API_KEY_ENV
        );
    }

    let default_root = config.output_root.clone();
    let service = Arc::new(SfxService::new(ElevenLabsProxy::new(config), default_root));

    eprintln!("sfx-daemon listening on stdio");

    let stdin = io::stdin();
    let mut lines = BufReader::new(stdin).lines();
    let mut stdout = io::stdout();

    while let Some(line) = lines
        .next_line()
        .await
        .context("failed to read request line")?
    {
        if line.trim().is_empty() {
            continue;
        }

        let service = Arc::clone(&service);
        let reply = tokio::task::spawn_blocking(move || rpc::handle_line(&line, service.as_ref()))
            .await
            .context("request handler panicked")?;

        if let Some(reply) = reply {
            stdout.write_all(reply.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
            stdout.flush().await?;
        }
    }

    eprintln!("stdin closed, shutting down");
    Ok(())
}
