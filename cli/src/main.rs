// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # CVM Attestation CLI
//!
//! The `cvm-attest` binary requests an attestation token for this
//! confidential VM and reports whether the guest is an Azure-compliant
//! SEV-SNP CVM.
//!
//! ## Usage
//!
//! ```text
//! cvm-attest -a <attestation-endpoint> -n <nonce> -p <price> -o <TOKEN|BOOL>
//! ```
//!
//! - `BOOL` (default) prints `true` or `false`
//! - `TOKEN` prints the raw token, or the failure description
//!
//! Logs go to stderr; stdout carries only the result line. Exit status is `0`
//! whenever a result line was printed, including `false`.

use anyhow::{Context, Result};
use clap::Parser;

use cvm_attestation::commands::{self, AttestArgs};

/// Confidential VM guest attestation
#[derive(Parser)]
#[command(name = "cvm-attest")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    attest: AttestArgs,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "CVM_ATTESTATION_LOG_LEVEL", default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    commands::attest::handle_command(cli.attest).await
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
