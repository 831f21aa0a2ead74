// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Attest command
//!
//! Builds the request before any client is created, so a bad `--price`
//! aborts without touching the attestation collaborator.

use std::io::Write;

use anyhow::{Context, Result};
use clap::Args;
use tracing::debug;

use cvm_attestation_core::application::AttestationService;
use cvm_attestation_core::domain::client::AttestationClient;
use cvm_attestation_core::domain::request::AttestationRequest;
use cvm_attestation_core::infrastructure::{SidecarAttestationClient, DEFAULT_SIDECAR_URL};

use crate::output::{self, OutputMode};

/// Shared Microsoft Azure Attestation instance for East US 2.
pub const DEFAULT_ATTESTATION_URL: &str = "https://sharedeus2.eus2.attest.azure.net/";

#[derive(Debug, Args)]
pub struct AttestArgs {
    /// Attestation service endpoint
    #[arg(
        short = 'a',
        long = "attestation-url",
        env = "CVM_ATTESTATION_URL",
        value_name = "URL",
        default_value = DEFAULT_ATTESTATION_URL
    )]
    pub attestation_url: String,

    /// Opaque nonce bound into the attestation
    #[arg(
        short = 'n',
        long,
        env = "CVM_ATTESTATION_NONCE",
        value_name = "NONCE",
        default_value = ""
    )]
    pub nonce: String,

    /// Decimal value bound into the attestation (null when absent)
    #[arg(
        short = 'p',
        long,
        env = "CVM_ATTESTATION_PRICE",
        value_name = "PRICE",
        allow_hyphen_values = true
    )]
    pub price: Option<String>,

    /// Output format: TOKEN prints the raw token, anything else prints true/false
    #[arg(
        short = 'o',
        long = "output",
        env = "CVM_ATTESTATION_OUTPUT",
        value_name = "TOKEN|BOOL",
        default_value_t = OutputMode::Bool
    )]
    pub output: OutputMode,

    /// Attestation sidecar base URL
    #[arg(
        long,
        env = "CVM_ATTESTATION_SIDECAR_URL",
        value_name = "URL",
        default_value = DEFAULT_SIDECAR_URL
    )]
    pub sidecar_url: String,
}

impl AttestArgs {
    /// The attestation endpoint, falling back to the default when blank.
    pub fn endpoint(&self) -> &str {
        if self.attestation_url.is_empty() {
            DEFAULT_ATTESTATION_URL
        } else {
            &self.attestation_url
        }
    }
}

pub async fn handle_command(args: AttestArgs) -> Result<()> {
    let request = AttestationRequest::build(&args.nonce, args.price.as_deref())
        .context("Error converting price")?;
    debug!(sidecar = %args.sidecar_url, endpoint = %args.endpoint(), "Starting attestation");

    let client = SidecarAttestationClient::initialize(&args.sidecar_url)
        .context("Failed to create attestation client object")?;

    let mut stdout = std::io::stdout();
    run(client, args.endpoint(), &request, args.output, &mut stdout).await
}

/// Attest with `client` and write the result line to `out`.
///
/// The client is uninitialized once the line has been written.
pub async fn run<C, W>(
    client: C,
    endpoint: &str,
    request: &AttestationRequest,
    mode: OutputMode,
    out: &mut W,
) -> Result<()>
where
    C: AttestationClient,
    W: Write,
{
    let service = AttestationService::new(client);
    let report = service
        .attest(endpoint, request)
        .await
        .context("Attestation run failed")?;

    output::write_report(out, mode, &report).context("Failed to write output")?;
    Ok(())
}
