// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # CVM Attestation Core
//!
//! Requests an attestation token for a confidential VM guest and decides,
//! from the token's claims, whether the guest runs inside a compliant
//! SEV-SNP trusted execution environment.
//!
//! # Architecture
//!
//! - **domain:** request payload, attestation outcome, compact token decoding,
//!   compliance evaluation and the [`domain::client::AttestationClient`] seam
//! - **application:** the attestation service that drives the pipeline
//! - **infrastructure:** the HTTP attestation sidecar collaborator

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
