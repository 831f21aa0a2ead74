// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Application services
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Drives the request → attest → decode → evaluate pipeline

pub mod attestation_service;

pub use attestation_service::{AttestationError, AttestationReport, AttestationService};
