// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the attestation CLI

pub mod attest;

pub use self::attest::AttestArgs;
