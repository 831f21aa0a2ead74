// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain model for a single attestation request/response cycle.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Values and rules that do not depend on any collaborator

pub mod request;
pub mod outcome;
pub mod token;
pub mod claims;
pub mod client;
