// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod sidecar;

pub use sidecar::{SidecarAttestationClient, DEFAULT_SIDECAR_URL};
