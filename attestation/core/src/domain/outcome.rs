// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::fmt;

/// Failure reported by the attestation collaborator.
///
/// `code` is the collaborator's own error code (an HTTP status for the
/// sidecar client, `-1` when no code is available).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttestationFailure {
    pub code: i32,
    pub description: String,
}

impl AttestationFailure {
    pub fn new(code: i32, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
        }
    }
}

impl fmt::Display for AttestationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.description, self.code)
    }
}

/// Result of one attestation invocation. Failures are data, not errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttestationOutcome {
    Success { token: String },
    Failure(AttestationFailure),
}

impl AttestationOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn token(&self) -> Option<&str> {
        match self {
            Self::Success { token } => Some(token),
            Self::Failure(_) => None,
        }
    }
}
