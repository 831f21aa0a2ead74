// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Result rendering
//!
//! Exactly one line goes to stdout per run. In `TOKEN` mode a failed
//! attestation prints the failure description in place of the token, so the
//! two cases differ only by content.
//!
//! Only `TOKEN` (any case) selects token output. Every other `-o` value,
//! including misspellings, renders the boolean verdict.

use std::convert::Infallible;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use cvm_attestation_core::application::AttestationReport;
use cvm_attestation_core::domain::claims::ComplianceVerdict;
use cvm_attestation_core::domain::outcome::AttestationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Print the raw attestation token
    Token,
    /// Print whether the guest is a compliant SEV-SNP CVM
    #[default]
    Bool,
}

impl FromStr for OutputMode {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("TOKEN") {
            Ok(Self::Token)
        } else {
            Ok(Self::Bool)
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Token => write!(f, "TOKEN"),
            Self::Bool => write!(f, "BOOL"),
        }
    }
}

pub fn render(
    mode: OutputMode,
    outcome: &AttestationOutcome,
    verdict: Option<ComplianceVerdict>,
) -> String {
    match (mode, outcome) {
        (OutputMode::Token, AttestationOutcome::Success { token }) => token.clone(),
        (OutputMode::Token, AttestationOutcome::Failure(failure)) => failure.description.clone(),
        (OutputMode::Bool, _) => verdict.unwrap_or_default().to_string(),
    }
}

pub fn write_report<W: Write>(
    out: &mut W,
    mode: OutputMode,
    report: &AttestationReport,
) -> io::Result<()> {
    writeln!(out, "{}", render(mode, &report.outcome, report.verdict))?;
    out.flush()
}
