// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Compliance Evaluation
//!
//! Microsoft Azure Attestation places the isolation details of a confidential
//! VM under a nested claim:
//!
//! ```text
//! {
//!   "x-ms-isolation-tee": {
//!     "x-ms-attestation-type": "sevsnpvm",
//!     "x-ms-compliance-status": "azure-compliant-cvm",
//!     ...
//!   },
//!   ...
//! }
//! ```
//!
//! A missing object, a missing field, or a field of the wrong type is not an
//! error: it means the token does not describe a compliant CVM and the
//! verdict is `false`.

use std::fmt;

use serde_json::Value;

pub const ISOLATION_TEE_CLAIM: &str = "x-ms-isolation-tee";
pub const ATTESTATION_TYPE_CLAIM: &str = "x-ms-attestation-type";
pub const COMPLIANCE_STATUS_CLAIM: &str = "x-ms-compliance-status";

pub const EXPECTED_ATTESTATION_TYPE: &str = "sevsnpvm";
pub const EXPECTED_COMPLIANCE_STATUS: &str = "azure-compliant-cvm";

/// Claims decoded from a token's payload segment.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsDocument(Value);

impl ClaimsDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `x-ms-isolation-tee` object, if present.
    pub fn isolation_tee(&self) -> Option<IsolationTee<'_>> {
        let tee = self.0.get(ISOLATION_TEE_CLAIM)?;
        Some(IsolationTee {
            attestation_type: tee.get(ATTESTATION_TYPE_CLAIM)?.as_str()?,
            compliance_status: tee.get(COMPLIANCE_STATUS_CLAIM)?.as_str()?,
        })
    }

    pub fn evaluate(&self) -> ComplianceVerdict {
        ComplianceVerdict::evaluate(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IsolationTee<'a> {
    pub attestation_type: &'a str,
    pub compliance_status: &'a str,
}

impl IsolationTee<'_> {
    pub fn is_compliant_sev_snp(&self) -> bool {
        self.attestation_type
            .eq_ignore_ascii_case(EXPECTED_ATTESTATION_TYPE)
            && self
                .compliance_status
                .eq_ignore_ascii_case(EXPECTED_COMPLIANCE_STATUS)
    }
}

/// Whether the claims describe an Azure-compliant SEV-SNP confidential VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ComplianceVerdict(bool);

impl ComplianceVerdict {
    pub const NON_COMPLIANT: Self = Self(false);

    pub fn evaluate(claims: &ClaimsDocument) -> Self {
        Self(
            claims
                .isolation_tee()
                .is_some_and(|tee| tee.is_compliant_sev_snp()),
        )
    }

    pub fn is_compliant(&self) -> bool {
        self.0
    }
}

impl From<ComplianceVerdict> for bool {
    fn from(verdict: ComplianceVerdict) -> Self {
        verdict.0
    }
}

impl fmt::Display for ComplianceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "true" } else { "false" })
    }
}
