// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Attestation Service
//!
//! Runs one attestation cycle against an injected [`AttestationClient`]:
//!
//! ```text
//! AttestationRequest
//!   │  to_payload()                   canonical JSON
//!   ▼
//! AttestationService::invoke()
//!   1. client.attest(ClientParameters)
//!   2. TokenLease copies the token, frees the collaborator buffer
//!   ──────────────────────────────────────────────────────────────
//!   AttestationOutcome::Success { token } | ::Failure(..)
//!   ▼
//! AttestationService::attest()
//!   3. CompactToken::decode_claims()  malformed token → fatal error
//!   4. ComplianceVerdict::evaluate()  missing claims → false
//!   ▼
//! AttestationReport { outcome, verdict }
//! ```
//!
//! A collaborator failure is not an error here. It is carried in the report
//! and the verdict is skipped.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::claims::ComplianceVerdict;
use crate::domain::client::{AttestationClient, ClientError, ClientParameters, TokenLease};
use crate::domain::outcome::AttestationOutcome;
use crate::domain::request::{AttestationRequest, ValueFormatError};
use crate::domain::token::{CompactToken, MalformedTokenError};

#[derive(Debug, Error)]
pub enum AttestationError {
    #[error(transparent)]
    ValueFormat(#[from] ValueFormatError),

    #[error(transparent)]
    MalformedToken(#[from] MalformedTokenError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to serialize attestation request: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Everything one attestation cycle produced.
#[derive(Debug, Clone, PartialEq)]
pub struct AttestationReport {
    pub outcome: AttestationOutcome,
    /// `None` when the collaborator failed and evaluation was skipped.
    pub verdict: Option<ComplianceVerdict>,
}

impl AttestationReport {
    /// The verdict, with a skipped evaluation counting as non-compliant.
    pub fn is_compliant(&self) -> bool {
        self.verdict.is_some_and(|verdict| verdict.is_compliant())
    }
}

/// Owns the collaborator for its whole lifetime; dropping the service
/// uninitializes the client.
pub struct AttestationService<C: AttestationClient> {
    client: C,
}

impl<C: AttestationClient> AttestationService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Hand the request to the collaborator and take ownership of the token.
    pub async fn invoke(
        &self,
        endpoint_url: &str,
        request: &AttestationRequest,
    ) -> Result<AttestationOutcome, AttestationError> {
        let payload = request.to_payload()?;
        debug!(endpoint = %endpoint_url, payload = %payload, "Requesting attestation token");

        let params = ClientParameters::new(endpoint_url, &payload);
        match self.client.attest(&params).await {
            Ok(buffer) => {
                let lease = TokenLease::new(&self.client, buffer);
                let token = lease.to_token()?;
                info!(endpoint = %endpoint_url, "Attestation succeeded");
                Ok(AttestationOutcome::Success { token })
            }
            Err(failure) => {
                warn!(
                    endpoint = %endpoint_url,
                    code = failure.code,
                    description = %failure.description,
                    "Attestation failed"
                );
                Ok(AttestationOutcome::Failure(failure))
            }
        }
    }

    /// Run the full cycle: invoke, then decode and evaluate a returned token.
    pub async fn attest(
        &self,
        endpoint_url: &str,
        request: &AttestationRequest,
    ) -> Result<AttestationReport, AttestationError> {
        let outcome = self.invoke(endpoint_url, request).await?;

        let verdict = match &outcome {
            AttestationOutcome::Success { token } => {
                let claims = CompactToken::new(token).decode_claims()?;
                let verdict = claims.evaluate();
                debug!(
                    compliant = verdict.is_compliant(),
                    isolation_tee = ?claims.isolation_tee(),
                    "Evaluated attestation claims"
                );
                Some(verdict)
            }
            AttestationOutcome::Failure(_) => None,
        };

        Ok(AttestationReport { outcome, verdict })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::client::tests::FakeClient;
    use crate::domain::token::tests::make_token;
    use serde_json::{json, Value};

    const ENDPOINT: &str = "https://sharedeus2.eus2.attest.azure.net/";

    fn request() -> AttestationRequest {
        AttestationRequest::build("abc123", Some("10.5")).unwrap()
    }

    fn compliant_token() -> String {
        make_token(&json!({
            "x-ms-isolation-tee": {
                "x-ms-attestation-type": "sevsnpvm",
                "x-ms-compliance-status": "azure-compliant-cvm",
            }
        }))
    }

    #[tokio::test]
    async fn test_invoke_passes_payload_and_endpoint() {
        let service = AttestationService::new(FakeClient::returning(compliant_token()));
        let request = request();
        service.invoke(ENDPOINT, &request).await.unwrap();

        let calls = service.client().payloads.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        let (endpoint, payload, version) = &calls[0];
        assert_eq!(endpoint, ENDPOINT);
        assert_eq!(*version, 1);
        let payload: Value = serde_json::from_str(payload).unwrap();
        assert_eq!(payload["nonce"], json!("abc123"));
        assert_eq!(payload["price"], json!(10.5));
        assert_eq!(payload["timestamp"], json!(request.timestamp()));
    }

    #[tokio::test]
    async fn test_compliant_token_yields_true() {
        let token = compliant_token();
        let service = AttestationService::new(FakeClient::returning(token.clone()));
        let report = service.attest(ENDPOINT, &request()).await.unwrap();

        assert_eq!(report.outcome, AttestationOutcome::Success { token });
        assert!(report.is_compliant());
        assert_eq!(service.client().free_count(), 1);
    }

    #[tokio::test]
    async fn test_token_without_isolation_claims_yields_false() {
        let token = make_token(&json!({ "x-ms-ver": "1.0" }));
        let service = AttestationService::new(FakeClient::returning(token));
        let report = service.attest(ENDPOINT, &request()).await.unwrap();

        assert_eq!(report.verdict, Some(ComplianceVerdict::NON_COMPLIANT));
        assert!(!report.is_compliant());
    }

    #[tokio::test]
    async fn test_collaborator_failure_skips_evaluation() {
        let service = AttestationService::new(FakeClient::failing(7, "Failed to get attestation token"));
        let report = service.attest(ENDPOINT, &request()).await.unwrap();

        match &report.outcome {
            AttestationOutcome::Failure(failure) => {
                assert_eq!(failure.code, 7);
                assert_eq!(failure.description, "Failed to get attestation token");
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert_eq!(report.verdict, None);
        assert!(!report.is_compliant());
        assert_eq!(service.client().free_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_token_is_fatal_and_buffer_is_freed() {
        let service = AttestationService::new(FakeClient::returning("header.payload"));
        let err = service.attest(ENDPOINT, &request()).await.unwrap_err();

        assert!(matches!(
            err,
            AttestationError::MalformedToken(MalformedTokenError::TooFewSegments { found: 2 })
        ));
        assert_eq!(service.client().free_count(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_token_is_fatal_and_buffer_is_freed() {
        let service = AttestationService::new(FakeClient::returning(vec![b'a', 0xff, b'.']));
        let err = service.invoke(ENDPOINT, &request()).await.unwrap_err();

        assert!(matches!(
            err,
            AttestationError::MalformedToken(MalformedTokenError::NotUtf8)
        ));
        assert_eq!(service.client().free_count(), 1);
    }

    #[tokio::test]
    async fn test_unparsable_claims_are_fatal() {
        let service = AttestationService::new(FakeClient::returning("e30.bm90IGpzb24.sig"));
        let err = service.attest(ENDPOINT, &request()).await.unwrap_err();
        assert!(matches!(
            err,
            AttestationError::MalformedToken(MalformedTokenError::PayloadJson(_))
        ));
    }
}
