// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Attestation Sidecar Client
//!
//! Talks to a confidential-containers attestation sidecar running next to the
//! guest workload. The sidecar gathers the hardware evidence and exchanges it
//! with Microsoft Azure Attestation:
//!
//! ```text
//! POST {sidecar}/attest/maa
//! { "maa_endpoint": "sharedeus2.eus2.attest.azure.net",
//!   "runtime_data": "<base64 client payload>" }
//!
//! 200 { "token": "<header>.<claims>.<signature>" }
//! ```
//!
//! Any non-2xx reply or transport error is reported as an
//! [`AttestationFailure`], never retried.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use tracing::{info, trace};
use url::Url;

use crate::domain::client::{AttestationClient, ClientError, ClientParameters};
use crate::domain::outcome::AttestationFailure;

pub const DEFAULT_SIDECAR_URL: &str = "http://localhost:8080";

const ATTEST_MAA_PATH: &str = "/attest/maa";
const TRANSPORT_FAILURE_CODE: i32 = -1;

#[derive(Debug, Serialize)]
struct MaaAttestRequest {
    maa_endpoint: String,
    runtime_data: String,
}

#[derive(Debug, Deserialize)]
struct MaaAttestResponse {
    token: String,
}

pub struct SidecarAttestationClient {
    http: reqwest::Client,
    attest_url: Url,
}

impl SidecarAttestationClient {
    pub fn initialize(sidecar_url: &str) -> Result<Self, ClientError> {
        let base = Url::parse(sidecar_url).map_err(|e| {
            ClientError::InitializationFailed(format!("invalid sidecar url '{}': {}", sidecar_url, e))
        })?;
        let attest_url = base.join(ATTEST_MAA_PATH).map_err(|e| {
            ClientError::InitializationFailed(format!("invalid sidecar url '{}': {}", sidecar_url, e))
        })?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| ClientError::InitializationFailed(e.to_string()))?;

        info!(sidecar = %attest_url, "Attestation sidecar client initialized");
        Ok(Self { http, attest_url })
    }
}

/// The sidecar expects a bare `host[:port]`, not a URL.
fn maa_endpoint(attestation_endpoint_url: &str) -> String {
    match Url::parse(attestation_endpoint_url) {
        Ok(url) => match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            _ => attestation_endpoint_url.trim_end_matches('/').to_string(),
        },
        Err(_) => attestation_endpoint_url.trim_end_matches('/').to_string(),
    }
}

#[async_trait]
impl AttestationClient for SidecarAttestationClient {
    type Buffer = Vec<u8>;

    async fn attest(
        &self,
        params: &ClientParameters<'_>,
    ) -> Result<Vec<u8>, AttestationFailure> {
        let body = MaaAttestRequest {
            maa_endpoint: maa_endpoint(params.attestation_endpoint_url),
            runtime_data: STANDARD.encode(params.client_payload),
        };

        let response = self
            .http
            .post(self.attest_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                AttestationFailure::new(
                    TRANSPORT_FAILURE_CODE,
                    format!("Failed to reach attestation sidecar: {}", e),
                )
            })?;

        let status = response.status();
        let code = i32::from(status.as_u16());
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let description = match text.trim() {
                "" => format!("Attestation sidecar returned {}", status),
                message => message.to_string(),
            };
            return Err(AttestationFailure::new(code, description));
        }

        let reply: MaaAttestResponse = response.json().await.map_err(|e| {
            AttestationFailure::new(code, format!("Invalid attestation sidecar response: {}", e))
        })?;

        Ok(reply.token.into_bytes())
    }

    fn free(&self, buffer: Vec<u8>) {
        trace!(bytes = buffer.len(), "Releasing sidecar token buffer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use mockito::Matcher;
    use serde_json::json;

    const ENDPOINT: &str = "https://sharedeus2.eus2.attest.azure.net/";
    const PAYLOAD: &str = r#"{"nonce":"abc123","price":10.5,"timestamp":1767225600}"#;

    #[test]
    fn test_maa_endpoint_strips_scheme_and_path() {
        assert_eq!(maa_endpoint(ENDPOINT), "sharedeus2.eus2.attest.azure.net");
        assert_eq!(maa_endpoint("https://maa.example:8443/"), "maa.example:8443");
        assert_eq!(maa_endpoint("sharedeus2.eus2.attest.azure.net/"), "sharedeus2.eus2.attest.azure.net");
    }

    #[test]
    fn test_initialize_rejects_invalid_url() {
        assert!(matches!(
            SidecarAttestationClient::initialize("not a url"),
            Err(ClientError::InitializationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_attest_returns_token_from_sidecar() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/attest/maa")
            .match_body(Matcher::Json(json!({
                "maa_endpoint": "sharedeus2.eus2.attest.azure.net",
                "runtime_data": STANDARD.encode(PAYLOAD),
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"token":"aGVhZGVy.Y2xhaW1z.c2ln"}"#)
            .create_async()
            .await;

        let client = SidecarAttestationClient::initialize(&server.url()).unwrap();
        let buffer = client
            .attest(&ClientParameters::new(ENDPOINT, PAYLOAD))
            .await
            .unwrap();

        assert_eq!(buffer, b"aGVhZGVy.Y2xhaW1z.c2ln");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_becomes_failure_with_body() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attest/maa")
            .with_status(500)
            .with_body("Failed to fetch attestation report\n")
            .create_async()
            .await;

        let client = SidecarAttestationClient::initialize(&server.url()).unwrap();
        let failure = client
            .attest(&ClientParameters::new(ENDPOINT, PAYLOAD))
            .await
            .unwrap_err();

        assert_eq!(failure.code, 500);
        assert_eq!(failure.description, "Failed to fetch attestation report");
    }

    #[tokio::test]
    async fn test_error_status_without_body_describes_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attest/maa")
            .with_status(503)
            .create_async()
            .await;

        let client = SidecarAttestationClient::initialize(&server.url()).unwrap();
        let failure = client
            .attest(&ClientParameters::new(ENDPOINT, PAYLOAD))
            .await
            .unwrap_err();

        assert_eq!(failure.code, 503);
        assert!(failure.description.contains("503"));
    }

    #[tokio::test]
    async fn test_unexpected_reply_shape_is_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/attest/maa")
            .with_status(200)
            .with_body(r#"{"jwt":"a.b.c"}"#)
            .create_async()
            .await;

        let client = SidecarAttestationClient::initialize(&server.url()).unwrap();
        let failure = client
            .attest(&ClientParameters::new(ENDPOINT, PAYLOAD))
            .await
            .unwrap_err();

        assert_eq!(failure.code, 200);
        assert!(failure.description.starts_with("Invalid attestation sidecar response"));
    }

    #[tokio::test]
    async fn test_unreachable_sidecar_is_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client =
            SidecarAttestationClient::initialize(&format!("http://127.0.0.1:{port}")).unwrap();
        let failure = client
            .attest(&ClientParameters::new(ENDPOINT, PAYLOAD))
            .await
            .unwrap_err();

        assert_eq!(failure.code, -1);
        assert!(failure.description.starts_with("Failed to reach attestation sidecar"));
    }
}
