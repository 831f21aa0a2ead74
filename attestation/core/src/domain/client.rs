// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Attestation Client (Anti-Corruption Layer)
//!
//! [`AttestationClient`] is the seam to the external attestation collaborator,
//! the component that gathers TEE evidence, talks to the attestation service
//! and hands back a signed token. The collaborator owns the buffer holding the
//! token until it is given back through [`AttestationClient::free`].
//!
//! ## Lifecycle
//!
//! ```text
//! Client::initialize(..)          ← collaborator Initialize
//!   └─ client.attest(params)      → Buffer (collaborator owned)
//!        └─ TokenLease::new(..)   ← copy token into a String
//!        └─ drop(lease)           → client.free(buffer), exactly once
//! drop(client)                    ← collaborator Uninitialize
//! ```
//!
//! Implementations live in [`crate::infrastructure`].

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::outcome::AttestationFailure;
use crate::domain::token::MalformedTokenError;

/// Version of the client parameter layout understood by the collaborator.
pub const CLIENT_PARAMS_VERSION: u32 = 1;

/// Arguments of a single `attest` call.
#[derive(Debug, Clone, Copy)]
pub struct ClientParameters<'a> {
    pub attestation_endpoint_url: &'a str,
    pub client_payload: &'a str,
    pub version: u32,
}

impl<'a> ClientParameters<'a> {
    pub fn new(attestation_endpoint_url: &'a str, client_payload: &'a str) -> Self {
        Self {
            attestation_endpoint_url,
            client_payload,
            version: CLIENT_PARAMS_VERSION,
        }
    }
}

/// Errors raised while bringing a collaborator up.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Failed to create attestation client object: {0}")]
    InitializationFailed(String),
}

#[async_trait]
pub trait AttestationClient: Send + Sync {
    /// Token storage owned by the collaborator until released.
    type Buffer: AsRef<[u8]> + Send;

    /// Request an attestation token for `params`.
    async fn attest(
        &self,
        params: &ClientParameters<'_>,
    ) -> Result<Self::Buffer, AttestationFailure>;

    /// Release a buffer returned by [`AttestationClient::attest`].
    fn free(&self, buffer: Self::Buffer);
}

/// Scoped ownership of a collaborator buffer.
///
/// The buffer goes back to the collaborator when the lease drops, on every
/// exit path. Callers copy what they need with [`TokenLease::to_token`] and
/// never hold on to the borrowed bytes.
pub struct TokenLease<'c, C: AttestationClient + ?Sized> {
    client: &'c C,
    buffer: Option<C::Buffer>,
}

impl<'c, C: AttestationClient + ?Sized> TokenLease<'c, C> {
    pub fn new(client: &'c C, buffer: C::Buffer) -> Self {
        Self {
            client,
            buffer: Some(buffer),
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.buffer {
            Some(buffer) => buffer.as_ref(),
            None => &[],
        }
    }

    /// Copy the token into locally owned storage.
    pub fn to_token(&self) -> Result<String, MalformedTokenError> {
        std::str::from_utf8(self.bytes())
            .map(str::to_owned)
            .map_err(|_| MalformedTokenError::NotUtf8)
    }
}

impl<C: AttestationClient + ?Sized> Drop for TokenLease<'_, C> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.client.free(buffer);
        }
    }
}
