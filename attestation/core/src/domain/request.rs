// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Attestation Request
//!
//! The client payload handed to the attestation collaborator. It is bound
//! into the attestation evidence as runtime data, so its serialized form must
//! be stable:
//!
//! ```text
//! {"nonce":"abc123","price":10.5,"timestamp":1767225600}
//! {"nonce":"","price":null,"timestamp":1767225600}
//! ```
//!
//! `price` is always present; a missing price is `null`, never `0` and never
//! omitted. `timestamp` is captured when the request is built.

use std::num::ParseFloatError;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Errors raised while building an [`AttestationRequest`].
#[derive(Debug, Error)]
pub enum ValueFormatError {
    #[error("Invalid price '{value}': {source}")]
    NotANumber {
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Invalid price '{value}': value must be finite")]
    NotFinite { value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AttestationRequest {
    nonce: String,
    price: Option<f64>,
    timestamp: i64,
}

impl AttestationRequest {
    /// Build a request stamped with the current time.
    pub fn build(nonce: &str, price: Option<&str>) -> Result<Self, ValueFormatError> {
        Self::build_at(nonce, price, Utc::now())
    }

    /// Build a request stamped with `now`.
    pub fn build_at(
        nonce: &str,
        price: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Self, ValueFormatError> {
        let price = match price {
            Some(raw) if !raw.is_empty() => Some(parse_price(raw)?),
            _ => None,
        };

        Ok(Self {
            nonce: nonce.to_string(),
            price,
            timestamp: now.timestamp(),
        })
    }

    pub fn nonce(&self) -> &str {
        &self.nonce
    }

    pub fn price(&self) -> Option<f64> {
        self.price
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Canonical JSON form sent to the collaborator.
    pub fn to_payload(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

fn parse_price(raw: &str) -> Result<f64, ValueFormatError> {
    let value: f64 = raw.trim().parse().map_err(|source| ValueFormatError::NotANumber {
        value: raw.to_string(),
        source,
    })?;

    // JSON has no representation for NaN or infinities.
    if !value.is_finite() {
        return Err(ValueFormatError::NotFinite {
            value: raw.to_string(),
        });
    }

    Ok(value)
}
