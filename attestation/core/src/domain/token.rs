// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Compact Token Decoding
//!
//! An attestation token is a compact JWS: `header.payload.signature`. Only the
//! payload segment is decoded here. The signature is the collaborator's
//! concern and is never checked by this crate.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use thiserror::Error;

use crate::domain::claims::ClaimsDocument;

const SEGMENT_DELIMITER: char = '.';
const MIN_SEGMENTS: usize = 3;

/// URL-safe alphabet, padding optional. Issuers disagree on whether to pad.
const BASE64_URL: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Error)]
pub enum MalformedTokenError {
    #[error("Invalid JWT token: expected at least 3 segments, found {found}")]
    TooFewSegments { found: usize },

    #[error("Invalid JWT token: claims segment is not valid base64url: {0}")]
    PayloadEncoding(#[from] base64::DecodeError),

    #[error("Invalid JWT token: claims segment is not valid JSON: {0}")]
    PayloadJson(#[from] serde_json::Error),

    #[error("Invalid JWT token: token is not valid UTF-8")]
    NotUtf8,
}

/// A token as returned by the collaborator, borrowed for decoding.
#[derive(Debug, Clone, Copy)]
pub struct CompactToken<'a> {
    raw: &'a str,
}

impl<'a> CompactToken<'a> {
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Split into segments, rejecting anything with fewer than three.
    /// Segments past the third are ignored.
    pub fn segments(&self) -> Result<Vec<&'a str>, MalformedTokenError> {
        let segments: Vec<&str> = self.raw.split(SEGMENT_DELIMITER).collect();
        if segments.len() < MIN_SEGMENTS {
            return Err(MalformedTokenError::TooFewSegments {
                found: segments.len(),
            });
        }
        Ok(segments)
    }

    /// Decode the claims (second) segment.
    pub fn decode_claims(&self) -> Result<ClaimsDocument, MalformedTokenError> {
        let segments = self.segments()?;
        let bytes = BASE64_URL.decode(segments[1])?;
        let value = serde_json::from_slice(&bytes)?;
        Ok(ClaimsDocument::new(value))
    }
}
