//! # Verification Codes
//!
//! The opaque public token that lets any third party look up a credential
//! without authentication. A code is 16 bytes of OS randomness encoded as
//! unpadded base64url — exactly 22 characters, 128 bits of entropy.
//!
//! Codes are assigned once at credential creation and never reused. They
//! are the sole anti-forgery mechanism: the rendered certificate document
//! is non-authoritative, the store lookup keyed by code is the source of
//! truth. High entropy (rather than sequential ids) is what makes the
//! unauthenticated lookup safe against enumeration.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of random bytes backing a code.
const CODE_BYTES: usize = 16;

/// Length of the encoded form: 16 bytes → 22 base64url characters.
pub const CODE_LEN: usize = 22;

/// An opaque, URL-safe verification code.
///
/// Construct via [`VerificationCode::generate`] (issuance) or
/// [`VerificationCode::parse`] (inbound lookup). The inner string is
/// guaranteed to be exactly [`CODE_LEN`] characters from the base64url
/// alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generate a fresh code from the operating system RNG.
    pub fn generate() -> Self {
        let mut raw = [0u8; CODE_BYTES];
        OsRng.fill_bytes(&mut raw);
        Self(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Parse a code from untrusted input.
    ///
    /// Accepts exactly [`CODE_LEN`] characters from the base64url
    /// alphabet (`A–Z`, `a–z`, `0–9`, `-`, `_`). Anything else fails with
    /// [`ValidationError::InvalidVerificationCode`] — callers on the
    /// public verification path can reject garbage before any store
    /// access.
    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        if s.len() != CODE_LEN {
            return Err(ValidationError::InvalidVerificationCode(s.to_string()));
        }
        let valid_alphabet = s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if !valid_alphabet {
            return Err(ValidationError::InvalidVerificationCode(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Return the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VerificationCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for VerificationCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
