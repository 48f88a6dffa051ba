//! Conditional base64 decoding of secret field values.
//!
//! A field value carrying the `base64:` prefix is stored encoded; everything
//! else is passed through untouched.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{GeneralPurpose, GeneralPurposeConfig};

/// Marker prefix for base64-encoded field values
pub const BASE64_PREFIX: &str = "base64:";

/// Standard alphabet, canonical padding required, non-zero trailing bits accepted
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_allow_trailing_bits(true),
);

/// How a single field value was handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedField {
    /// No `base64:` prefix, value returned as-is
    Plain(String),
    /// Prefixed value that decoded cleanly
    Decoded(String),
    /// Prefixed value that failed to decode; holds the partial output
    Malformed(String),
}

impl DecodedField {
    pub fn into_value(self) -> String {
        match self {
            DecodedField::Plain(v) | DecodedField::Decoded(v) | DecodedField::Malformed(v) => v,
        }
    }

    pub fn is_malformed(&self) -> bool {
        matches!(self, DecodedField::Malformed(_))
    }
}

/// Decode a raw field value into the string exposed to callers.
///
/// Malformed base64 never fails: the bytes decoded before the first bad group
/// are kept (usually nothing) and tagged [`DecodedField::Malformed`]. Pending
/// product clarification on whether this should become a hard error.
pub fn decode_field(raw: &str) -> DecodedField {
    let Some(encoded) = raw.strip_prefix(BASE64_PREFIX) else {
        return DecodedField::Plain(raw.to_string());
    };

    match decode_lenient(encoded) {
        Ok(bytes) => DecodedField::Decoded(String::from_utf8_lossy(&bytes).into_owned()),
        Err(partial) => DecodedField::Malformed(String::from_utf8_lossy(&partial).into_owned()),
    }
}

/// Decode standard padded base64, keeping partial output on failure.
///
/// Line breaks are ignored. On error, every complete 4-character group that
/// precedes the first bad group is kept; a group carrying padding ends the data.
fn decode_lenient(input: &str) -> Result<Vec<u8>, Vec<u8>> {
    let cleaned: Vec<u8> = input
        .bytes()
        .filter(|b| *b != b'\r' && *b != b'\n')
        .collect();

    if let Ok(bytes) = STANDARD_LENIENT.decode(&cleaned) {
        return Ok(bytes);
    }

    let mut partial = Vec::new();
    for group in cleaned.chunks(4) {
        if group.len() < 4 {
            break;
        }

        match STANDARD_LENIENT.decode(group) {
            Ok(bytes) => partial.extend_from_slice(&bytes),
            Err(_) => break,
        }

        if group.contains(&b'=') {
            break;
        }
    }

    Err(partial)
}
