// Pseudo-FHE codec for share amounts.
//
// Values are tagged and base64-wrapped, nothing more. Anyone holding the string can read it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Display;
use thiserror::Error;

/// Tag prepended to every encoded value.
pub const FHE_PREFIX: &str = "FHE-";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),

    #[error("payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("not a number: {0:?}")]
    NotANumber(String),
}

/// Encodes a numeric value as `FHE-<base64 of its decimal text>`.
pub fn encode<T: Display>(value: T) -> String {
    format!("{}{}", FHE_PREFIX, STANDARD.encode(value.to_string()))
}

/// Decodes a value produced by [`encode`].
///
/// Strings without the `FHE-` tag are parsed as plain numbers so that legacy
/// records holding cleartext amounts keep working.
pub fn decode(encoded: &str) -> Result<f64, CodecError> {
    let text = match encoded.strip_prefix(FHE_PREFIX) {
        Some(payload) => {
            let bytes = STANDARD
                .decode(payload.trim())
                .map_err(|e| CodecError::InvalidBase64(e.to_string()))?;
            String::from_utf8(bytes).map_err(|_| CodecError::InvalidUtf8)?
        }
        None => encoded.to_string(),
    };
    parse_number(&text)
}

fn parse_number(text: &str) -> Result<f64, CodecError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| CodecError::NotANumber(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_integers_like_decimal_text() {
        // "1000" -> MTAwMA==
        assert_eq!(encode(1000u64), "FHE-MTAwMA==");
    }

    #[test]
    fn round_trips_assorted_values() {
        for n in [0.0, 1.0, 10.5, 1000.0, 123456789.0, -42.25, 0.1 + 0.2] {
            assert_eq!(decode(&encode(n)).unwrap(), n);
        }
        assert_eq!(decode(&encode(u64::from(u32::MAX))).unwrap(), u32::MAX as f64);
    }

    #[test]
    fn plain_numbers_fall_back_to_direct_parse() {
        assert_eq!(decode("250").unwrap(), 250.0);
        assert_eq!(decode(" 12.5 ").unwrap(), 12.5);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode("FHE-!!!"), Err(CodecError::InvalidBase64(_))));
        assert!(matches!(decode("abc"), Err(CodecError::NotANumber(_))));
        // base64 of "hello"
        assert!(matches!(decode("FHE-aGVsbG8="), Err(CodecError::NotANumber(_))));
    }
}
