//! Hex decoding and formatting helpers.

use crate::error::CodecError;

/// Removes surrounding whitespace and an optional `0x`/`0X` prefix.
pub fn strip_hex_prefix(input: &str) -> &str {
    let trimmed = input.trim();
    trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed)
}

/// Decodes a hex string of any even length into bytes.
///
/// # Errors
/// Returns [`CodecError::Hex`] for odd-length input or non-hex characters.
///
/// # Examples
///
/// ```
/// use zkfocil_vectors::utils::decode_hex;
///
/// assert_eq!(decode_hex("0x01ff").unwrap(), vec![0x01, 0xff]);
/// assert!(decode_hex("0x1").is_err());
/// ```
pub fn decode_hex(input: &str) -> Result<Vec<u8>, CodecError> {
    Ok(hex::decode(strip_hex_prefix(input))?)
}

/// Decodes a hex string that must hold exactly `N` bytes.
///
/// # Errors
/// Returns [`CodecError::Hex`] for malformed hex and
/// [`CodecError::InvalidLength`] when the decoded length differs from `N`.
pub fn decode_hex_array<const N: usize>(
    input: &str,
    name: &'static str,
) -> Result<[u8; N], CodecError> {
    let bytes = decode_hex(input)?;
    let actual = bytes.len();
    bytes.try_into().map_err(|_| CodecError::InvalidLength {
        name,
        expected: N,
        actual,
    })
}

/// Encodes bytes as a `0x`-prefixed lowercase hex string.
#[must_use]
pub fn encode_hex_prefixed(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Formats each byte as a `0x`-prefixed two-digit hex literal.
pub fn byte_literals(bytes: &[u8]) -> impl Iterator<Item = String> + '_ {
    bytes.iter().map(|b| format!("0x{b:02x}"))
}
