//! Conversions between byte strings and BLS12-381 scalars.
//!
//! Integers of any width are folded into the scalar field byte by byte, so
//! arbitrary-length secret keys reduce to the same value as their
//! arbitrary-precision representative taken modulo the group order.

use bls12_381::Scalar;

use crate::error::CodecError;

/// Width of a canonical scalar encoding.
pub const SCALAR_SIZE: usize = 32;

/// Order of the BLS12-381 scalar field, big-endian.
///
/// `r = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001`
pub const GROUP_ORDER_BE: [u8; SCALAR_SIZE] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

const BASE_U64: u64 = 256;

/// Byte order of an integer encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

/// Interprets `bytes` as an unsigned integer and reduces it modulo the group order.
///
/// Uses base-256 Horner evaluation in the scalar field, so the input may be
/// any length.
#[must_use]
pub fn bytes_to_scalar(bytes: &[u8], order: ByteOrder) -> Scalar {
    let base = Scalar::from(BASE_U64);
    let step = |acc: Scalar, byte: &u8| acc * base + Scalar::from(u64::from(*byte));

    match order {
        ByteOrder::BigEndian => bytes.iter().fold(Scalar::zero(), step),
        ByteOrder::LittleEndian => bytes.iter().rev().fold(Scalar::zero(), step),
    }
}

/// Encodes a scalar into exactly `length` bytes.
///
/// # Errors
/// Returns [`CodecError::Encoding`] if the value needs more than `length`
/// bytes.
pub fn scalar_to_bytes(
    scalar: &Scalar,
    length: usize,
    order: ByteOrder,
) -> Result<Vec<u8>, CodecError> {
    let repr = scalar.to_bytes();
    let required = repr
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |highest| highest + 1);

    if required > length {
        return Err(CodecError::Encoding {
            width: length,
            required,
        });
    }

    let mut bytes = vec![0u8; length];
    bytes[..required].copy_from_slice(&repr[..required]);
    if order == ByteOrder::BigEndian {
        bytes.reverse();
    }
    Ok(bytes)
}

/// Reduces a big-endian integer modulo the group order.
///
/// Reducing the canonical encoding of the result again is a no-op.
#[inline]
#[must_use]
pub fn reduce_mod_order(be_bytes: &[u8]) -> Scalar {
    bytes_to_scalar(be_bytes, ByteOrder::BigEndian)
}

/// Reduces a secret key and re-serializes it as 32 big-endian bytes.
///
/// # Errors
/// Returns [`CodecError::Encoding`] only if a reduced scalar fails to fit in
/// 32 bytes, which would indicate a broken field implementation.
pub fn canonical_secret_key(bytes: &[u8]) -> Result<(Scalar, [u8; SCALAR_SIZE]), CodecError> {
    let scalar = reduce_mod_order(bytes);
    let encoded = scalar_to_bytes(&scalar, SCALAR_SIZE, ByteOrder::BigEndian)?;

    let mut canonical = [0u8; SCALAR_SIZE];
    canonical.copy_from_slice(&encoded);
    Ok((scalar, canonical))
}
