//! Hash functions used for key images, leaves and tree nodes.
//!
//! The key image hash is fixed to BLAKE2s-256 because the circuit computes it
//! in-circuit. Leaf and node hashing go through the injectable [`DigestFn`]
//! capability, with [`HashFunction`] as the configurable implementation.

use serde::{Deserialize, Serialize};
use sha3::{Digest as _, Sha3_256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::curve::{CurvePoint, POINT_SIZE};
use crate::error::CurveError;

pub const HASH_SIZE: usize = 32;

/// A 32-byte hash output, treated as little-endian by the tree.
pub type Digest = [u8; HASH_SIZE];

/// Capability that maps bytes to a 32-byte digest.
pub trait DigestFn {
    fn digest(&self, data: &[u8]) -> Digest;

    /// Hash of `left ‖ right`.
    fn hash_pair(&self, left: &Digest, right: &Digest) -> Digest {
        let mut buf = [0u8; 2 * HASH_SIZE];
        buf[..HASH_SIZE].copy_from_slice(left);
        buf[HASH_SIZE..].copy_from_slice(right);
        self.digest(&buf)
    }
}

impl<T: DigestFn + ?Sized> DigestFn for &T {
    fn digest(&self, data: &[u8]) -> Digest {
        (**self).digest(data)
    }

    fn hash_pair(&self, left: &Digest, right: &Digest) -> Digest {
        (**self).hash_pair(left, right)
    }
}

/// Unkeyed BLAKE2s with a 32-byte output.
#[must_use]
pub fn blake2s_256(data: &[u8]) -> Digest {
    let hash = blake2s_simd::Params::new()
        .hash_length(HASH_SIZE)
        .to_state()
        .update(data)
        .finalize();

    *hash.as_array()
}

fn sha3_256(data: &[u8]) -> Digest {
    let mut hasher = Sha3_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Selectable hash for leaves and tree nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashFunction {
    /// BLAKE2s-256, matching the circuit's `blake2s` gadget.
    #[default]
    Blake2s,
    /// SHA3-256.
    Sha3,
}

impl DigestFn for HashFunction {
    fn digest(&self, data: &[u8]) -> Digest {
        match self {
            HashFunction::Blake2s => blake2s_256(data),
            HashFunction::Sha3 => sha3_256(data),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown hash function '{0}', expected 'blake2s' or 'sha3'")]
pub struct UnknownHashFunction(String);

impl FromStr for HashFunction {
    type Err = UnknownHashFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "blake2s" => Ok(HashFunction::Blake2s),
            "sha3" => Ok(HashFunction::Sha3),
            other => Err(UnknownHashFunction(other.to_string())),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashFunction::Blake2s => f.write_str("blake2s"),
            HashFunction::Sha3 => f.write_str("sha3"),
        }
    }
}

/// Hashes a public key into a Merkle leaf.
///
/// The identity hashes as 96 zero bytes; any other point as `x_le ‖ y_le`.
///
/// # Errors
/// Propagates [`CurveError::Malformed`] from point normalization.
pub fn hash_public_key<H: DigestFn>(point: &CurvePoint, hasher: &H) -> Result<Digest, CurveError> {
    let encoded: [u8; POINT_SIZE] = point.to_le_bytes()?;
    Ok(hasher.digest(&encoded))
}
