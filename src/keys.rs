//! Validator public key and key image derivation.
//!
//! The public key is `sk * G`. The key image binds the secret key to a block
//! (slot) identifier:
//!
//! ```text
//! key_image = (reverse(BLAKE2s(sk_be ‖ block_params)) mod r) * G
//! ```
//!
//! The digest is reversed before it is read as a big-endian integer. The
//! circuit performs the same reversal when it casts the hash output into a
//! scalar, so it must not be dropped.

use bls12_381::Scalar;
use log::debug;

use crate::codec::{canonical_secret_key, reduce_mod_order, SCALAR_SIZE};
use crate::curve::{scalar_multiply, CurvePoint};
use crate::error::CodecError;
use crate::hash::blake2s_256;

pub const SECRET_KEY_SIZE: usize = SCALAR_SIZE;
pub const BLOCK_PARAMS_SIZE: usize = 32;

/// A canonicalized secret key with its public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPair {
    pub secret_scalar: Scalar,
    /// Big-endian encoding of `secret_scalar`; this is what gets hashed.
    pub secret_key_bytes: [u8; SECRET_KEY_SIZE],
    pub public_key: CurvePoint,
}

/// Canonicalizes a secret key of any length and derives its public key.
///
/// # Errors
/// Returns [`CodecError::Encoding`] if the reduced scalar cannot be
/// re-serialized in 32 bytes.
pub fn derive_public_key(secret_key_bytes: &[u8]) -> Result<KeyPair, CodecError> {
    let (secret_scalar, canonical) = canonical_secret_key(secret_key_bytes)?;
    let public_key = scalar_multiply(&secret_scalar);
    debug!("Derived public key {:?}", public_key);

    Ok(KeyPair {
        secret_scalar,
        secret_key_bytes: canonical,
        public_key,
    })
}

/// The scalar the key image is derived from.
#[must_use]
pub fn key_image_scalar(
    canonical_secret_key: &[u8; SECRET_KEY_SIZE],
    block_params: &[u8; BLOCK_PARAMS_SIZE],
) -> Scalar {
    let mut preimage = [0u8; SECRET_KEY_SIZE + BLOCK_PARAMS_SIZE];
    preimage[..SECRET_KEY_SIZE].copy_from_slice(canonical_secret_key);
    preimage[SECRET_KEY_SIZE..].copy_from_slice(block_params);

    let mut digest = blake2s_256(&preimage);
    digest.reverse();
    reduce_mod_order(&digest)
}

/// Derives the key image for a canonical secret key and block parameters.
#[must_use]
pub fn derive_key_image(
    canonical_secret_key: &[u8; SECRET_KEY_SIZE],
    block_params: &[u8; BLOCK_PARAMS_SIZE],
) -> CurvePoint {
    let key_image = scalar_multiply(&key_image_scalar(canonical_secret_key, block_params));
    debug!("Derived key image {:?}", key_image);
    key_image
}
