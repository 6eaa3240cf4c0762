//! zkFOCIL test vector generation
//!
//! This library produces deterministic inputs and expected outputs for a
//! circuit that proves two things about a validator on BLS12-381 G1:
//! the key image was derived from its secret key and a block identifier, and
//! its hashed public key is a leaf of the validator Merkle tree.
//!
//! # Components
//!
//! - [`codec`]: byte strings to and from scalars, reduction modulo the group order
//! - [`curve`]: scalar multiplication and 48-byte little-endian coordinates
//! - [`keys`]: public key and key image derivation
//! - [`hash`]: BLAKE2s / SHA3 digests and public-key leaf hashing
//! - [`MerkleTree`]: binary tree with stored levels, proofs and padding
//! - [`VectorGenerator`]: assembles a [`TestVector`] from optional inputs
//! - [`format`]: `test` array literals and `toml` prover inputs
//!
//! # Example
//!
//! ```
//! use zkfocil_vectors::{GeneratorInputs, GeneratorSettings, HashFunction, VectorGenerator};
//!
//! let settings = GeneratorSettings { tree_depth: 8, leaf_count: 4, hash: HashFunction::Blake2s };
//! let vector = VectorGenerator::from_seed(settings, 7)
//!     .generate(&GeneratorInputs::default())
//!     .unwrap();
//! assert_eq!(vector.merkle_path.len(), 8);
//! vector.validate(&HashFunction::Blake2s).unwrap();
//! ```

pub mod codec;
pub mod config;
pub mod curve;
pub mod error;
pub mod format;
pub mod generator;
pub mod hash;
pub mod keys;
pub mod merkle;
pub mod types;
pub mod utils;


pub use curve::{scalar_multiply, CurvePoint};
pub use error::{CodecError, CurveError, Error, MerkleError};
pub use format::OutputFormat;
pub use generator::{GeneratorInputs, GeneratorSettings, VectorGenerator};
pub use hash::{Digest, DigestFn, HashFunction};
pub use keys::{derive_key_image, derive_public_key};
pub use merkle::{MerkleProof, MerkleTree};
pub use types::{TestVector, VectorRecord};

/// Merkle path length the circuit verifies.
///
/// The circuit decomposes the leaf index into this many bits, so it supports
/// up to 2^20 validators. Smaller trees are padded with zero digests.
pub const VALIDATOR_TREE_DEPTH: usize = 20;
