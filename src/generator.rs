//! End-to-end test vector generation.
//!
//! Inputs that are not supplied are drawn from the injected random source, in
//! a fixed order (secret key, block params, target index, filler leaves), so a
//! seeded source reproduces the same vector.

use log::{debug, info};
use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, RngCore, SeedableRng};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::hash::{hash_public_key, Digest, HashFunction, HASH_SIZE};
use crate::keys::{derive_key_image, derive_public_key, BLOCK_PARAMS_SIZE, SECRET_KEY_SIZE};
use crate::merkle::MerkleTree;
use crate::types::{PointBytes, TestVector};
use crate::utils::{decode_hex, decode_hex_array};

/// Tree shape and hashing used for every generated vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub tree_depth: usize,
    pub leaf_count: usize,
    pub hash: HashFunction,
}

impl From<&Config> for GeneratorSettings {
    fn from(config: &Config) -> Self {
        Self {
            tree_depth: config.tree.depth,
            leaf_count: config.tree.leaf_count,
            hash: config.tree.hash,
        }
    }
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Caller-supplied values; anything left `None` is drawn at random.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratorInputs {
    /// Hex of any length; reduced modulo the group order.
    pub secret_key_hex: Option<String>,
    /// Hex of exactly 32 bytes.
    pub block_params_hex: Option<String>,
    pub target_index: Option<usize>,
}

/// An empty or blank hex string counts as not supplied.
fn supplied(input: &Option<String>) -> Option<&str> {
    input.as_deref().filter(|hex| !hex.trim().is_empty())
}

pub struct VectorGenerator<R> {
    settings: GeneratorSettings,
    rng: R,
}

impl VectorGenerator<StdRng> {
    /// A generator whose random draws are reproducible from `seed`.
    #[must_use]
    pub fn from_seed(settings: GeneratorSettings, seed: u64) -> Self {
        Self::new(settings, StdRng::seed_from_u64(seed))
    }
}

impl VectorGenerator<ThreadRng> {
    #[must_use]
    pub fn unseeded(settings: GeneratorSettings) -> Self {
        Self::new(settings, rand::thread_rng())
    }
}

impl<R: RngCore> VectorGenerator<R> {
    pub fn new(settings: GeneratorSettings, rng: R) -> Self {
        Self { settings, rng }
    }

    #[must_use]
    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    fn random_bytes<const N: usize>(&mut self) -> [u8; N] {
        let mut bytes = [0u8; N];
        self.rng.fill_bytes(&mut bytes);
        bytes
    }

    fn check_shape(&self) -> Result<()> {
        let GeneratorSettings {
            tree_depth,
            leaf_count,
            ..
        } = self.settings;

        if leaf_count == 0 {
            return Err(Error::ZeroLeaves);
        }

        let capacity = u32::try_from(tree_depth)
            .ok()
            .and_then(|depth| 1usize.checked_shl(depth));
        if capacity.is_some_and(|capacity| leaf_count > capacity) {
            return Err(Error::LeafCountExceedsDepth {
                leaf_count,
                depth: tree_depth,
            });
        }

        Ok(())
    }

    /// Produces one test vector.
    ///
    /// # Arguments
    /// * `inputs` - Secret key, block params and target index; empty fields
    ///   are drawn from the random source
    ///
    /// # Returns
    /// A vector whose path and index bits are padded to the configured depth
    ///
    /// # Errors
    /// Fails on malformed hex input, a target index outside the validator
    /// set, or a validator set that does not fit the configured depth.
    pub fn generate(&mut self, inputs: &GeneratorInputs) -> Result<TestVector> {
        self.check_shape()?;
        let GeneratorSettings {
            tree_depth,
            leaf_count,
            hash,
        } = self.settings;

        let secret_key_bytes = match supplied(&inputs.secret_key_hex) {
            Some(hex) => decode_hex(hex)?,
            None => self.random_bytes::<SECRET_KEY_SIZE>().to_vec(),
        };
        let block_params: [u8; BLOCK_PARAMS_SIZE] = match supplied(&inputs.block_params_hex) {
            Some(hex) => decode_hex_array(hex, "block params")?,
            None => self.random_bytes(),
        };
        let target_index = match inputs.target_index {
            Some(index) if index >= leaf_count => {
                return Err(Error::TargetIndex {
                    index,
                    leaf_count,
                })
            }
            Some(index) => index,
            None => self.rng.gen_range(0..leaf_count),
        };

        let key_pair = derive_public_key(&secret_key_bytes)?;
        let key_image = derive_key_image(&key_pair.secret_key_bytes, &block_params);
        let target_leaf = hash_public_key(&key_pair.public_key, &hash)?;
        debug!("Target leaf digest: {}", hex::encode(target_leaf));

        let leaves: Vec<Digest> = (0..leaf_count)
            .map(|i| {
                if i == target_index {
                    target_leaf
                } else {
                    self.random_bytes::<HASH_SIZE>()
                }
            })
            .collect();

        info!(
            "Building {} validator tree with {} leaves, target index {}",
            hash, leaf_count, target_index
        );
        let tree = MerkleTree::build(leaves, hash)?;
        let proof = tree.generate_proof(target_index)?;
        info!("Validator root: {}", hex::encode(tree.root()));

        Ok(TestVector {
            secret_key: key_pair.secret_key_bytes,
            block_params,
            validator_root: tree.root(),
            merkle_path: proof.padded_path(tree_depth)?,
            index_bits: proof.index_bits(tree_depth)?,
            public_key: PointBytes::from(key_pair.public_key.serialize_le()?),
            key_image: PointBytes::from(key_image.serialize_le()?),
            tree_depth: tree.depth(),
            target_pk_hash: target_leaf,
        })
    }
}
