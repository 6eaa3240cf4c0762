//! Test vector types and the persisted hex-JSON record.

use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::curve::COORDINATE_SIZE;
use crate::hash::{hash_public_key, Digest, DigestFn, HASH_SIZE};
use crate::keys::{derive_key_image, derive_public_key, BLOCK_PARAMS_SIZE, SECRET_KEY_SIZE};
use crate::merkle::compute_root;
use crate::utils::{decode_hex_array, encode_hex_prefixed};

/// Little-endian affine coordinates of a point, all zeros for the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointBytes {
    pub x: [u8; COORDINATE_SIZE],
    pub y: [u8; COORDINATE_SIZE],
}

impl From<([u8; COORDINATE_SIZE], [u8; COORDINATE_SIZE])> for PointBytes {
    fn from((x, y): ([u8; COORDINATE_SIZE], [u8; COORDINATE_SIZE])) -> Self {
        Self { x, y }
    }
}

/// One complete set of circuit inputs and expected outputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestVector {
    /// Canonical big-endian secret key.
    pub secret_key: [u8; SECRET_KEY_SIZE],
    pub block_params: [u8; BLOCK_PARAMS_SIZE],
    pub validator_root: Digest,
    /// Authentication path padded with zero digests to the circuit depth.
    pub merkle_path: Vec<Digest>,
    /// Index bits, least significant first, padded like `merkle_path`.
    pub index_bits: Vec<bool>,
    pub public_key: PointBytes,
    pub key_image: PointBytes,
    /// Natural depth of the validator tree; entries past it are padding.
    pub tree_depth: usize,
    pub target_pk_hash: Digest,
}

impl TestVector {
    /// Length of the padded path the circuit consumes.
    #[must_use]
    pub fn path_depth(&self) -> usize {
        self.merkle_path.len()
    }

    /// Leaf index encoded by the natural (unpadded) index bits.
    ///
    /// Bits beyond the width of `usize` are ignored; [`TestVector::validate`]
    /// rejects vectors that carry them.
    #[must_use]
    pub fn leaf_index(&self) -> usize {
        self.index_bits
            .iter()
            .take(self.tree_depth.min(usize::BITS as usize))
            .enumerate()
            .filter(|(_, bit)| **bit)
            .fold(0usize, |acc, (i, _)| acc | (1usize << i))
    }

    /// Recomputes every derived value and checks it against the vector.
    ///
    /// Performs:
    /// - Shape checks (path and index bits share one length, padding is zero)
    /// - Public key and key image derivation from the secret key
    /// - Leaf digest of the public key
    /// - Root recomputation from the natural part of the path
    ///
    /// # Errors
    /// Returns an error describing the first mismatch found.
    pub fn validate<H: DigestFn>(&self, hasher: &H) -> Result<()> {
        debug!("Starting test vector validation");
        debug!("Path depth: {}", self.path_depth());
        debug!("Tree depth: {}", self.tree_depth);

        if self.index_bits.len() != self.merkle_path.len() {
            return Err(anyhow::anyhow!(
                "Merkle path has {} entries but there are {} index bits",
                self.merkle_path.len(),
                self.index_bits.len()
            ));
        }

        if self.tree_depth > self.path_depth() {
            return Err(anyhow::anyhow!(
                "Tree depth {} exceeds the path depth {}",
                self.tree_depth,
                self.path_depth()
            ));
        }

        if self.tree_depth > usize::BITS as usize {
            return Err(anyhow::anyhow!(
                "Tree depth {} exceeds the maximum index width of {} bits",
                self.tree_depth,
                usize::BITS
            ));
        }

        let padding_ok = self.merkle_path[self.tree_depth..]
            .iter()
            .zip(&self.index_bits[self.tree_depth..])
            .all(|(digest, bit)| *digest == [0u8; HASH_SIZE] && !bit);
        if !padding_ok {
            return Err(anyhow::anyhow!(
                "Path entries beyond depth {} must be zero digests with zero index bits",
                self.tree_depth
            ));
        }

        let key_pair =
            derive_public_key(&self.secret_key).context("Failed to derive public key")?;
        if key_pair.secret_key_bytes != self.secret_key {
            return Err(anyhow::anyhow!(
                "Secret key {} is not reduced modulo the group order",
                hex::encode(self.secret_key)
            ));
        }

        let public_key = PointBytes::from(
            key_pair
                .public_key
                .serialize_le()
                .context("Failed to serialize public key")?,
        );
        if public_key != self.public_key {
            return Err(anyhow::anyhow!(
                "Public key mismatch: expected x={}, got x={}",
                hex::encode(public_key.x),
                hex::encode(self.public_key.x)
            ));
        }

        let key_image = PointBytes::from(
            derive_key_image(&self.secret_key, &self.block_params)
                .serialize_le()
                .context("Failed to serialize key image")?,
        );
        if key_image != self.key_image {
            return Err(anyhow::anyhow!(
                "Key image mismatch: expected x={}, got x={}",
                hex::encode(key_image.x),
                hex::encode(self.key_image.x)
            ));
        }

        let leaf = hash_public_key(&key_pair.public_key, hasher)
            .context("Failed to hash public key")?;
        if leaf != self.target_pk_hash {
            return Err(anyhow::anyhow!(
                "Target leaf mismatch: expected {}, got {}",
                hex::encode(leaf),
                hex::encode(self.target_pk_hash)
            ));
        }

        let root = compute_root(
            &leaf,
            &self.merkle_path[..self.tree_depth],
            self.leaf_index(),
            hasher,
        );
        if root != self.validator_root {
            return Err(anyhow::anyhow!(
                "Root mismatch: path recomputes {}, vector claims {}",
                hex::encode(root),
                hex::encode(self.validator_root)
            ));
        }

        debug!("Test vector validation passed");
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointRecord {
    pub x: String,
    pub y: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputsRecord {
    pub secret_key_bytes: String,
    pub block_params: String,
    pub validator_root: String,
    pub validator_merkle_path: Vec<String>,
    pub validator_merkle_indices: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpectedRecord {
    pub public_key: PointRecord,
    pub key_image: PointRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRecord {
    pub tree_depth: usize,
    pub target_pk_hash: String,
}

/// Archival form of a [`TestVector`]: every byte string is `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub inputs: InputsRecord,
    pub expected: ExpectedRecord,
    pub metadata: MetadataRecord,
}

impl From<&PointBytes> for PointRecord {
    fn from(point: &PointBytes) -> Self {
        Self {
            x: encode_hex_prefixed(point.x),
            y: encode_hex_prefixed(point.y),
        }
    }
}

impl TryFrom<&PointRecord> for PointBytes {
    type Error = anyhow::Error;

    fn try_from(record: &PointRecord) -> Result<Self> {
        Ok(Self {
            x: decode_hex_array(&record.x, "point x coordinate")?,
            y: decode_hex_array(&record.y, "point y coordinate")?,
        })
    }
}

impl From<&TestVector> for VectorRecord {
    fn from(vector: &TestVector) -> Self {
        Self {
            inputs: InputsRecord {
                secret_key_bytes: encode_hex_prefixed(vector.secret_key),
                block_params: encode_hex_prefixed(vector.block_params),
                validator_root: encode_hex_prefixed(vector.validator_root),
                validator_merkle_path: vector.merkle_path.iter().map(encode_hex_prefixed).collect(),
                validator_merkle_indices: vector.index_bits.iter().map(|&bit| u8::from(bit)).collect(),
            },
            expected: ExpectedRecord {
                public_key: PointRecord::from(&vector.public_key),
                key_image: PointRecord::from(&vector.key_image),
            },
            metadata: MetadataRecord {
                tree_depth: vector.tree_depth,
                target_pk_hash: encode_hex_prefixed(vector.target_pk_hash),
            },
        }
    }
}

impl TryFrom<&VectorRecord> for TestVector {
    type Error = anyhow::Error;

    fn try_from(record: &VectorRecord) -> Result<Self> {
        let merkle_path = record
            .inputs
            .validator_merkle_path
            .iter()
            .enumerate()
            .map(|(i, node)| {
                decode_hex_array(node, "merkle path node")
                    .with_context(|| format!("Invalid merkle path entry {i}"))
            })
            .collect::<Result<Vec<Digest>>>()?;

        let index_bits = record
            .inputs
            .validator_merkle_indices
            .iter()
            .enumerate()
            .map(|(i, bit)| match bit {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(anyhow::anyhow!(
                    "Merkle index {i} must be 0 or 1, got {other}"
                )),
            })
            .collect::<Result<Vec<bool>>>()?;

        Ok(Self {
            secret_key: decode_hex_array(&record.inputs.secret_key_bytes, "secret key")?,
            block_params: decode_hex_array(&record.inputs.block_params, "block params")?,
            validator_root: decode_hex_array(&record.inputs.validator_root, "validator root")?,
            merkle_path,
            index_bits,
            public_key: PointBytes::try_from(&record.expected.public_key)
                .context("Invalid public key")?,
            key_image: PointBytes::try_from(&record.expected.key_image)
                .context("Invalid key image")?,
            tree_depth: record.metadata.tree_depth,
            target_pk_hash: decode_hex_array(&record.metadata.target_pk_hash, "target pk hash")?,
        })
    }
}

impl VectorRecord {
    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize test vector to JSON")
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vector file: {}", path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse vector file: {}", path.display()))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_json_pretty()?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create output directory: {}", parent.display())
            })?;
        }

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write vector file: {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::HashFunction;
    use crate::merkle::MerkleTree;
    use crate::CurvePoint;

    /// sk = 1, bp = 0, target leaf at index 1 of a 4-leaf tree, padded to 6.
    fn sample_vector() -> TestVector {
        let mut secret_key = [0u8; 32];
        secret_key[31] = 1;
        let block_params = [0u8; 32];
        let hasher = HashFunction::Blake2s;

        let pk = CurvePoint::generator();
        let leaf = hash_public_key(&pk, &hasher).unwrap();
        let leaves = vec![[1u8; 32], leaf, [3u8; 32], [4u8; 32]];
        let tree = MerkleTree::build(leaves, hasher).unwrap();
        let proof = tree.generate_proof(1).unwrap();

        TestVector {
            secret_key,
            block_params,
            validator_root: tree.root(),
            merkle_path: proof.padded_path(6).unwrap(),
            index_bits: proof.index_bits(6).unwrap(),
            public_key: pk.serialize_le().unwrap().into(),
            key_image: derive_key_image(&secret_key, &block_params)
                .serialize_le()
                .unwrap()
                .into(),
            tree_depth: tree.depth(),
            target_pk_hash: leaf,
        }
    }

    #[test]
    fn test_sample_vector_validates() {
        let vector = sample_vector();
        assert_eq!(vector.leaf_index(), 1);
        assert!(vector.validate(&HashFunction::Blake2s).is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_hasher() {
        let result = sample_vector().validate(&HashFunction::Sha3);
        assert!(result.unwrap_err().to_string().contains("Target leaf mismatch"));
    }

    #[test]
    fn test_validate_rejects_tampered_key_image() {
        let mut vector = sample_vector();
        vector.key_image.x[0] ^= 1;
        let err = vector.validate(&HashFunction::Blake2s).unwrap_err();
        assert!(err.to_string().contains("Key image mismatch"));
    }

    #[test]
    fn test_validate_rejects_tampered_block_params() {
        let mut vector = sample_vector();
        vector.block_params[0] = 0xff;
        assert!(vector.validate(&HashFunction::Blake2s).is_err());
    }

    #[test]
    fn test_validate_rejects_tampered_root() {
        let mut vector = sample_vector();
        vector.validator_root = [0xAAu8; 32];
        let err = vector.validate(&HashFunction::Blake2s).unwrap_err();
        assert!(err.to_string().contains("Root mismatch"));
    }

    #[test]
    fn test_validate_rejects_flipped_index_bit() {
        let mut vector = sample_vector();
        vector.index_bits[0] = false;
        assert!(vector.validate(&HashFunction::Blake2s).is_err());
    }

    #[test]
    fn test_validate_rejects_nonzero_padding() {
        let mut vector = sample_vector();
        vector.merkle_path[5] = [1u8; 32];
        let err = vector.validate(&HashFunction::Blake2s).unwrap_err();
        assert!(err.to_string().contains("must be zero digests"));
    }

    #[test]
    fn test_validate_rejects_depth_beyond_index_width() {
        let mut vector = sample_vector();
        vector.merkle_path = vec![[0u8; 32]; 70];
        vector.index_bits = vec![false; 70];
        vector.index_bits[64] = true;
        vector.tree_depth = 70;

        let err = vector.validate(&HashFunction::Blake2s).unwrap_err();
        assert!(err.to_string().contains("maximum index width"));
    }

    #[test]
    fn test_leaf_index_ignores_bits_beyond_usize() {
        let mut vector = sample_vector();
        vector.index_bits = vec![false; 70];
        vector.index_bits[0] = true;
        vector.index_bits[64] = true;
        vector.tree_depth = 70;
        assert_eq!(vector.leaf_index(), 1);
    }

    #[test]
    fn test_deep_record_is_rejected_after_loading() {
        let mut record = VectorRecord::from(&sample_vector());
        record.inputs.validator_merkle_path = vec![format!("0x{}", "00".repeat(32)); 70];
        record.inputs.validator_merkle_indices = vec![0; 70];
        record.inputs.validator_merkle_indices[64] = 1;
        record.metadata.tree_depth = 70;

        let vector = TestVector::try_from(&record).unwrap();
        assert!(vector.validate(&HashFunction::Blake2s).is_err());
    }

    #[test]
    fn test_validate_rejects_mismatched_lengths() {
        let mut vector = sample_vector();
        vector.index_bits.pop();
        assert!(vector.validate(&HashFunction::Blake2s).is_err());
    }

    #[test]
    fn test_validate_rejects_unreduced_secret_key() {
        let mut vector = sample_vector();
        vector.secret_key = crate::codec::GROUP_ORDER_BE;
        vector.secret_key[31] += 1;
        let err = vector.validate(&HashFunction::Blake2s).unwrap_err();
        assert!(err.to_string().contains("not reduced"));
    }

    #[test]
    fn test_record_json_shape() {
        let record = VectorRecord::from(&sample_vector());
        let json: serde_json::Value =
            serde_json::from_str(&record.to_json_pretty().unwrap()).unwrap();

        assert_eq!(
            json["inputs"]["secretKeyBytes"],
            "0x0000000000000000000000000000000000000000000000000000000000000001"
        );
        assert_eq!(json["inputs"]["validatorMerklePath"].as_array().unwrap().len(), 6);
        assert_eq!(
            json["inputs"]["validatorMerkleIndices"],
            serde_json::json!([1, 0, 0, 0, 0, 0])
        );
        assert_eq!(json["metadata"]["treeDepth"], 2);
        assert!(json["expected"]["publicKey"]["x"]
            .as_str()
            .unwrap()
            .starts_with("0xbbc622db"));
        assert!(json["expected"]["keyImage"]["y"].is_string());
    }

    #[test]
    fn test_record_converts_back() {
        let vector = sample_vector();
        let record = VectorRecord::from(&vector);
        assert_eq!(TestVector::try_from(&record).unwrap(), vector);
    }

    #[test]
    fn test_record_rejects_bad_index_value() {
        let mut record = VectorRecord::from(&sample_vector());
        record.inputs.validator_merkle_indices[0] = 2;
        assert!(TestVector::try_from(&record).is_err());
    }

    #[test]
    fn test_record_rejects_short_coordinate() {
        let mut record = VectorRecord::from(&sample_vector());
        record.expected.key_image.x = "0x1234".to_string();
        let err = TestVector::try_from(&record).unwrap_err();
        assert!(format!("{err:#}").contains("48 bytes"));
    }

    #[test]
    fn test_record_file_round_trip() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("vector.json");
        let record = VectorRecord::from(&sample_vector());

        record.save_to_file(&path).unwrap();
        assert_eq!(VectorRecord::load_from_file(&path).unwrap(), record);
    }
}
