//! Fixed-arity binary Merkle tree over hashed validator public keys.
//!
//! Every level is stored so proofs are read back from the same nodes the root
//! was computed from. A level of odd length pairs its last node with itself,
//! both when building and when extracting a sibling.

use std::fmt;

use crate::error::MerkleError;
use crate::hash::{Digest, DigestFn, HashFunction, HASH_SIZE};

/// A Merkle proof for leaf inclusion.
///
/// `siblings` holds one digest per non-root level of the tree it came from,
/// ordered from the leaf level upwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleProof {
    pub leaf: Digest,
    pub root: Digest,
    pub siblings: Vec<Digest>,
    pub index: usize,
}

/// A binary Merkle tree, immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleTree<H = HashFunction> {
    levels: Vec<Vec<Digest>>,
    hasher: H,
}

fn next_level<H: DigestFn>(level: &[Digest], hasher: &H) -> Vec<Digest> {
    level
        .chunks(2)
        .map(|pair| match pair {
            [left, right] => hasher.hash_pair(left, right),
            [last] => hasher.hash_pair(last, last),
            _ => unreachable!("chunks(2) yields one or two nodes"),
        })
        .collect()
}

impl<H: DigestFn> MerkleTree<H> {
    /// Builds the tree and stores every level.
    ///
    /// # Arguments
    /// * `leaves` - 32-byte leaf digests, in index order
    /// * `hasher` - Hash applied to every pair of child nodes
    ///
    /// # Returns
    /// A tree whose last level holds only the root. On an odd-length level
    /// the last node is hashed with itself.
    ///
    /// # Errors
    /// Returns [`MerkleError::EmptyTree`] if `leaves` is empty.
    pub fn build(leaves: Vec<Digest>, hasher: H) -> Result<Self, MerkleError> {
        if leaves.is_empty() {
            return Err(MerkleError::EmptyTree);
        }

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let parent = next_level(level, &hasher);
            levels.push(parent);
        }

        Ok(MerkleTree { levels, hasher })
    }

    #[must_use]
    pub fn root(&self) -> Digest {
        // `build` never produces an empty or multi-node top level.
        self.levels[self.levels.len() - 1][0]
    }

    #[must_use]
    pub fn leaves(&self) -> &[Digest] {
        &self.levels[0]
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.levels[0].len()
    }

    /// Number of levels above the leaves, i.e. the natural proof length.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    #[must_use]
    pub fn levels(&self) -> &[Vec<Digest>] {
        &self.levels
    }

    #[must_use]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Generate a Merkle proof for the leaf at `leaf_index`.
    ///
    /// # Errors
    /// Returns [`MerkleError::IndexOutOfRange`] if the index is not a leaf.
    pub fn generate_proof(&self, leaf_index: usize) -> Result<MerkleProof, MerkleError> {
        if leaf_index >= self.leaf_count() {
            return Err(MerkleError::IndexOutOfRange {
                index: leaf_index,
                leaf_count: self.leaf_count(),
            });
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut index = leaf_index;

        for level in &self.levels[..self.depth()] {
            let sibling = if index % 2 == 0 {
                level.get(index + 1).unwrap_or(&level[index])
            } else {
                &level[index - 1]
            };
            siblings.push(*sibling);
            index /= 2;
        }

        Ok(MerkleProof {
            leaf: self.levels[0][leaf_index],
            root: self.root(),
            siblings,
            index: leaf_index,
        })
    }

    /// Verify a Merkle proof against this tree's root.
    #[must_use]
    pub fn verify_proof(&self, proof: &MerkleProof) -> bool {
        proof.root == self.root() && proof.compute_root(&self.hasher) == self.root()
    }
}

impl MerkleProof {
    /// Natural depth of the tree the proof was taken from.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }

    /// Rehashes from the leaf to the root, choosing concatenation order per index bit.
    #[must_use]
    pub fn compute_root<H: DigestFn>(&self, hasher: &H) -> Digest {
        compute_root(&self.leaf, &self.siblings, self.index, hasher)
    }

    /// Siblings followed by zero digests up to `depth` entries.
    ///
    /// # Errors
    /// Returns [`MerkleError::DepthExceeded`] if the proof is already longer
    /// than `depth`.
    pub fn padded_path(&self, depth: usize) -> Result<Vec<Digest>, MerkleError> {
        if self.depth() > depth {
            return Err(MerkleError::DepthExceeded {
                natural: self.depth(),
                target: depth,
            });
        }

        let mut path = self.siblings.clone();
        path.resize(depth, [0u8; HASH_SIZE]);
        Ok(path)
    }

    /// Index bits of this proof's leaf, padded to `depth`.
    ///
    /// # Errors
    /// See [`index_bits`].
    pub fn index_bits(&self, depth: usize) -> Result<Vec<bool>, MerkleError> {
        index_bits(self.index, depth)
    }
}

/// Rehashes `leaf` up through `siblings`.
///
/// Bit `i` of `index` selects whether the running hash is the right (1) or
/// left (0) input at level `i`.
#[must_use]
pub fn compute_root<H: DigestFn>(
    leaf: &Digest,
    siblings: &[Digest],
    index: usize,
    hasher: &H,
) -> Digest {
    let mut current = *leaf;
    let mut index = index;

    for sibling in siblings {
        current = if index % 2 == 0 {
            hasher.hash_pair(&current, sibling)
        } else {
            hasher.hash_pair(sibling, &current)
        };
        index /= 2;
    }

    current
}

/// Bits of `index`, least significant first, padded with zeros to `depth`.
///
/// `true` marks a right child.
///
/// # Errors
/// Returns [`MerkleError::IndexOutOfRange`] if `index` does not fit in
/// `depth` bits.
pub fn index_bits(index: usize, depth: usize) -> Result<Vec<bool>, MerkleError> {
    let fits = u32::try_from(depth)
        .ok()
        .and_then(|d| 1usize.checked_shl(d))
        .map_or(true, |capacity| index < capacity);

    if !fits {
        return Err(MerkleError::IndexOutOfRange {
            index,
            leaf_count: 1usize << depth,
        });
    }

    Ok((0..depth)
        .map(|bit| bit < usize::BITS as usize && (index >> bit) & 1 == 1)
        .collect())
}

impl fmt::Display for MerkleProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MerkleProof:\n  Leaf: {}\n  Root: {}\n  Index: {}\n  Siblings: {}",
            hex::encode(self.leaf),
            hex::encode(self.root),
            self.index,
            self.siblings.len()
        )
    }
}
