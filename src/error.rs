//! Error types for vector generation.
//!
//! Every error is fatal for a generation run: nothing is retried and no
//! output file is written once one of these is returned.

use thiserror::Error;

/// Errors from byte, hex and integer conversions.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    /// The value needs more bytes than the requested fixed width.
    #[error("value needs {required} bytes but the encoding width is {width}")]
    Encoding { width: usize, required: usize },

    #[error("invalid hex string: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("{name} must be {expected} bytes, got {actual}")]
    InvalidLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },
}

/// Errors from the curve point engine.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    #[error("normalized point is not on the curve")]
    Malformed,
}

/// Errors from Merkle tree construction and proof extraction.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MerkleError {
    #[error("cannot build a Merkle tree without leaves")]
    EmptyTree,

    #[error("leaf index {index} is out of range for {leaf_count} leaves")]
    IndexOutOfRange { index: usize, leaf_count: usize },

    #[error("tree depth {natural} exceeds the target path depth {target}")]
    DepthExceeded { natural: usize, target: usize },
}

/// Crate-level error returned by the vector generator.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Merkle(#[from] MerkleError),

    #[error("the validator set needs at least one leaf")]
    ZeroLeaves,

    #[error("{leaf_count} leaves do not fit in a tree of depth {depth}")]
    LeafCountExceedsDepth { leaf_count: usize, depth: usize },

    #[error("target index {index} is out of range for {leaf_count} leaves")]
    TargetIndex { index: usize, leaf_count: usize },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
