//! BLS12-381 G1 point arithmetic and fixed-width coordinate encoding.

use bls12_381::{G1Affine, G1Projective, Scalar};
use std::fmt;

use crate::error::CurveError;

/// Width of one base field coordinate.
pub const COORDINATE_SIZE: usize = 48;

/// Width of an uncompressed `x ‖ y` point encoding.
pub const POINT_SIZE: usize = 2 * COORDINATE_SIZE;

/// Canonical affine coordinates of a non-identity point, big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AffineCoordinates {
    pub x: [u8; COORDINATE_SIZE],
    pub y: [u8; COORDINATE_SIZE],
}

impl AffineCoordinates {
    /// Both coordinates as little-endian byte arrays.
    #[must_use]
    pub fn to_le(&self) -> ([u8; COORDINATE_SIZE], [u8; COORDINATE_SIZE]) {
        let mut x = self.x;
        let mut y = self.y;
        x.reverse();
        y.reverse();
        (x, y)
    }
}

/// A point on the G1 group, kept in projective form until it is normalized.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CurvePoint(G1Projective);

impl CurvePoint {
    /// The point at infinity.
    #[must_use]
    pub fn identity() -> Self {
        Self(G1Projective::identity())
    }

    /// The fixed G1 generator.
    #[must_use]
    pub fn generator() -> Self {
        Self(G1Projective::generator())
    }

    #[must_use]
    pub fn is_identity(&self) -> bool {
        bool::from(self.0.is_identity())
    }

    #[must_use]
    pub fn inner(&self) -> G1Projective {
        self.0
    }

    /// Converts to canonical affine coordinates.
    ///
    /// Returns `Ok(None)` for the identity.
    ///
    /// # Errors
    /// Returns [`CurveError::Malformed`] if the normalized point does not
    /// satisfy the curve equation.
    pub fn normalize(&self) -> Result<Option<AffineCoordinates>, CurveError> {
        let affine = G1Affine::from(self.0);
        if bool::from(affine.is_identity()) {
            return Ok(None);
        }
        if !bool::from(affine.is_on_curve()) {
            return Err(CurveError::Malformed);
        }

        // The uncompressed encoding of a finite point carries no flag bits:
        // the base field modulus leaves the top three bits of x clear.
        let uncompressed = affine.to_uncompressed();
        let mut x = [0u8; COORDINATE_SIZE];
        let mut y = [0u8; COORDINATE_SIZE];
        x.copy_from_slice(&uncompressed[..COORDINATE_SIZE]);
        y.copy_from_slice(&uncompressed[COORDINATE_SIZE..]);

        Ok(Some(AffineCoordinates { x, y }))
    }

    /// Serializes each coordinate as 48 little-endian bytes.
    ///
    /// The identity serializes to two all-zero arrays.
    ///
    /// # Errors
    /// Propagates [`CurveError::Malformed`] from [`CurvePoint::normalize`].
    pub fn serialize_le(&self) -> Result<([u8; COORDINATE_SIZE], [u8; COORDINATE_SIZE]), CurveError> {
        Ok(self
            .normalize()?
            .map_or(([0u8; COORDINATE_SIZE], [0u8; COORDINATE_SIZE]), |coords| {
                coords.to_le()
            }))
    }

    /// The 96-byte `x_le ‖ y_le` encoding hashed into Merkle leaves.
    ///
    /// # Errors
    /// Propagates [`CurveError::Malformed`] from [`CurvePoint::normalize`].
    pub fn to_le_bytes(&self) -> Result<[u8; POINT_SIZE], CurveError> {
        let (x, y) = self.serialize_le()?;
        let mut bytes = [0u8; POINT_SIZE];
        bytes[..COORDINATE_SIZE].copy_from_slice(&x);
        bytes[COORDINATE_SIZE..].copy_from_slice(&y);
        Ok(bytes)
    }
}

impl From<G1Projective> for CurvePoint {
    fn from(point: G1Projective) -> Self {
        Self(point)
    }
}

impl fmt::Debug for CurvePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.serialize_le() {
            Ok((x, y)) if !self.is_identity() => f
                .debug_struct("CurvePoint")
                .field("x_le", &hex::encode(x))
                .field("y_le", &hex::encode(y))
                .finish(),
            Ok(_) => f.write_str("CurvePoint(identity)"),
            Err(_) => f.write_str("CurvePoint(malformed)"),
        }
    }
}

/// Computes `scalar * G` for the fixed generator `G`.
///
/// A zero scalar yields the identity.
#[must_use]
pub fn scalar_multiply(scalar: &Scalar) -> CurvePoint {
    CurvePoint(G1Projective::generator() * scalar)
}
