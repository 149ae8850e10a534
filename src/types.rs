//! Core data types for peridynamic computations.
//!
//! Node positions are stored as 3-component vectors regardless of the
//! problem dimension; for 1D and 2D problems the unused components are held
//! at zero, so norms and differences need no dimension-specific code paths.

use crate::error::{Error, Result};
use nalgebra::Vector3;

/// A material point position (reference or current).
pub type Point3 = Vector3<f64>;

/// A 3D vector (bond, direction, force density).
pub type Vec3 = Vector3<f64>;

/// Spatial dimension of the problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    /// 1D bar.
    One,
    /// 2D plane (stress or strain, selected by the constitutive law).
    Two,
    /// 3D solid.
    Three,
}

impl Dimension {
    /// Checked conversion from a raw dimension count.
    pub fn from_usize(dim: usize) -> Result<Self> {
        match dim {
            1 => Ok(Dimension::One),
            2 => Ok(Dimension::Two),
            3 => Ok(Dimension::Three),
            d => Err(Error::InvalidConfiguration(format!(
                "unsupported dimension {} (expected 1, 2 or 3)",
                d
            ))),
        }
    }

    /// Number of meaningful vector components.
    pub fn n_components(self) -> usize {
        match self {
            Dimension::One => 1,
            Dimension::Two => 2,
            Dimension::Three => 3,
        }
    }
}

/// Bond vector from node `from` to node `to`.
#[inline]
pub fn bond(from: &Point3, to: &Point3) -> Vec3 {
    to - from
}

/// Bond length between two positions.
#[inline]
pub fn bond_length(from: &Point3, to: &Point3) -> f64 {
    (to - from).norm()
}
