//! peristate - state-based peridynamic elasticity core
//!
//! Nonlocal solid mechanics: each material point interacts with every other
//! point within a finite horizon, and internal force arises from pairwise
//! bond-stretch contributions integrated over that neighbor family. This
//! crate computes, for a given deformed configuration:
//!
//! - the scalar dilatation per node (nonlocal volumetric strain), and
//! - the internal force density per node,
//!
//! with dimension-specific constitutive laws (1D bar, 2D plane
//! stress/strain, 3D solid) and a deterministic fork-join parallel
//! decomposition over node slices.
//!
//! # Architecture
//!
//! - [`Geometry`]: reference positions and volumes of the material points
//! - [`NeighborProvider`] trait: neighbor families within the horizon
//!   ([`HorizonSearch`] is the built-in brute-force implementation)
//! - [`ConstitutiveLaw`]: enum-dispatched dimension-specific coefficients
//! - [`BondState`]: sparse per-bond extension state
//! - [`ElasticMaterial`]: facade running the dilatation phase to a full
//!   barrier, then the force phase
//!
//! The configuration/deck layer, geometry file ingestion, and the nonlinear
//! quasi-static solver are external collaborators; this crate ends at the
//! dilatation and force fields they consume.

pub mod bond;
pub mod ccm;
pub mod elastic;
pub mod error;
pub mod geometry;
pub mod material;
pub mod neighbors;
pub mod partition;
pub mod types;

pub use bond::BondState;
pub use ccm::CcmComparison;
pub use elastic::{ElasticMaterial, Evaluation};
pub use error::{Error, Result};
pub use geometry::Geometry;
pub use material::{ConstitutiveLaw, PlaneMode};
pub use neighbors::{weighted_volumes, HorizonSearch, NeighborProvider};
pub use partition::EvalOptions;
pub use types::{Dimension, Point3, Vec3};
