//! Elastic state-based force evaluation.
//!
//! One evaluation runs two strictly sequential phases over the node set:
//!
//! 1. Dilatation: per-bond extensions e[i, p] and the nonlocal volumetric
//!    strain θ[i] of every node.
//! 2. Internal force: the scalar bond force of every ordered pair (i, p),
//!    applied antisymmetrically to both nodes' force densities.
//!
//! The 2D/3D bond force needs θ, so the dilatation phase must reach its
//! barrier for *all* nodes before any force work starts; the ordering is part
//! of the contract, not an optimization. Both phases are partitioned over
//! contiguous node slices with per-worker private accumulators (see
//! [`crate::partition`]).
//!
//! All derived quantities are recomputed from scratch per call; nothing
//! persists between evaluations.

use crate::bond::BondState;
use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::material::ConstitutiveLaw;
use crate::neighbors::{validate_families, NeighborProvider};
use crate::partition::{split_ranges, sum_reduce, sum_reduce_pair, EvalOptions};
use crate::types::{Point3, Vec3};
use std::ops::Range;

/// Output of one force evaluation at a single time instant.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// Dilatation θ[i] per node.
    pub dilatation: Vec<f64>,
    /// Extension e[i, p] per ordered bond.
    pub extension: BondState,
    /// Internal force density per node.
    pub force: Vec<Vec3>,
}

/// Compute per-bond extensions and per-node dilatation.
///
/// Inputs are assumed validated (see [`ElasticMaterial::new`]): every node
/// with a non-empty family has a positive weighted volume, and families obey
/// the provider contract. Accumulation runs in ascending neighbor order
/// within each node and the slice buffers merge in fixed order, so results
/// are reproducible for a given slice set.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if any reference bond has zero length.
pub fn compute_dilatation<P: NeighborProvider + ?Sized>(
    geometry: &Geometry,
    current: &[Point3],
    weighted_volume: &[f64],
    provider: &P,
    law: &ConstitutiveLaw,
    influence: f64,
    ranges: &[Range<usize>],
) -> Result<(Vec<f64>, BondState)> {
    let nodes = geometry.nodes();
    let volumes = geometry.volumes();
    let n = nodes.len();

    let mut state = BondState::zeros(provider, n);
    let n_bonds = state.n_bonds();

    let (dilatation, extensions) =
        sum_reduce_pair(ranges, n, n_bonds, |range, theta, ext| {
            for i in range {
                let wv = weighted_volume[i];
                let family = state.family_range(i);
                for (slot, &p) in family.clone().zip(state.family(i)) {
                    let x_len = (nodes[p] - nodes[i]).norm();
                    if x_len == 0.0 {
                        return Err(Error::DegenerateGeometry(format!(
                            "zero-length reference bond between nodes {} and {}",
                            i, p
                        )));
                    }
                    let y_len = (current[p] - current[i]).norm();
                    let e = y_len - x_len;
                    ext[slot] = e;
                    theta[i] += law.dilatation_term(wv, influence, x_len, e, volumes[p]);
                }
            }
            Ok(())
        })?;

    state.values_mut().copy_from_slice(&extensions);
    Ok((dilatation, state))
}

/// Compute the internal force density of every node.
///
/// For each ordered bond (i, p) the scalar bond force t is applied as
/// `force[i] += t·M·vol[p]` and `force[p] -= t·M·vol[i]` with M the current
/// unit bond direction. The pair update is exactly antisymmetric, so the
/// total force over a closed system with symmetric families sums to zero up
/// to rounding; providers with asymmetric families forfeit that guarantee.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if two bonded points occupy the same current
/// position (the unit direction is undefined).
pub fn compute_internal_force(
    geometry: &Geometry,
    current: &[Point3],
    weighted_volume: &[f64],
    dilatation: &[f64],
    extension: &BondState,
    law: &ConstitutiveLaw,
    influence: f64,
    ranges: &[Range<usize>],
) -> Result<Vec<Vec3>> {
    let nodes = geometry.nodes();
    let volumes = geometry.volumes();
    let n = nodes.len();

    let flat = sum_reduce(ranges, 3 * n, |range, buf| {
        for i in range {
            let wv = weighted_volume[i];
            let family = extension.family_range(i);
            for (slot, &p) in family.clone().zip(extension.family(i)) {
                let x_len = (nodes[p] - nodes[i]).norm();
                let y = current[p] - current[i];
                let y_len = y.norm();
                if y_len == 0.0 {
                    return Err(Error::DegenerateGeometry(format!(
                        "nodes {} and {} collapsed to the same current position",
                        i, p
                    )));
                }
                let direction = y / y_len;

                let e = extension.values()[slot];
                let t = law.bond_force(wv, influence, x_len, e, dilatation[i]);

                let pair = t * direction;
                for c in 0..3 {
                    buf[3 * i + c] += pair[c] * volumes[p];
                    buf[3 * p + c] -= pair[c] * volumes[i];
                }
            }
        }
        Ok(())
    })?;

    Ok(flat
        .chunks_exact(3)
        .map(|c| Vec3::new(c[0], c[1], c[2]))
        .collect())
}

/// Elastic peridynamic material: orchestrates the dilatation and internal
/// force phases for one time instant, given current positions.
///
/// Construction validates configuration once, before any parallel work; the
/// per-call [`ElasticMaterial::evaluate`] only checks the fresh inputs.
pub struct ElasticMaterial<'a, P: NeighborProvider + ?Sized> {
    geometry: &'a Geometry,
    provider: &'a P,
    weighted_volume: &'a [f64],
    law: ConstitutiveLaw,
    influence: f64,
    ranges: Vec<Range<usize>>,
}

impl<'a, P: NeighborProvider + ?Sized> ElasticMaterial<'a, P> {
    /// Validate configuration and bind the read-only shared state of an
    /// evaluation: geometry, neighbor families, weighted volumes, law.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` for a law/geometry dimension mismatch, a
    ///   non-positive influence value, a weighted-volume array of the wrong
    ///   length, a non-positive weighted volume on a node with a non-empty
    ///   family, or a zero worker count.
    /// - `NeighborContract` if any family contains the node itself, a
    ///   duplicate, or an out-of-range id.
    pub fn new(
        geometry: &'a Geometry,
        provider: &'a P,
        weighted_volume: &'a [f64],
        law: ConstitutiveLaw,
        influence: f64,
        options: &EvalOptions,
    ) -> Result<Self> {
        let n = geometry.n_nodes();

        if law.dimension() != geometry.dim() {
            return Err(Error::InvalidConfiguration(format!(
                "constitutive law is {:?} but geometry is {:?}",
                law.dimension(),
                geometry.dim()
            )));
        }
        if influence <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "influence function value must be positive, got {}",
                influence
            )));
        }
        if weighted_volume.len() != n {
            return Err(Error::InvalidConfiguration(format!(
                "weighted volume has {} entries for {} nodes",
                weighted_volume.len(),
                n
            )));
        }

        validate_families(provider, n)?;

        for (i, &wv) in weighted_volume.iter().enumerate() {
            if !provider.family_of(i).is_empty() && wv <= 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "node {} has a non-empty family but weighted volume {}",
                    i, wv
                )));
            }
        }

        let ranges = split_ranges(n, options.n_workers)?;

        Ok(Self {
            geometry,
            provider,
            weighted_volume,
            law,
            influence,
            ranges,
        })
    }

    /// Evaluate dilatation and internal force density for the given current
    /// positions.
    ///
    /// The dilatation phase runs to completion over all nodes before the
    /// force phase starts.
    pub fn evaluate(&self, current: &[Point3]) -> Result<Evaluation> {
        let n = self.geometry.n_nodes();
        if current.len() != n {
            return Err(Error::InvalidConfiguration(format!(
                "current positions have {} entries for {} nodes",
                current.len(),
                n
            )));
        }

        let (dilatation, extension) = compute_dilatation(
            self.geometry,
            current,
            self.weighted_volume,
            self.provider,
            &self.law,
            self.influence,
            &self.ranges,
        )?;

        let force = compute_internal_force(
            self.geometry,
            current,
            self.weighted_volume,
            &dilatation,
            &extension,
            &self.law,
            self.influence,
            &self.ranges,
        )?;

        Ok(Evaluation {
            dilatation,
            extension,
            force,
        })
    }
}
