//! Neighbor families and weighted volumes.
//!
//! A node's family is the set of other nodes within the horizon in the
//! reference configuration. The force engine consumes families through the
//! [`NeighborProvider`] trait and never assumes the family relation is
//! symmetric; each ordered pair (i, p) is evaluated independently.

use crate::error::{Error, Result};
use crate::geometry::Geometry;

/// Horizon safety margin used when the horizon is derived from a grid
/// spacing, so nodes sitting exactly at the nominal radius are kept inside.
pub const HORIZON_SAFETY_MARGIN: f64 = 1.01;

/// Source of neighbor families.
///
/// Implementations must be pure functions of the reference geometry and the
/// horizon: read-only during an evaluation and callable concurrently from
/// multiple workers without synchronization. Families are ordered by
/// ascending node id so that accumulation order, and therefore floating-point
/// results, are reproducible across runs.
pub trait NeighborProvider: Send + Sync {
    /// Node ids within the horizon of `node`, ascending, never containing
    /// `node` itself.
    fn family_of(&self, node: usize) -> &[usize];
}

/// Brute-force neighbor search over all node pairs.
///
/// Families are precomputed at construction; `family_of` is a slice lookup.
/// Quadratic in the node count, which is acceptable at the problem sizes this
/// core targets.
#[derive(Debug, Clone)]
pub struct HorizonSearch {
    horizon: f64,
    families: Vec<Vec<usize>>,
}

impl HorizonSearch {
    /// Build families for every node of `geometry` using the given horizon.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the horizon is not positive.
    pub fn new(geometry: &Geometry, horizon: f64) -> Result<Self> {
        if horizon <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "horizon must be positive, got {}",
                horizon
            )));
        }

        let nodes = geometry.nodes();
        let mut families = Vec::with_capacity(nodes.len());
        for i in 0..nodes.len() {
            let mut family = Vec::new();
            // Ascending p by construction.
            for p in 0..nodes.len() {
                if p != i && (nodes[p] - nodes[i]).norm() <= horizon {
                    family.push(p);
                }
            }
            families.push(family);
        }

        Ok(Self { horizon, families })
    }

    /// Build families with the horizon taken as `factor` times `spacing`,
    /// widened by [`HORIZON_SAFETY_MARGIN`] so points lying exactly at the
    /// nominal radius stay inside the family.
    pub fn with_safety_margin(geometry: &Geometry, factor: f64, spacing: f64) -> Result<Self> {
        Self::new(geometry, factor * spacing * HORIZON_SAFETY_MARGIN)
    }

    /// The horizon used to build the families.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }
}

impl NeighborProvider for HorizonSearch {
    fn family_of(&self, node: usize) -> &[usize] {
        &self.families[node]
    }
}

/// Defensive check of the provider contract for nodes `0..n_nodes`.
///
/// # Errors
///
/// Returns `NeighborContract` if any family contains the node's own id, a
/// duplicate id, or an id outside `0..n_nodes`.
pub fn validate_families<P: NeighborProvider + ?Sized>(provider: &P, n_nodes: usize) -> Result<()> {
    for i in 0..n_nodes {
        let family = provider.family_of(i);
        let mut prev: Option<usize> = None;
        for &p in family {
            if p == i {
                return Err(Error::NeighborContract(format!(
                    "family of node {} contains the node itself",
                    i
                )));
            }
            if p >= n_nodes {
                return Err(Error::NeighborContract(format!(
                    "family of node {} contains out-of-range id {} (n_nodes = {})",
                    i, p, n_nodes
                )));
            }
            if let Some(prev) = prev {
                if p <= prev {
                    return Err(Error::NeighborContract(format!(
                        "family of node {} is not strictly ascending at id {}",
                        i, p
                    )));
                }
            }
            prev = Some(p);
        }
    }
    Ok(())
}

/// Weighted volume W[i] = Σ_p w·‖x_p − x_i‖²·vol[p] over the family of i.
///
/// Normalizes the dilatation; a node with an empty family gets W[i] = 0 and
/// must be excluded from force evaluation by the facade's entry checks.
///
/// # Errors
///
/// Returns `DegenerateGeometry` if any reference bond has zero length.
pub fn weighted_volumes<P: NeighborProvider + ?Sized>(
    geometry: &Geometry,
    provider: &P,
    influence: f64,
) -> Result<Vec<f64>> {
    let nodes = geometry.nodes();
    let volumes = geometry.volumes();

    let mut weighted = vec![0.0; nodes.len()];
    for (i, w) in weighted.iter_mut().enumerate() {
        for &p in provider.family_of(i) {
            let len_sq = (nodes[p] - nodes[i]).norm_squared();
            if len_sq == 0.0 {
                return Err(Error::DegenerateGeometry(format!(
                    "nodes {} and {} share the same reference position",
                    i, p
                )));
            }
            *w += influence * len_sq * volumes[p];
        }
    }
    Ok(weighted)
}
