//! Per-bond extension state.
//!
//! The extension e[i, p] is defined only for p in the family of i, so the
//! state is stored as a flattened family-offset arena (the CSR idea: offsets,
//! neighbor ids, values) instead of a dense N×N matrix. Memory is
//! proportional to the total bond count.

use crate::neighbors::NeighborProvider;
use std::ops::Range;

/// Scalar state over all ordered bonds (i, p), p in family(i).
///
/// The topology (offsets and neighbor ids) is frozen at construction from a
/// neighbor provider; values are recomputed from scratch at every
/// evaluation.
#[derive(Debug, Clone)]
pub struct BondState {
    /// Per-node start offsets into `neighbors`/`values`, length n_nodes + 1.
    offsets: Vec<usize>,
    /// Neighbor ids, ascending within each node's range.
    neighbors: Vec<usize>,
    /// One scalar per ordered bond.
    values: Vec<f64>,
}

impl BondState {
    /// Build a zero-valued state with the topology of `provider`.
    pub fn zeros<P: NeighborProvider + ?Sized>(provider: &P, n_nodes: usize) -> Self {
        let mut offsets = Vec::with_capacity(n_nodes + 1);
        let mut neighbors = Vec::new();

        offsets.push(0);
        for i in 0..n_nodes {
            neighbors.extend_from_slice(provider.family_of(i));
            offsets.push(neighbors.len());
        }

        let values = vec![0.0; neighbors.len()];
        Self {
            offsets,
            neighbors,
            values,
        }
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of ordered bonds.
    pub fn n_bonds(&self) -> usize {
        self.neighbors.len()
    }

    /// Range of flat bond slots belonging to node `i`.
    #[inline]
    pub fn family_range(&self, i: usize) -> Range<usize> {
        self.offsets[i]..self.offsets[i + 1]
    }

    /// Neighbor ids of node `i`, ascending.
    #[inline]
    pub fn family(&self, i: usize) -> &[usize] {
        &self.neighbors[self.family_range(i)]
    }

    /// Flat slot of the bond (i, p), if p is in the family of i.
    #[inline]
    pub fn bond_index(&self, i: usize, p: usize) -> Option<usize> {
        let range = self.family_range(i);
        let k = self.neighbors[range.clone()].binary_search(&p).ok()?;
        Some(range.start + k)
    }

    /// Value of the bond (i, p), if it exists.
    pub fn get(&self, i: usize, p: usize) -> Option<f64> {
        self.bond_index(i, p).map(|slot| self.values[slot])
    }

    /// All bond values, flat, in (node, ascending-neighbor) order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mutable access to the flat bond values.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }
}
