//! Discretized geometry: material point positions and volumes.
//!
//! Reference positions are immutable once the geometry is built; current
//! (deformed) positions are supplied separately at each evaluation.

use crate::error::{Error, Result};
use crate::types::{Dimension, Point3};

/// The reference configuration of the body: one position and one volume per
/// material point.
#[derive(Debug, Clone)]
pub struct Geometry {
    dim: Dimension,
    nodes: Vec<Point3>,
    volumes: Vec<f64>,
}

impl Geometry {
    /// Create a new empty geometry for the given dimension.
    ///
    /// For 1D and 2D problems the unused position components must be zero.
    pub fn new(dim: Dimension) -> Self {
        Self {
            dim,
            nodes: Vec::new(),
            volumes: Vec::new(),
        }
    }

    /// Create a geometry with pre-allocated capacity.
    pub fn with_capacity(dim: Dimension, n_nodes: usize) -> Self {
        Self {
            dim,
            nodes: Vec::with_capacity(n_nodes),
            volumes: Vec::with_capacity(n_nodes),
        }
    }

    /// Add a material point, returning its index.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the volume is negative.
    pub fn add_node(&mut self, position: Point3, volume: f64) -> Result<usize> {
        if volume < 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "node volume must be non-negative, got {}",
                volume
            )));
        }
        let idx = self.nodes.len();
        self.nodes.push(position);
        self.volumes.push(volume);
        Ok(idx)
    }

    /// Problem dimension.
    pub fn dim(&self) -> Dimension {
        self.dim
    }

    /// Number of material points.
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Reference positions.
    pub fn nodes(&self) -> &[Point3] {
        &self.nodes
    }

    /// Per-node volumes.
    pub fn volumes(&self) -> &[f64] {
        &self.volumes
    }

    /// A specific node's reference position.
    pub fn node(&self, idx: usize) -> Option<&Point3> {
        self.nodes.get(idx)
    }

    /// Bounding box of the reference configuration.
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut min = self.nodes[0];
        let mut max = self.nodes[0];

        for node in &self.nodes[1..] {
            for i in 0..3 {
                min[i] = min[i].min(node[i]);
                max[i] = max[i].max(node[i]);
            }
        }

        Some((min, max))
    }

    /// Minimum distance between any two distinct material points.
    ///
    /// Diagnostic used to choose a horizon: the horizon is typically a small
    /// multiple of the grid spacing this reports. Returns `None` for
    /// geometries with fewer than two nodes.
    pub fn min_node_spacing(&self) -> Option<f64> {
        if self.nodes.len() < 2 {
            return None;
        }

        let mut min = f64::INFINITY;
        for i in 0..self.nodes.len() {
            for j in (i + 1)..self.nodes.len() {
                let d = (self.nodes[j] - self.nodes[i]).norm();
                if d < min {
                    min = d;
                }
            }
        }
        Some(min)
    }
}
