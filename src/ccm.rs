//! Classical continuum mechanics comparison.
//!
//! Post-processing diagnostics that approximate the local deformation
//! gradient and strain from the nonlocal fields, for comparing peridynamic
//! results against classical continuum solutions:
//!
//! 1. Shape tensor K[i] = Σ_p w · X Xᵀ · vol[p] over the family of i
//! 2. Deformation gradient F[i] = (Σ_p w · Y Xᵀ · vol[p]) · K[i]⁻¹
//! 3. Nonlocal strain ε[i] = F[i] − I
//!
//! All tensors are dim×dim, built from the meaningful position components
//! only. Output formatting is the caller's concern.

use crate::error::{Error, Result};
use crate::geometry::Geometry;
use crate::neighbors::NeighborProvider;
use crate::types::Point3;
use nalgebra::DMatrix;

/// Nonlocal-to-local comparison computer for one reference configuration.
pub struct CcmComparison<'a, P: NeighborProvider + ?Sized> {
    geometry: &'a Geometry,
    provider: &'a P,
    influence: f64,
}

impl<'a, P: NeighborProvider + ?Sized> CcmComparison<'a, P> {
    /// Bind the geometry, families, and influence-function value.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the influence value is not positive.
    pub fn new(geometry: &'a Geometry, provider: &'a P, influence: f64) -> Result<Self> {
        if influence <= 0.0 {
            return Err(Error::InvalidConfiguration(format!(
                "influence function value must be positive, got {}",
                influence
            )));
        }
        Ok(Self {
            geometry,
            provider,
            influence,
        })
    }

    /// Shape tensor K[i] = Σ_p w · X Xᵀ · vol[p].
    pub fn shape_tensor(&self, node: usize) -> DMatrix<f64> {
        let dim = self.geometry.dim().n_components();
        let nodes = self.geometry.nodes();
        let volumes = self.geometry.volumes();

        let mut k = DMatrix::zeros(dim, dim);
        for &p in self.provider.family_of(node) {
            let x = nodes[p] - nodes[node];
            for r in 0..dim {
                for c in 0..dim {
                    k[(r, c)] += self.influence * x[r] * x[c] * volumes[p];
                }
            }
        }
        k
    }

    /// Deformation gradient F[i] from the current positions.
    ///
    /// # Errors
    ///
    /// Returns `DegenerateGeometry` if the shape tensor is singular (the
    /// family does not span the problem dimension, e.g. colinear neighbors
    /// in 2D).
    pub fn deformation_gradient(&self, node: usize, current: &[Point3]) -> Result<DMatrix<f64>> {
        let dim = self.geometry.dim().n_components();
        let nodes = self.geometry.nodes();
        let volumes = self.geometry.volumes();

        let k = self.shape_tensor(node);
        let k_inv = k.try_inverse().ok_or_else(|| {
            Error::DegenerateGeometry(format!(
                "singular shape tensor at node {} (family does not span the domain)",
                node
            ))
        })?;

        let mut m: DMatrix<f64> = DMatrix::zeros(dim, dim);
        for &p in self.provider.family_of(node) {
            let x = nodes[p] - nodes[node];
            let y = current[p] - current[node];
            for r in 0..dim {
                for c in 0..dim {
                    m[(r, c)] += self.influence * y[r] * x[c] * volumes[p];
                }
            }
        }

        Ok(m * k_inv)
    }

    /// Nonlocal strain ε[i] = F[i] − I.
    pub fn strain_tensor(&self, node: usize, current: &[Point3]) -> Result<DMatrix<f64>> {
        let dim = self.geometry.dim().n_components();
        let f = self.deformation_gradient(node, current)?;
        Ok(f - DMatrix::identity(dim, dim))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neighbors::HorizonSearch;
    use crate::types::Dimension;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn grid_2d() -> (Geometry, HorizonSearch) {
        let mut geom = Geometry::new(Dimension::Two);
        for y in 0..3 {
            for x in 0..3 {
                geom.add_node(Point3::new(x as f64, y as f64, 0.0), 1.0)
                    .unwrap();
            }
        }
        let search = HorizonSearch::new(&geom, 1.5).unwrap();
        (geom, search)
    }

    #[test]
    fn test_shape_tensor_symmetric() {
        let (geom, search) = grid_2d();
        let ccm = CcmComparison::new(&geom, &search, 1.0).unwrap();

        let k = ccm.shape_tensor(4); // center node
        assert_eq!(k.nrows(), 2);
        assert_relative_eq!(k[(0, 1)], k[(1, 0)], epsilon = 1e-15);
        assert!(k[(0, 0)] > 0.0 && k[(1, 1)] > 0.0);
    }

    #[test]
    fn test_identity_deformation_zero_strain() {
        let (geom, search) = grid_2d();
        let ccm = CcmComparison::new(&geom, &search, 1.0).unwrap();

        let strain = ccm.strain_tensor(4, geom.nodes()).unwrap();
        for r in 0..2 {
            for c in 0..2 {
                assert_abs_diff_eq!(strain[(r, c)], 0.0, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_homogeneous_stretch_recovered_exactly() {
        let (geom, search) = grid_2d();
        let ccm = CcmComparison::new(&geom, &search, 1.0).unwrap();

        // y = diag(1.02, 0.99) · x is affine, so the nonlocal gradient
        // reproduces it exactly at every node.
        let current: Vec<Point3> = geom
            .nodes()
            .iter()
            .map(|p| Point3::new(1.02 * p.x, 0.99 * p.y, 0.0))
            .collect();

        for node in 0..geom.n_nodes() {
            let strain = ccm.strain_tensor(node, &current).unwrap();
            assert_relative_eq!(strain[(0, 0)], 0.02, epsilon = 1e-10);
            assert_relative_eq!(strain[(1, 1)], -0.01, epsilon = 1e-10);
            assert_abs_diff_eq!(strain[(0, 1)], 0.0, epsilon = 1e-12);
            assert_abs_diff_eq!(strain[(1, 0)], 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_simple_shear_gradient() {
        let (geom, search) = grid_2d();
        let ccm = CcmComparison::new(&geom, &search, 1.0).unwrap();

        // y = x + γ·(x_y, 0): F = [[1, γ], [0, 1]].
        let gamma = 0.05;
        let current: Vec<Point3> = geom
            .nodes()
            .iter()
            .map(|p| Point3::new(p.x + gamma * p.y, p.y, 0.0))
            .collect();

        let f = ccm.deformation_gradient(4, &current).unwrap();
        assert_relative_eq!(f[(0, 0)], 1.0, epsilon = 1e-10);
        assert_relative_eq!(f[(0, 1)], gamma, epsilon = 1e-10);
        assert_abs_diff_eq!(f[(1, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(f[(1, 1)], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_singular_shape_tensor_rejected() {
        // 2D geometry whose families are colinear: K is rank 1.
        let mut geom = Geometry::new(Dimension::Two);
        geom.add_node(Point3::new(0.0, 0.0, 0.0), 1.0).unwrap();
        geom.add_node(Point3::new(1.0, 0.0, 0.0), 1.0).unwrap();
        geom.add_node(Point3::new(2.0, 0.0, 0.0), 1.0).unwrap();
        let search = HorizonSearch::new(&geom, 1.5).unwrap();

        let ccm = CcmComparison::new(&geom, &search, 1.0).unwrap();
        let result = ccm.deformation_gradient(1, geom.nodes());
        assert!(matches!(result, Err(Error::DegenerateGeometry(_))));
    }

    #[test]
    fn test_invalid_influence_rejected() {
        let (geom, search) = grid_2d();
        assert!(CcmComparison::new(&geom, &search, 0.0).is_err());
    }
}
