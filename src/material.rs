//! Constitutive laws for the elastic peridynamic material.
//!
//! The dimension-specific coefficients are selected once at construction
//! through an enum-dispatched law instead of branching on the dimension
//! inside the bond loops. 1D uses the Young's modulus directly; 2D and 3D
//! use the bulk/shear moduli with an isotropic/deviatoric split of the bond
//! force.

use crate::error::{Error, Result};
use crate::types::Dimension;

/// 2D idealization mode.
///
/// Selects which reduction of the 3D law the plane problem uses. There is no
/// default; the caller must choose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneMode {
    /// Thin body, zero out-of-plane stress.
    Stress,
    /// Thick body, zero out-of-plane strain.
    Strain,
}

/// Elastic constitutive law, one variant per problem dimension.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConstitutiveLaw {
    /// 1D bar.
    Bar {
        /// Young's modulus E (Pa).
        young_modulus: f64,
    },
    /// 2D plane stress or plane strain.
    Plane {
        /// Bulk modulus K (Pa).
        bulk_modulus: f64,
        /// Shear modulus μ (Pa).
        shear_modulus: f64,
        /// Poisson's ratio ν = (3K − 2μ) / (2(3K + μ)), derived.
        poisson_ratio: f64,
        /// Dilatation/force-state factor: (2ν − 1)/(ν − 1) for plane stress,
        /// 1 for plane strain.
        factor2d: f64,
        /// Which plane idealization the coefficients come from.
        mode: PlaneMode,
    },
    /// 3D solid.
    Solid {
        /// Bulk modulus K (Pa).
        bulk_modulus: f64,
        /// Shear modulus μ (Pa).
        shear_modulus: f64,
    },
}

fn check_positive(name: &str, value: f64) -> Result<()> {
    if value <= 0.0 {
        return Err(Error::InvalidConfiguration(format!(
            "{} must be positive, got {}",
            name, value
        )));
    }
    Ok(())
}

impl ConstitutiveLaw {
    /// 1D law from the Young's modulus.
    pub fn bar(young_modulus: f64) -> Result<Self> {
        check_positive("Young's modulus", young_modulus)?;
        Ok(ConstitutiveLaw::Bar { young_modulus })
    }

    /// 2D law from bulk and shear moduli, in the chosen plane mode.
    pub fn plane(bulk_modulus: f64, shear_modulus: f64, mode: PlaneMode) -> Result<Self> {
        check_positive("bulk modulus", bulk_modulus)?;
        check_positive("shear modulus", shear_modulus)?;

        let poisson_ratio = (3.0 * bulk_modulus - 2.0 * shear_modulus)
            / (2.0 * (3.0 * bulk_modulus + shear_modulus));
        let factor2d = match mode {
            PlaneMode::Stress => (2.0 * poisson_ratio - 1.0) / (poisson_ratio - 1.0),
            PlaneMode::Strain => 1.0,
        };

        Ok(ConstitutiveLaw::Plane {
            bulk_modulus,
            shear_modulus,
            poisson_ratio,
            factor2d,
            mode,
        })
    }

    /// 3D law from bulk and shear moduli.
    pub fn solid(bulk_modulus: f64, shear_modulus: f64) -> Result<Self> {
        check_positive("bulk modulus", bulk_modulus)?;
        check_positive("shear modulus", shear_modulus)?;
        Ok(ConstitutiveLaw::Solid {
            bulk_modulus,
            shear_modulus,
        })
    }

    /// Dimension this law applies to.
    pub fn dimension(&self) -> Dimension {
        match self {
            ConstitutiveLaw::Bar { .. } => Dimension::One,
            ConstitutiveLaw::Plane { .. } => Dimension::Two,
            ConstitutiveLaw::Solid { .. } => Dimension::Three,
        }
    }

    /// Contribution of one bond to the dilatation of node i.
    ///
    /// `weighted_volume` is W[i], `influence` the uniform influence-function
    /// value, `ref_length` = ‖x_p − x_i‖, `extension` = e[i,p], and `volume`
    /// the neighbor's volume.
    #[inline]
    pub fn dilatation_term(
        &self,
        weighted_volume: f64,
        influence: f64,
        ref_length: f64,
        extension: f64,
        volume: f64,
    ) -> f64 {
        let common = influence * ref_length * extension * volume / weighted_volume;
        match self {
            ConstitutiveLaw::Bar { .. } => common,
            ConstitutiveLaw::Plane { factor2d, .. } => 2.0 * factor2d * common,
            ConstitutiveLaw::Solid { .. } => 3.0 * common,
        }
    }

    /// Scalar bond force t for the bond (i, p).
    ///
    /// `dilatation` is θ[i]; the other arguments are as in
    /// [`Self::dilatation_term`].
    #[inline]
    pub fn bond_force(
        &self,
        weighted_volume: f64,
        influence: f64,
        ref_length: f64,
        extension: f64,
        dilatation: f64,
    ) -> f64 {
        match *self {
            ConstitutiveLaw::Bar { young_modulus } => {
                let alpha = young_modulus / weighted_volume;
                alpha * influence * extension
            }
            ConstitutiveLaw::Plane {
                bulk_modulus,
                shear_modulus,
                poisson_ratio,
                factor2d,
                mode,
            } => {
                let alpha_s = match mode {
                    PlaneMode::Stress => {
                        let c = (poisson_ratio + 1.0) / (2.0 * poisson_ratio - 1.0);
                        (9.0 / weighted_volume) * (bulk_modulus + c * c * shear_modulus / 9.0)
                    }
                    PlaneMode::Strain => {
                        (9.0 / weighted_volume) * (bulk_modulus + shear_modulus / 9.0)
                    }
                };
                let alpha_d = (8.0 / weighted_volume) * shear_modulus;

                let e_s = dilatation * ref_length / 3.0;
                let e_d = extension - e_s;

                let t_s = (2.0 * factor2d * alpha_s - (3.0 - 2.0 * factor2d) * alpha_d)
                    * influence
                    * e_s
                    / 3.0;
                let t_d = alpha_d * influence * e_d;
                t_s + t_d
            }
            ConstitutiveLaw::Solid {
                bulk_modulus,
                shear_modulus,
            } => {
                let alpha_s = (9.0 / weighted_volume) * bulk_modulus;
                let alpha_d = (15.0 / weighted_volume) * shear_modulus;

                let e_s = dilatation * ref_length / 3.0;
                let e_d = extension - e_s;
                alpha_s * influence * e_s + alpha_d * influence * e_d
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_invalid_moduli() {
        assert!(ConstitutiveLaw::bar(0.0).is_err());
        assert!(ConstitutiveLaw::bar(-1.0).is_err());
        assert!(ConstitutiveLaw::plane(-1.0, 1.0, PlaneMode::Stress).is_err());
        assert!(ConstitutiveLaw::plane(1.0, 0.0, PlaneMode::Strain).is_err());
        assert!(ConstitutiveLaw::solid(1.0, -1.0).is_err());
    }

    #[test]
    fn test_dimensions() {
        assert_eq!(
            ConstitutiveLaw::bar(1.0).unwrap().dimension(),
            Dimension::One
        );
        assert_eq!(
            ConstitutiveLaw::plane(1.0, 1.0, PlaneMode::Stress)
                .unwrap()
                .dimension(),
            Dimension::Two
        );
        assert_eq!(
            ConstitutiveLaw::solid(1.0, 1.0).unwrap().dimension(),
            Dimension::Three
        );
    }

    #[test]
    fn test_poisson_ratio_from_moduli() {
        // Steel-like: E = 200 GPa, ν = 0.3 -> K = E/(3(1-2ν)), μ = E/(2(1+ν)).
        let e = 200e9;
        let nu = 0.3;
        let k = e / (3.0 * (1.0 - 2.0 * nu));
        let mu = e / (2.0 * (1.0 + nu));

        let law = ConstitutiveLaw::plane(k, mu, PlaneMode::Stress).unwrap();
        match law {
            ConstitutiveLaw::Plane { poisson_ratio, .. } => {
                assert_relative_eq!(poisson_ratio, nu, epsilon = 1e-12);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_factor2d_plane_stress_vs_strain() {
        let k = 1.0e9;
        let mu = 0.5e9;
        let nu = (3.0 * k - 2.0 * mu) / (2.0 * (3.0 * k + mu));

        let stress = ConstitutiveLaw::plane(k, mu, PlaneMode::Stress).unwrap();
        match stress {
            ConstitutiveLaw::Plane { factor2d, .. } => {
                assert_relative_eq!(
                    factor2d,
                    (2.0 * nu - 1.0) / (nu - 1.0),
                    epsilon = 1e-12
                );
            }
            _ => unreachable!(),
        }

        let strain = ConstitutiveLaw::plane(k, mu, PlaneMode::Strain).unwrap();
        match strain {
            ConstitutiveLaw::Plane { factor2d, .. } => {
                assert_relative_eq!(factor2d, 1.0);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_bar_bond_force_is_linear_in_extension() {
        let law = ConstitutiveLaw::bar(10.0).unwrap();
        // t = (E / W) * w * e
        let t = law.bond_force(2.0, 1.0, 1.0, 0.1, 0.0);
        assert_relative_eq!(t, 0.5, epsilon = 1e-15);
        // Doubling the extension doubles the force.
        let t2 = law.bond_force(2.0, 1.0, 1.0, 0.2, 0.0);
        assert_relative_eq!(t2, 2.0 * t, epsilon = 1e-15);
    }

    #[test]
    fn test_dilatation_term_dimension_factors() {
        let bar = ConstitutiveLaw::bar(1.0).unwrap();
        let solid = ConstitutiveLaw::solid(1.0, 1.0).unwrap();

        let base = bar.dilatation_term(1.0, 1.0, 1.0, 0.1, 1.0);
        assert_relative_eq!(base, 0.1, epsilon = 1e-15);
        assert_relative_eq!(
            solid.dilatation_term(1.0, 1.0, 1.0, 0.1, 1.0),
            3.0 * base,
            epsilon = 1e-15
        );

        // Plane strain: factor2d = 1, so the weight is exactly 2/W.
        let plane = ConstitutiveLaw::plane(1.0, 1.0, PlaneMode::Strain).unwrap();
        assert_relative_eq!(
            plane.dilatation_term(1.0, 1.0, 1.0, 0.1, 1.0),
            2.0 * base,
            epsilon = 1e-15
        );
    }

    #[test]
    fn test_solid_bond_force_isotropic_deviatoric_split() {
        let k = 5.0;
        let mu = 3.0;
        let law = ConstitutiveLaw::solid(k, mu).unwrap();

        let wv = 2.0;
        let w = 1.0;
        let xn = 1.5;
        let e = 0.2;
        let theta = 0.3;

        let e_s = theta * xn / 3.0;
        let e_d = e - e_s;
        let expected = (9.0 / wv) * k * w * e_s + (15.0 / wv) * mu * w * e_d;

        assert_relative_eq!(law.bond_force(wv, w, xn, e, theta), expected, epsilon = 1e-15);
    }

    #[test]
    fn test_plane_stress_bond_force_matches_closed_form() {
        let k = 4.0;
        let mu = 2.0;
        let law = ConstitutiveLaw::plane(k, mu, PlaneMode::Stress).unwrap();

        let nu = (3.0 * k - 2.0 * mu) / (2.0 * (3.0 * k + mu));
        let f2d = (2.0 * nu - 1.0) / (nu - 1.0);

        let wv = 1.5;
        let w = 2.0;
        let xn = 0.5;
        let e = 0.1;
        let theta = 0.4;

        let c = (nu + 1.0) / (2.0 * nu - 1.0);
        let alpha_s = (9.0 / wv) * (k + c * c * mu / 9.0);
        let alpha_d = (8.0 / wv) * mu;
        let e_s = theta * xn / 3.0;
        let e_d = e - e_s;
        let expected =
            (2.0 * f2d * alpha_s - (3.0 - 2.0 * f2d) * alpha_d) * w * e_s / 3.0 + alpha_d * w * e_d;

        assert_relative_eq!(law.bond_force(wv, w, xn, e, theta), expected, epsilon = 1e-12);
    }
}
