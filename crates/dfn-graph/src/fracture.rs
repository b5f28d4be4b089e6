//! Fracture value object.

use crate::error::{NetworkError, NetworkResult};
use dfn_core::{Real, is_strictly_positive};
use dfn_fluids::Fluid;

/// Geometry of one planar fracture segment.
///
/// - `length`: distance between its two junctions, along the flow
/// - `height`: extent orthogonal to the flow, in the fracture plane
/// - `width`: aperture between the two fracture walls
///
/// Immutable once constructed; all derived coefficients are pure functions
/// of the geometry (and of fluid properties where stated).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fracture {
    length: Real,
    height: Real,
    width: Real,
}

impl Fracture {
    /// Create a fracture. Every dimension must be finite and strictly positive.
    pub fn new(length: Real, height: Real, width: Real) -> NetworkResult<Self> {
        for (what, value) in [("length", length), ("height", height), ("width", width)] {
            if !is_strictly_positive(value) {
                return Err(NetworkError::InvalidGeometry {
                    fracture: None,
                    what,
                    value,
                });
            }
        }
        Ok(Self {
            length,
            height,
            width,
        })
    }

    pub fn length(&self) -> Real {
        self.length
    }

    pub fn height(&self) -> Real {
        self.height
    }

    /// Aperture.
    pub fn width(&self) -> Real {
        self.width
    }

    /// Same fracture with a different aperture.
    pub fn with_width(&self, width: Real) -> NetworkResult<Self> {
        Self::new(self.length, self.height, width)
    }

    /// Geometric part of the parallel-plate (cubic law) conductance: `w³H / 12L`.
    pub fn transmissivity(&self) -> Real {
        self.width.powi(3) * self.height / (12.0 * self.length)
    }

    /// Mass flow per unit pressure drop for laminar flow between parallel plates.
    ///
    /// `ρ w³ H / (12 μ L)`
    pub fn conductance(&self, fluid: &Fluid) -> Real {
        fluid.mobility() * self.transmissivity()
    }

    /// Wetted wall area per unit length (`2H`) over hydraulic diameter (`2w`).
    pub fn exchange_factor(&self) -> Real {
        self.height / self.width
    }

    /// Heat exchanged with the walls per unit length and unit temperature
    /// difference, using a film coefficient `Nu k_f / 2w`.
    pub fn exchange_coefficient(&self, fluid: &Fluid, nusselt: Real) -> Real {
        nusselt * fluid.thermal_conductivity() * self.exchange_factor()
    }

    /// Number of transfer units along the whole fracture for a given mass flow.
    ///
    /// The outlet approaches the wall temperature as `exp(-ntu)`. Returns
    /// infinity for a non-positive flow.
    pub fn ntu(&self, fluid: &Fluid, nusselt: Real, mass_flow: Real) -> Real {
        if mass_flow <= 0.0 {
            return Real::INFINITY;
        }
        self.exchange_coefficient(fluid, nusselt) * self.length
            / (mass_flow * fluid.heat_capacity())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use dfn_core::{Tolerances, nearly_equal};
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn conductance_is_cubic_in_width(
            length in 1.0_f64..1e3,
            height in 1.0_f64..1e3,
            width in 1e-4_f64..1e-2,
            factor in 0.5_f64..4.0,
        ) {
            let fluid = Fluid::water();
            let f = Fracture::new(length, height, width).unwrap();
            let g = f.with_width(width * factor).unwrap();
            let ratio = g.conductance(&fluid) / f.conductance(&fluid);
            prop_assert!(nearly_equal(ratio, factor.powi(3), Tolerances::default()));
        }

        #[test]
        fn ntu_inverse_in_flow(
            length in 1.0_f64..1e3,
            width in 1e-4_f64..1e-2,
            flow in 1e-3_f64..1e3,
        ) {
            let fluid = Fluid::water();
            let f = Fracture::new(length, 100.0, width).unwrap();
            let a = f.ntu(&fluid, 7.54, flow);
            let b = f.ntu(&fluid, 7.54, 2.0 * flow);
            prop_assert!(nearly_equal(a, 2.0 * b, Tolerances::default()));
        }
    }
}
