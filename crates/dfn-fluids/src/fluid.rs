//! Constant-property fluid.

use crate::error::{FluidError, FluidResult};
use dfn_core::{Real, is_strictly_positive};

/// Fluid flowing through the fracture network.
///
/// Properties are constant over the network. Units are the caller's choice
/// but must be mutually consistent with the fracture geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fluid {
    density: Real,
    viscosity: Real,
    heat_capacity: Real,
    thermal_conductivity: Real,
}

impl Fluid {
    /// Create a fluid; every property must be finite and strictly positive.
    pub fn new(
        density: Real,
        viscosity: Real,
        heat_capacity: Real,
        thermal_conductivity: Real,
    ) -> FluidResult<Self> {
        for (what, value) in [
            ("density", density),
            ("viscosity", viscosity),
            ("heat capacity", heat_capacity),
            ("thermal conductivity", thermal_conductivity),
        ] {
            if !is_strictly_positive(value) {
                return Err(FluidError::NonPhysical { what, value });
            }
        }
        Ok(Self {
            density,
            viscosity,
            heat_capacity,
            thermal_conductivity,
        })
    }

    /// Liquid water near reservoir conditions, SI units.
    pub fn water() -> Self {
        Self {
            density: 1000.0,
            viscosity: 1e-3,
            heat_capacity: 4300.0,
            thermal_conductivity: 0.6,
        }
    }

    pub fn density(&self) -> Real {
        self.density
    }

    /// Dynamic viscosity.
    pub fn viscosity(&self) -> Real {
        self.viscosity
    }

    /// Specific heat capacity.
    pub fn heat_capacity(&self) -> Real {
        self.heat_capacity
    }

    pub fn thermal_conductivity(&self) -> Real {
        self.thermal_conductivity
    }

    /// Ratio ρ/μ that turns a geometric transmissivity into a mass-flow conductance.
    pub fn mobility(&self) -> Real {
        self.density / self.viscosity
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn positive_properties_always_accepted(
            rho in 1e-3_f64..1e4,
            mu in 1e-6_f64..1e2,
            cp in 1e-1_f64..1e5,
            k in 1e-3_f64..1e2,
        ) {
            let fluid = Fluid::new(rho, mu, cp, k).unwrap();
            prop_assert!(fluid.mobility() > 0.0);
        }
    }
}
