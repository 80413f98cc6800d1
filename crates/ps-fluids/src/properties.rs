//! Scalar liquid propellant properties.

use crate::error::{FluidError, FluidResult};
use ps_core::ensure_positive;
use ps_core::units::{Density, Temperature, k, kg_per_m3};
use serde::{Deserialize, Serialize};

/// Property set for one propellant.
///
/// Values are stored in SI base units; the typed accessors wrap them in `uom`
/// quantities where `ps-core` has an alias for the dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FluidProperties {
    pub name: String,
    /// Enthalpy of vaporization, J/kg
    pub h_fg_j_per_kg: f64,
    /// Saturation (boiling) temperature at 1 atm, K
    pub t_sat_k: f64,
    /// Liquid density, kg/m³
    pub rho_liquid_kg_m3: f64,
    /// Liquid specific heat, J/(kg·K)
    pub c_liquid_j_per_kg_k: f64,
    /// Vapour specific heat at constant pressure, J/(kg·K)
    pub cp_j_per_kg_k: f64,
}

impl FluidProperties {
    pub fn new(
        name: impl Into<String>,
        h_fg_j_per_kg: f64,
        t_sat_k: f64,
        rho_liquid_kg_m3: f64,
        c_liquid_j_per_kg_k: f64,
        cp_j_per_kg_k: f64,
    ) -> FluidResult<Self> {
        let props = Self {
            name: name.into(),
            h_fg_j_per_kg,
            t_sat_k,
            rho_liquid_kg_m3,
            c_liquid_j_per_kg_k,
            cp_j_per_kg_k,
        };
        props.validate()?;
        Ok(props)
    }

    /// Reject non-finite or non-positive entries.
    pub fn validate(&self) -> FluidResult<()> {
        let checks: [(&'static str, f64); 5] = [
            ("enthalpy of vaporization", self.h_fg_j_per_kg),
            ("saturation temperature", self.t_sat_k),
            ("liquid density", self.rho_liquid_kg_m3),
            ("liquid specific heat", self.c_liquid_j_per_kg_k),
            ("specific heat", self.cp_j_per_kg_k),
        ];
        for (what, value) in checks {
            if ensure_positive(value, what).is_err() {
                return Err(FluidError::NonPhysical {
                    fluid: self.name.clone(),
                    what,
                    value,
                });
            }
        }
        Ok(())
    }

    pub fn liquid_density(&self) -> Density {
        kg_per_m3(self.rho_liquid_kg_m3)
    }

    pub fn saturation_temperature(&self) -> Temperature {
        k(self.t_sat_k)
    }

    /// Heat needed to take one kilogram of liquid from `t_initial_k` to vapour, J/kg.
    pub fn heat_to_vaporize(&self, t_initial_k: f64) -> f64 {
        self.c_liquid_j_per_kg_k * (self.t_sat_k - t_initial_k).max(0.0) + self.h_fg_j_per_kg
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn any_non_positive_entry_is_rejected(field in 0usize..5, bad in -1e6f64..=0.0) {
            let mut values = [2.257e6, 373.15, 997.0, 4181.0, 2010.0];
            values[field] = bad;
            let [h, t, rho, cl, cp] = values;
            let err = FluidProperties::new("test_fluid", h, t, rho, cl, cp).unwrap_err();
            let is_non_physical = matches!(err, FluidError::NonPhysical { .. });
            prop_assert!(is_non_physical);
        }

        #[test]
        fn heat_to_vaporize_never_below_latent_heat(t0 in 200.0f64..500.0) {
            let water = FluidProperties::new("water", 2.257e6, 373.15, 997.0, 4181.0, 2010.0)
                .unwrap();
            prop_assert!(water.heat_to_vaporize(t0) >= 2.257e6 - 1e-6);
        }
    }
}
