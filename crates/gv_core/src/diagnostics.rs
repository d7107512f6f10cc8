use crate::error::Result;
use crate::model::{total_density, BackgroundParams, BackgroundState};
use serde::{Deserialize, Serialize};

/// Derived quantities at one sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    pub rho_phi: f64,
    pub p_phi: f64,
    /// Equation of state `p_phi / rho_phi`.
    pub w: f64,
    pub rho_tot: f64,
    /// Hubble rate in units of `H0`.
    pub hubble: f64,
    pub omega_phi: f64,
    pub omega_m: f64,
    pub omega_r: f64,
}

impl Diagnostics {
    /// Reads the derived quantities off `state`.
    pub fn record(n: f64, state: &BackgroundState, params: &BackgroundParams) -> Result<Self> {
        let potential = params.potential();
        let v = potential.value(state.phi());
        let kinetic = state.kinetic_energy();
        let rho_phi = kinetic + v;
        let p_phi = kinetic - v;
        let rho_tot = total_density(n, state, &potential)?;

        Ok(Self {
            rho_phi,
            p_phi,
            w: p_phi / rho_phi,
            rho_tot,
            hubble: (rho_tot / 3.0).sqrt(),
            omega_phi: rho_phi / rho_tot,
            omega_m: state.rho_m() / rho_tot,
            omega_r: state.rho_r() / rho_tot,
        })
    }

    pub fn omega_sum(&self) -> f64 {
        self.omega_phi + self.omega_m + self.omega_r
    }
}
