use crate::error::{BackgroundError, Result};
use serde::{Deserialize, Serialize};

/// Inputs of a background run.
///
/// Missing fields deserialize to the defaults, so a partial record such as
/// `{ "lam": 0.5 }` is a valid configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackgroundSettings {
    /// Steepness of the exponential potential.
    pub lam: f64,
    /// Field value today.
    pub phi0: f64,
    /// Field velocity `dphi/dt` today.
    pub pi0: f64,
    /// Matter fraction today.
    pub omega_m0: f64,
    /// Radiation fraction today.
    pub omega_r0: f64,
    /// Earliest `N = ln a` reached by the backward integration.
    pub n_min: f64,
    /// Step magnitude in `N`.
    pub dn: f64,
}

impl Default for BackgroundSettings {
    fn default() -> Self {
        Self {
            lam: 0.2,
            phi0: 0.0,
            pi0: 0.0,
            omega_m0: 0.3,
            omega_r0: 9e-5,
            n_min: -7.0,
            dn: 1e-3,
        }
    }
}

impl BackgroundSettings {
    /// Checks ranges that do not depend on the energy budget.
    ///
    /// The upper bound on the fractions (`omega_m0 + omega_r0 < 1`) and the
    /// kinetic-energy bound are checked by
    /// [`crate::initial::solve_initial_conditions`].
    pub fn validate(&self) -> Result<()> {
        let finite = [
            ("lam", self.lam),
            ("phi0", self.phi0),
            ("pi0", self.pi0),
            ("omega_m0", self.omega_m0),
            ("omega_r0", self.omega_r0),
            ("n_min", self.n_min),
            ("dn", self.dn),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(invalid(name, value, "must be finite"));
            }
        }

        if self.omega_m0 < 0.0 {
            return Err(invalid("omega_m0", self.omega_m0, "must be non-negative"));
        }
        if self.omega_r0 < 0.0 {
            return Err(invalid("omega_r0", self.omega_r0, "must be non-negative"));
        }
        if self.n_min >= 0.0 {
            return Err(invalid("n_min", self.n_min, "must be negative"));
        }
        if self.dn <= 0.0 {
            return Err(invalid("dn", self.dn, "must be positive"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, value: f64, reason: &'static str) -> BackgroundError {
    BackgroundError::InvalidSettings {
        name,
        value,
        reason,
    }
}
