//! Exponential scalar potential `V(phi) = V0 * exp(-lam * phi)`.

use serde::{Deserialize, Serialize};

/// Evaluates `V0 * exp(-lam * phi)`.
pub fn potential(phi: f64, v0: f64, lam: f64) -> f64 {
    v0 * (-lam * phi).exp()
}

/// Evaluates `dV/dphi = -lam * V(phi)`.
pub fn potential_slope(phi: f64, v0: f64, lam: f64) -> f64 {
    -lam * potential(phi, v0, lam)
}

/// Shape parameters of the exponential potential.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialPotential {
    /// Normalization, fixed by the initial conditions.
    pub v0: f64,
    /// Self-coupling controlling the steepness.
    pub lam: f64,
}

impl ExponentialPotential {
    pub fn new(v0: f64, lam: f64) -> Self {
        Self { v0, lam }
    }

    pub fn value(&self, phi: f64) -> f64 {
        potential(phi, self.v0, self.lam)
    }

    pub fn slope(&self, phi: f64) -> f64 {
        potential_slope(phi, self.v0, self.lam)
    }

    /// Normalization that makes `V(phi) == target` for the given coupling.
    pub fn normalization_for(target: f64, phi: f64, lam: f64) -> f64 {
        target * (lam * phi).exp()
    }
}
