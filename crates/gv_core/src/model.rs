//! Background equations for a canonical scalar field with matter and radiation.
//!
//! The state is `(phi, pi, rho_m, rho_r)` with `pi = dphi/dt`, and the
//! independent variable is the e-folding time `N = ln a`. Time derivatives are
//! converted with `d/dN = (1/H) d/dt`:
//!
//! ```text
//! dphi/dN   = pi / H
//! dpi/dN    = (-3 H pi - dV/dphi) / H
//! drho_m/dN = (-3 H rho_m) / H
//! drho_r/dN = (-4 H rho_r) / H
//! ```

use crate::error::{BackgroundError, Result};
use crate::potential::ExponentialPotential;
use crate::traits::DynamicalSystem;
use nalgebra::Vector4;
use serde::{Deserialize, Serialize};

/// Number of components in [`BackgroundState`].
pub const STATE_DIM: usize = 4;

/// Immutable parameters of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundParams {
    pub lam: f64,
    /// Potential normalization derived from the initial conditions.
    pub v0: f64,
    pub dn: f64,
    pub n_min: f64,
    /// The present epoch, where the integration starts.
    pub n_max: f64,
}

impl BackgroundParams {
    pub fn potential(&self) -> ExponentialPotential {
        ExponentialPotential::new(self.v0, self.lam)
    }
}

/// `(phi, pi, rho_m, rho_r)` at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BackgroundState(Vector4<f64>);

impl BackgroundState {
    pub fn new(phi: f64, pi: f64, rho_m: f64, rho_r: f64) -> Self {
        Self(Vector4::new(phi, pi, rho_m, rho_r))
    }

    pub fn from_slice(values: &[f64]) -> Self {
        Self(Vector4::from_column_slice(values))
    }

    pub fn phi(&self) -> f64 {
        self.0[0]
    }

    pub fn pi(&self) -> f64 {
        self.0[1]
    }

    pub fn rho_m(&self) -> f64 {
        self.0[2]
    }

    pub fn rho_r(&self) -> f64 {
        self.0[3]
    }

    pub fn as_slice(&self) -> &[f64] {
        self.0.as_slice()
    }

    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        self.0.as_mut_slice()
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.pi() * self.pi()
    }

    /// Checks the invariants every accepted sample must satisfy.
    pub fn check_physical(&self, n: f64) -> Result<()> {
        if self.0.iter().any(|v| !v.is_finite()) {
            return Err(BackgroundError::NumericalDomain {
                n,
                detail: format!("non-finite state {:?}", self.0.as_slice()),
            });
        }
        if self.rho_m() < 0.0 || self.rho_r() < 0.0 {
            return Err(BackgroundError::NumericalDomain {
                n,
                detail: format!(
                    "negative density (rho_m = {}, rho_r = {})",
                    self.rho_m(),
                    self.rho_r()
                ),
            });
        }
        Ok(())
    }
}

/// Total density `rho_m + rho_r + pi^2/2 + V(phi)`, rejected unless positive and finite.
pub fn total_density(
    n: f64,
    state: &BackgroundState,
    potential: &ExponentialPotential,
) -> Result<f64> {
    let rho_tot =
        state.rho_m() + state.rho_r() + state.kinetic_energy() + potential.value(state.phi());
    if !(rho_tot > 0.0 && rho_tot.is_finite()) {
        return Err(BackgroundError::NumericalDomain {
            n,
            detail: format!("total density {rho_tot} is not positive and finite"),
        });
    }
    Ok(rho_tot)
}

/// Hubble rate from the Friedmann constraint `H^2 = rho_tot / 3`.
pub fn hubble_rate(
    n: f64,
    state: &BackgroundState,
    potential: &ExponentialPotential,
) -> Result<f64> {
    Ok((total_density(n, state, potential)? / 3.0).sqrt())
}

/// Rate of change of the state with respect to `N`.
///
/// `H` is evaluated from `state` itself on every call.
pub fn derivative(
    n: f64,
    state: &BackgroundState,
    params: &BackgroundParams,
) -> Result<Vector4<f64>> {
    let potential = params.potential();
    let h = hubble_rate(n, state, &potential)?;
    let (phi, pi) = (state.phi(), state.pi());

    Ok(Vector4::new(
        pi / h,
        (-3.0 * h * pi - potential.slope(phi)) / h,
        (-3.0 * h * state.rho_m()) / h,
        (-4.0 * h * state.rho_r()) / h,
    ))
}

/// The background equations as a [`DynamicalSystem`] in `N`.
#[derive(Debug, Clone, Copy)]
pub struct ScalarFieldCosmology<'a> {
    params: &'a BackgroundParams,
}

impl<'a> ScalarFieldCosmology<'a> {
    pub fn new(params: &'a BackgroundParams) -> Self {
        Self { params }
    }
}

impl DynamicalSystem<f64> for ScalarFieldCosmology<'_> {
    type Error = BackgroundError;

    fn dimension(&self) -> usize {
        STATE_DIM
    }

    fn apply(&self, n: f64, y: &[f64], out: &mut [f64]) -> Result<()> {
        let rates = derivative(n, &BackgroundState::from_slice(y), self.params)?;
        out.copy_from_slice(rates.as_slice());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{derivative, hubble_rate, BackgroundParams, BackgroundState, ScalarFieldCosmology};
    use crate::error::BackgroundError;
    use crate::traits::DynamicalSystem;

    fn params(v0: f64, lam: f64) -> BackgroundParams {
        BackgroundParams {
            lam,
            v0,
            dn: 1e-3,
            n_min: -7.0,
            n_max: 0.0,
        }
    }

    #[test]
    fn hubble_rate_is_unity_for_reference_budget() {
        let p = params(2.1, 0.2);
        let state = BackgroundState::new(0.0, 0.0, 0.6, 0.3);
        let h = hubble_rate(0.0, &state, &p.potential()).expect("positive density");
        assert!((h - 1.0).abs() < 1e-12);
    }

    #[test]
    fn fluids_dilute_at_their_own_rates() {
        let p = params(1.5, 0.4);
        let state = BackgroundState::new(0.3, 0.1, 0.9, 0.2);
        let d = derivative(0.0, &state, &p).expect("defined");
        assert!((d[2] + 3.0 * 0.9).abs() < 1e-12);
        assert!((d[3] + 4.0 * 0.2).abs() < 1e-12);
    }

    #[test]
    fn field_equations_follow_klein_gordon_in_efolds() {
        let p = params(2.0, 0.5);
        let (phi, pi, rho_m, rho_r) = (0.2, -0.3, 0.7, 0.01);
        let state = BackgroundState::new(phi, pi, rho_m, rho_r);
        let v = 2.0 * (-0.5 * phi).exp();
        let h = ((rho_m + rho_r + 0.5 * pi * pi + v) / 3.0).sqrt();
        let d = derivative(0.0, &state, &p).expect("defined");
        assert!((d[0] - pi / h).abs() < 1e-12);
        assert!((d[1] - (-3.0 * h * pi + 0.5 * v) / h).abs() < 1e-12);
    }

    #[test]
    fn frozen_field_on_flat_potential_stays_frozen() {
        let p = params(2.1, 0.0);
        let state = BackgroundState::new(1.0, 0.0, 0.9, 0.0);
        let d = derivative(0.0, &state, &p).expect("defined");
        assert_eq!(d[0], 0.0);
        assert_eq!(d[1], 0.0);
    }

    #[test]
    fn negative_total_density_is_a_domain_error() {
        let p = params(0.1, 0.2);
        let state = BackgroundState::new(0.0, 0.0, -5.0, 0.0);
        let err = derivative(-1.5, &state, &p).expect_err("rho_tot < 0");
        match err {
            BackgroundError::NumericalDomain { n, detail } => {
                assert_eq!(n, -1.5);
                assert!(detail.contains("total density"));
            }
            other => panic!("expected domain error, got {other:?}"),
        }
    }

    #[test]
    fn system_apply_matches_derivative() {
        let p = params(2.1, 0.2);
        let system = ScalarFieldCosmology::new(&p);
        let y = [0.1, 0.05, 0.9, 3e-4];
        let mut out = [0.0; 4];
        system.apply(0.0, &y, &mut out).expect("defined");
        let d = derivative(0.0, &BackgroundState::from_slice(&y), &p).expect("defined");
        assert_eq!(out.as_slice(), d.as_slice());
        assert_eq!(system.dimension(), 4);
    }

    #[test]
    fn check_physical_rejects_nan_and_negative_densities() {
        assert!(BackgroundState::new(0.0, 0.0, 1.0, 0.1).check_physical(0.0).is_ok());
        assert!(BackgroundState::new(f64::NAN, 0.0, 1.0, 0.1).check_physical(0.0).is_err());
        assert!(BackgroundState::new(0.0, 0.0, 1.0, -1e-9).check_physical(0.0).is_err());
    }
}
