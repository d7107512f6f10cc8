//! Present-day initial conditions from the energy budget.
//!
//! Densities are expressed in units where `8 pi G = 1` and `H0 = 1`, so the
//! Friedmann constraint `H^2 = rho / 3` fixes the total density today to
//! [`REFERENCE_DENSITY`].

use crate::error::{BackgroundError, Result};
use crate::potential::ExponentialPotential;
use serde::{Deserialize, Serialize};

/// Total density today, `rho0 = 3 H0^2` with `H0 = 1`.
pub const REFERENCE_DENSITY: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialConditions {
    pub v0: f64,
    pub rho_m0: f64,
    pub rho_r0: f64,
    pub rho_phi0: f64,
}

/// Splits [`REFERENCE_DENSITY`] between matter, radiation and the field, and
/// fixes the potential normalization so that `V(phi0) = rho_phi0 - pi0^2 / 2`.
pub fn solve_initial_conditions(
    omega_m0: f64,
    omega_r0: f64,
    phi0: f64,
    pi0: f64,
    lam: f64,
) -> Result<InitialConditions> {
    let rho_m0 = omega_m0 * REFERENCE_DENSITY;
    let rho_r0 = omega_r0 * REFERENCE_DENSITY;
    let rho_phi0 = REFERENCE_DENSITY - rho_m0 - rho_r0;
    if omega_m0 + omega_r0 >= 1.0 || rho_phi0 <= 0.0 {
        return Err(BackgroundError::BudgetViolation {
            omega_m0,
            omega_r0,
            total: omega_m0 + omega_r0,
        });
    }

    let kinetic = 0.5 * pi0 * pi0;
    let potential_needed = rho_phi0 - kinetic;
    if potential_needed <= 0.0 {
        return Err(BackgroundError::KineticOverdraft {
            pi0,
            kinetic,
            rho_phi0,
        });
    }

    Ok(InitialConditions {
        v0: ExponentialPotential::normalization_for(potential_needed, phi0, lam),
        rho_m0,
        rho_r0,
        rho_phi0,
    })
}

#[cfg(test)]
mod tests {
    use super::{solve_initial_conditions, REFERENCE_DENSITY};
    use crate::error::BackgroundError;
    use crate::potential::potential;

    #[test]
    fn splits_reference_density() {
        let ic = solve_initial_conditions(0.3, 9e-5, 0.0, 0.0, 0.2).expect("valid budget");
        assert!((ic.rho_m0 - 0.9).abs() < 1e-12);
        assert!((ic.rho_r0 - 2.7e-4).abs() < 1e-12);
        assert!((ic.rho_m0 + ic.rho_r0 + ic.rho_phi0 - REFERENCE_DENSITY).abs() < 1e-12);
        // pi0 = 0, phi0 = 0: the field is pure potential and V0 carries all of it.
        assert!((ic.v0 - ic.rho_phi0).abs() < 1e-12);
    }

    #[test]
    fn normalization_matches_potential_energy_at_phi0() {
        let (phi0, pi0, lam) = (1.7, 0.4, 0.6);
        let ic = solve_initial_conditions(0.25, 1e-4, phi0, pi0, lam).expect("valid budget");
        let v = potential(phi0, ic.v0, lam);
        assert!((v - (ic.rho_phi0 - 0.5 * pi0 * pi0)).abs() < 1e-12);
    }

    #[test]
    fn rejects_over_budget_fractions() {
        let err = solve_initial_conditions(0.9, 0.2, 0.0, 0.0, 0.2).expect_err("over budget");
        assert!(matches!(err, BackgroundError::BudgetViolation { .. }));
        assert!(err.to_string().contains("energy budget"));
    }

    #[test]
    fn rejects_exactly_saturated_budget() {
        let err = solve_initial_conditions(1.0, 0.0, 0.0, 0.0, 0.2).expect_err("no room for field");
        assert!(matches!(err, BackgroundError::BudgetViolation { .. }));
    }

    #[test]
    fn kinetic_energy_equal_to_field_budget_is_an_overdraft() {
        // rho_m0 = 1, rho_r0 = 0, rho_phi0 = 2 = 0.5 * 2^2: zero potential energy left.
        let err = solve_initial_conditions(1.0 / 3.0, 0.0, 0.0, 2.0, 0.2).expect_err("no potential");
        match err {
            BackgroundError::KineticOverdraft {
                kinetic, rho_phi0, ..
            } => assert_eq!(kinetic, rho_phi0),
            other => panic!("expected kinetic overdraft, got {other:?}"),
        }
    }

    #[test]
    fn rejects_kinetic_overdraft() {
        // rho_phi0 = 3 * (1 - 0.3 - 9e-5) ~ 2.0997 < 0.5 * 3^2.
        let err = solve_initial_conditions(0.3, 9e-5, 0.0, 3.0, 0.2).expect_err("too fast");
        match err {
            BackgroundError::KineticOverdraft {
                pi0,
                kinetic,
                rho_phi0,
            } => {
                assert_eq!(pi0, 3.0);
                assert_eq!(kinetic, 4.5);
                assert!(kinetic > rho_phi0);
            }
            other => panic!("expected kinetic overdraft, got {other:?}"),
        }
    }

    #[test]
    fn negative_velocity_is_checked_by_magnitude() {
        let err = solve_initial_conditions(0.3, 9e-5, 0.0, -3.0, 0.2).expect_err("too fast");
        assert!(matches!(err, BackgroundError::KineticOverdraft { .. }));
    }
}
