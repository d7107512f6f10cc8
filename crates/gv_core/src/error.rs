//! Failure conditions reported by the background solver.

use thiserror::Error;

/// Why a background run was rejected or aborted.
///
/// Every variant is fatal: the run produces no trajectory and nothing is retried.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BackgroundError {
    /// An input is non-finite or outside its allowed range.
    #[error("invalid setting `{name}` = {value}: {reason}")]
    InvalidSettings {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Matter and radiation claim the whole energy budget, leaving nothing for the field.
    #[error(
        "energy budget violated: omega_m0 + omega_r0 = {total} must be < 1 \
         (omega_m0 = {omega_m0}, omega_r0 = {omega_r0})"
    )]
    BudgetViolation {
        omega_m0: f64,
        omega_r0: f64,
        total: f64,
    },

    /// The initial field velocity carries more kinetic energy than the field sector holds.
    #[error(
        "pi0 = {pi0} too large: kinetic energy {kinetic} exceeds the scalar-field budget \
         {rho_phi0}, leaving non-positive potential energy"
    )]
    KineticOverdraft {
        pi0: f64,
        kinetic: f64,
        rho_phi0: f64,
    },

    /// The equations left their domain of definition during integration.
    #[error("numerical domain error at N = {n}: {detail}")]
    NumericalDomain { n: f64, detail: String },
}

pub type Result<T> = std::result::Result<T, BackgroundError>;
