pub mod background;
pub mod diagnostics;
pub mod error;
pub mod initial;
pub mod model;
pub mod potential;
pub mod settings;
pub mod solvers;
/// The `gv_core` crate integrates the background of the GV toy dark-energy model:
/// a canonical scalar field in an exponential potential alongside matter and
/// radiation, stepped in e-folding time `N = ln a`.
///
/// Key components:
/// - **Traits**: `Scalar`, `DynamicalSystem` (ODE right-hand sides), `Steppable` (solvers).
/// - **Solvers**: fixed-step classical RK4.
/// - **Model**: potential, initial conditions and the background equations.
/// - **Background**: the backward integration run and its `Trajectory`.
pub mod traits;

pub use background::{solve_background, BackgroundRun, RunPhase, Trajectory, TrajectorySample};
pub use error::BackgroundError;
pub use settings::BackgroundSettings;
