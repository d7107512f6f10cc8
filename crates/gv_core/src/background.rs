//! Backward integration of the background from today to `N_min`.
//!
//! A run moves through [`RunPhase`]s in order. Initial conditions are fixed at
//! `N = 0`, the state is stepped backward with RK4, and the history is then
//! reversed once so the returned [`Trajectory`] runs from the earliest sample
//! to today.

use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::initial::solve_initial_conditions;
use crate::model::{BackgroundParams, BackgroundState, ScalarFieldCosmology, STATE_DIM};
use crate::settings::BackgroundSettings;
use crate::solvers::RK4;
use crate::traits::Steppable;
use serde::Serialize;
use tracing::{debug, info, warn};

/// `N = ln a` of the present epoch.
pub const PRESENT_EPOCH: f64 = 0.0;

/// Redshifts reported by [`Trajectory::sample_points`] summaries.
pub const SUMMARY_REDSHIFTS: [f64; 6] = [0.0, 0.5, 1.0, 2.0, 5.0, 10.0];

/// Rounding allowance, in units of `|N_min|` ulps, when testing a grid point
/// against the lower bound. Only absorbs the error of `k * h`.
const BOUND_ULPS: f64 = 4.0;

/// Upper limit on the history buffer reserved before stepping.
const MAX_RESERVED_SAMPLES: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunPhase {
    NotStarted,
    Initializing,
    Stepping,
    Finalizing,
    Done,
    Error,
}

/// One accepted sample of the background.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrajectorySample {
    /// `N = ln a`.
    pub n: f64,
    /// Redshift `exp(-N) - 1`.
    pub z: f64,
    pub state: BackgroundState,
    pub diagnostics: Diagnostics,
}

impl TrajectorySample {
    pub fn phi(&self) -> f64 {
        self.state.phi()
    }

    pub fn pi(&self) -> f64 {
        self.state.pi()
    }

    pub fn w(&self) -> f64 {
        self.diagnostics.w
    }

    pub fn hubble(&self) -> f64 {
        self.diagnostics.hubble
    }

    pub fn omega_phi(&self) -> f64 {
        self.diagnostics.omega_phi
    }

    pub fn omega_m(&self) -> f64 {
        self.diagnostics.omega_m
    }

    pub fn omega_r(&self) -> f64 {
        self.diagnostics.omega_r
    }
}

/// The finished background, ordered by increasing `N` (decreasing `z`).
///
/// Only read access is exposed once a run hands it out.
#[derive(Debug, Clone, Serialize)]
pub struct Trajectory {
    params: BackgroundParams,
    samples: Vec<TrajectorySample>,
}

impl Trajectory {
    /// Parameters of the run, including the derived `V0`.
    pub fn params(&self) -> &BackgroundParams {
        &self.params
    }

    pub fn samples(&self) -> &[TrajectorySample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Sample at `N_min`.
    pub fn earliest(&self) -> Option<&TrajectorySample> {
        self.samples.first()
    }

    /// Sample at `N = 0`.
    pub fn present(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }

    /// The sample whose redshift is closest to `z`. Ties go to the earlier sample.
    pub fn nearest_to_redshift(&self, z: f64) -> Option<&TrajectorySample> {
        self.samples
            .iter()
            .min_by(|a, b| (a.z - z).abs().total_cmp(&(b.z - z).abs()))
    }

    /// Nearest samples for each target redshift, in the order given.
    pub fn sample_points(&self, redshifts: &[f64]) -> Vec<&TrajectorySample> {
        redshifts
            .iter()
            .filter_map(|&z| self.nearest_to_redshift(z))
            .collect()
    }

    pub fn n_values(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.n).collect()
    }

    pub fn redshifts(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.z).collect()
    }

    pub fn w_values(&self) -> Vec<f64> {
        self.samples.iter().map(TrajectorySample::w).collect()
    }

    pub fn hubble_values(&self) -> Vec<f64> {
        self.samples.iter().map(TrajectorySample::hubble).collect()
    }
}

/// Redshift of the e-folding time `n`.
pub fn redshift(n: f64) -> f64 {
    (-n).exp() - 1.0
}

/// Runs the background for `settings`.
pub fn solve_background(settings: &BackgroundSettings) -> Result<Trajectory> {
    BackgroundRun::new(*settings).run()
}

/// Drives a single background run through its phases.
#[derive(Debug, Clone)]
pub struct BackgroundRun {
    settings: BackgroundSettings,
    phase: RunPhase,
}

impl BackgroundRun {
    pub fn new(settings: BackgroundSettings) -> Self {
        Self {
            settings,
            phase: RunPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Integrates from scratch. Leaves the run in [`RunPhase::Done`] or [`RunPhase::Error`].
    pub fn run(&mut self) -> Result<Trajectory> {
        self.phase = RunPhase::NotStarted;
        match self.execute() {
            Ok(trajectory) => {
                self.transition(RunPhase::Done);
                if let Some(today) = trajectory.present() {
                    info!(
                        samples = trajectory.len(),
                        w0 = today.w(),
                        omega_phi0 = today.omega_phi(),
                        "background run complete"
                    );
                }
                Ok(trajectory)
            }
            Err(err) => {
                warn!(phase = ?self.phase, %err, "background run aborted");
                self.transition(RunPhase::Error);
                Err(err)
            }
        }
    }

    fn execute(&mut self) -> Result<Trajectory> {
        self.transition(RunPhase::Initializing);
        let (params, initial_state) = self.initialize()?;

        self.transition(RunPhase::Stepping);
        let history = self.integrate(&params, initial_state)?;

        self.transition(RunPhase::Finalizing);
        Ok(finalize(params, history))
    }

    fn transition(&mut self, next: RunPhase) {
        debug!(from = ?self.phase, to = ?next, "background run phase");
        self.phase = next;
    }

    fn initialize(&self) -> Result<(BackgroundParams, BackgroundState)> {
        let s = &self.settings;
        s.validate()?;
        let ic = solve_initial_conditions(s.omega_m0, s.omega_r0, s.phi0, s.pi0, s.lam)?;
        debug!(
            v0 = ic.v0,
            lam = s.lam,
            rho_phi0 = ic.rho_phi0,
            "normalized potential to the present-day field energy"
        );

        let params = BackgroundParams {
            lam: s.lam,
            v0: ic.v0,
            dn: s.dn,
            n_min: s.n_min,
            n_max: PRESENT_EPOCH,
        };
        let state = BackgroundState::new(s.phi0, s.pi0, ic.rho_m0, ic.rho_r0);
        Ok((params, state))
    }

    /// Steps backward from `n_max`, sampling the initial state and every accepted step.
    /// The returned history is ordered by decreasing `N`.
    fn integrate(
        &self,
        params: &BackgroundParams,
        initial_state: BackgroundState,
    ) -> Result<Vec<(f64, BackgroundState, Diagnostics)>> {
        let h = -params.dn.abs();
        let lower_bound = params.n_min - BOUND_ULPS * f64::EPSILON * params.n_min.abs();
        // Float-to-int casts saturate, so this is safe for any finite span.
        let expected = ((params.n_max - params.n_min).abs() / params.dn.abs()) as usize;

        let system = ScalarFieldCosmology::new(params);
        let mut solver = RK4::new(STATE_DIM);

        let mut n = params.n_max;
        let mut state = initial_state;
        let mut history = Vec::with_capacity(expected.min(MAX_RESERVED_SAMPLES) + 1);
        history.push((n, state, Diagnostics::record(n, &state, params)?));

        for k in 1u64.. {
            // Grid point from the step index so N does not drift over many steps.
            let next_n = params.n_max + k as f64 * h;
            if next_n < lower_bound {
                break;
            }
            solver.step(&system, &mut n, state.as_mut_slice(), h)?;
            n = next_n;

            state.check_physical(n)?;
            history.push((n, state, Diagnostics::record(n, &state, params)?));
        }

        debug!(steps = history.len() - 1, n_end = n, "backward integration finished");
        Ok(history)
    }
}

/// Flips the backward history to increasing `N` and attaches redshifts.
fn finalize(
    params: BackgroundParams,
    mut history: Vec<(f64, BackgroundState, Diagnostics)>,
) -> Trajectory {
    history.reverse();
    let samples = history
        .into_iter()
        .map(|(n, state, diagnostics)| TrajectorySample {
            n,
            z: redshift(n),
            state,
            diagnostics,
        })
        .collect();
    Trajectory { params, samples }
}
