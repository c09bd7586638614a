//! The cumulative-loss objective for offline policy tuning.
//!
//! Drives the chosen dynamics forward under a policy and sums the loss at
//! every step. With [`Dynamics::Simulated`] this scores the policy on the
//! true system; with [`Dynamics::Learned`] it scores on the fitted model —
//! the model-predictive variant, useful when touching the true system is
//! expensive.

use cartpole_sim::{loss, State, StateAction, DEFAULT_LOSS_SCALE};

use crate::dynamics::Dynamics;
use crate::policy::Policy;

/// Per-step loss scale coefficients across a horizon.
///
/// A linear schedule starts wide and tightens (or the reverse), which lets
/// early steps tolerate large deviations while later steps demand precision.
#[derive(Debug, Clone, Copy)]
pub enum ScaleSchedule {
    /// The same scale at every step.
    Constant([f64; 4]),
    /// Componentwise linear interpolation from `start` at the first step
    /// to `end` at the last.
    Linear { start: [f64; 4], end: [f64; 4] },
}

impl ScaleSchedule {
    /// The scale used at `step` of a `total`-step horizon.
    pub fn at(&self, step: usize, total: usize) -> [f64; 4] {
        match self {
            ScaleSchedule::Constant(scale) => *scale,
            ScaleSchedule::Linear { start, end } => {
                let t = if total <= 1 {
                    0.0
                } else {
                    step as f64 / (total - 1) as f64
                };
                let mut scale = [0.0; 4];
                for i in 0..4 {
                    scale[i] = start[i] + t * (end[i] - start[i]);
                }
                scale
            }
        }
    }
}

impl Default for ScaleSchedule {
    fn default() -> Self {
        ScaleSchedule::Constant(DEFAULT_LOSS_SCALE)
    }
}

/// Cumulative loss of driving `dynamics` under `policy` for `steps` steps.
///
/// The starting angle is remapped once up front and after every step, so
/// the loss always sees the principal-interval angle.
pub fn loss_after_steps<P: Policy + ?Sized>(
    dynamics: &Dynamics<'_>,
    policy: &P,
    start: State,
    steps: usize,
    schedule: &ScaleSchedule,
) -> f64 {
    let mut state = start.remapped();
    let mut cumulative = 0.0;

    for step in 0..steps {
        let action = policy.act(&state);
        let next = dynamics.advance(&StateAction::new(state, action));
        state = next.state.remapped();
        cumulative += loss(&state, &schedule.at(step, steps));
    }

    cumulative
}
