//! Multi-step rollouts and model-vs-simulator comparison.
//!
//! A rollout is a lazy, finite sequence of `steps + 1` state-action pairs
//! beginning with the initial pair. Every call to [`rollout()`] builds a
//! fresh iterator, so restarting is just calling again.
//!
//! For [`Dynamics::Learned`] the `compound` flag decides what each
//! prediction is anchored to:
//!
//! - `compound = false`: every prediction starts from the ground-truth
//!   state an internal simulator tracks alongside — this measures
//!   single-step accuracy;
//! - `compound = true`: predictions chain from prior predictions — this
//!   measures how model error compounds over the horizon.

use std::fmt;

use cartpole_model::KernelModel;
use cartpole_sim::{CartPole, StateAction};

use crate::dynamics::Dynamics;

/// Rollout horizon and flags.
#[derive(Debug, Clone, Copy)]
pub struct RolloutConfig {
    /// Number of steps to take; the produced sequence has `steps + 1`
    /// entries including the initial pair.
    pub steps: usize,
    /// Chain model predictions instead of anchoring them to ground truth.
    /// Ignored for simulated dynamics.
    pub compound: bool,
    /// Fold the pole angle onto [-π, π] after every step.
    pub remap_angle: bool,
}

impl RolloutConfig {
    /// A plain rollout of the given horizon.
    pub fn new(steps: usize) -> Self {
        Self {
            steps,
            compound: false,
            remap_angle: false,
        }
    }

    /// Chain predictions from prior predictions.
    pub fn compound(mut self) -> Self {
        self.compound = true;
        self
    }

    /// Remap the pole angle after every step.
    pub fn remap_angle(mut self) -> Self {
        self.remap_angle = true;
        self
    }
}

/// A lazy rollout; see [`rollout()`].
#[derive(Debug, Clone)]
pub struct Rollout<'a> {
    dynamics: Dynamics<'a>,
    truth: CartPole,
    config: RolloutConfig,
    current: StateAction,
    yielded_start: bool,
    remaining: usize,
}

/// Start a fresh rollout from `start`.
///
/// For learned dynamics without `compound`, predictions are anchored to a
/// ground-truth simulator with default constants; use
/// [`Rollout::with_reference`] to anchor to a differently configured one.
pub fn rollout<'a>(dynamics: Dynamics<'a>, start: StateAction, config: RolloutConfig) -> Rollout<'a> {
    let mut truth = CartPole::new();
    truth.set_state(start.state);
    Rollout {
        dynamics,
        truth,
        config,
        current: start,
        yielded_start: false,
        remaining: config.steps,
    }
}

impl Rollout<'_> {
    /// Use `template`'s constants for the ground-truth anchor.
    pub fn with_reference(mut self, template: &CartPole) -> Self {
        let state = self.current.state;
        self.truth = template.clone();
        self.truth.set_state(state);
        self
    }
}

impl Iterator for Rollout<'_> {
    type Item = StateAction;

    fn next(&mut self) -> Option<StateAction> {
        if !self.yielded_start {
            self.yielded_start = true;
            return Some(self.current);
        }
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let mut next = match (&self.dynamics, self.config.compound) {
            // The simulator is its own ground truth, and compounding is
            // what integration means; both arms advance from the last pair.
            (Dynamics::Simulated(_), _) | (Dynamics::Learned(_), true) => {
                self.dynamics.advance(&self.current)
            }
            (Dynamics::Learned(_), false) => {
                let anchor = StateAction::new(self.truth.state(), self.current.action);
                let predicted = self.dynamics.advance(&anchor);
                self.truth.apply_action(self.current.action);
                if self.config.remap_angle {
                    self.truth.remap_angle();
                }
                predicted
            }
        };
        if self.config.remap_angle {
            next = next.remapped();
        }

        self.current = next;
        Some(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.remaining + usize::from(!self.yielded_start);
        (len, Some(len))
    }
}

impl ExactSizeIterator for Rollout<'_> {}

/// A true trajectory next to its model-predicted counterpart.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Ground-truth trajectory from the simulator.
    pub actual: Vec<StateAction>,
    /// Model-predicted trajectory from the same start.
    pub predicted: Vec<StateAction>,
    /// Whether predictions were chained.
    pub compound: bool,
}

impl Comparison {
    /// Per-dimension root-mean-square error over the paired states.
    pub fn rmse(&self) -> [f64; 4] {
        let n = self.actual.len() as f64;
        let mut out = [0.0; 4];
        for (truth, guess) in self.actual.iter().zip(self.predicted.iter()) {
            let t = truth.state.to_array();
            let g = guess.state.to_array();
            for d in 0..4 {
                out[d] += (g[d] - t[d]).powi(2);
            }
        }
        for value in out.iter_mut() {
            *value = (*value / n).sqrt();
        }
        out
    }

    /// Number of paired entries (steps + 1).
    pub fn len(&self) -> usize {
        self.actual.len()
    }

    /// True only for a degenerate comparison with no entries.
    pub fn is_empty(&self) -> bool {
        self.actual.is_empty()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.rmse();
        writeln!(
            f,
            "Model vs simulator over {} steps ({}):",
            self.len().saturating_sub(1),
            if self.compound {
                "compounded predictions"
            } else {
                "single-step predictions"
            }
        )?;
        writeln!(f, "  RMSE cart location:  {:.6}", errors[0])?;
        writeln!(f, "  RMSE cart velocity:  {:.6}", errors[1])?;
        writeln!(f, "  RMSE pole angle:     {:.6}", errors[2])?;
        writeln!(f, "  RMSE pole velocity:  {:.6}", errors[3])
    }
}

/// Run the simulator and the model forward from the same start and pair up
/// the trajectories.
pub fn compare(
    model: &KernelModel,
    sim: &CartPole,
    start: StateAction,
    config: RolloutConfig,
) -> Comparison {
    let actual: Vec<StateAction> = rollout(Dynamics::Simulated(sim), start, config).collect();
    let predicted: Vec<StateAction> = rollout(Dynamics::Learned(model), start, config)
        .with_reference(sim)
        .collect();
    Comparison {
        actual,
        predicted,
        compound: config.compound,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartpole_sim::State;
    use std::f64::consts::PI;

    #[test]
    fn test_zero_steps_yields_initial_pair_only() {
        let sim = CartPole::new();
        let start = State::new(0.0, 0.0, 3.0, 0.0).with_action(2.0);
        let items: Vec<_> =
            rollout(Dynamics::Simulated(&sim), start, RolloutConfig::new(0)).collect();
        assert_eq!(items, vec![start]);
    }

    #[test]
    fn test_rollout_length_is_steps_plus_one() {
        let sim = CartPole::new();
        let start = State::new(0.0, 0.0, 1.0, 0.0).with_action(0.0);
        let items: Vec<_> =
            rollout(Dynamics::Simulated(&sim), start, RolloutConfig::new(7)).collect();
        assert_eq!(items.len(), 8);
        assert_eq!(items[0], start);
    }

    #[test]
    fn test_rollout_is_restartable() {
        let sim = CartPole::new();
        let start = State::new(0.0, 0.0, 2.0, 0.0).with_action(-1.0);
        let config = RolloutConfig::new(4);
        let first: Vec<_> = rollout(Dynamics::Simulated(&sim), start, config).collect();
        let second: Vec<_> = rollout(Dynamics::Simulated(&sim), start, config).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_size_hint_is_exact() {
        let sim = CartPole::new();
        let start = State::new(0.0, 0.0, 1.0, 0.0).with_action(0.0);
        let mut items = rollout(Dynamics::Simulated(&sim), start, RolloutConfig::new(3));
        assert_eq!(items.len(), 4);
        items.next();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_remap_keeps_angle_in_range() {
        // A free-spinning start winds the angle far past π without
        // remapping; with it, every yielded angle stays in range.
        let sim = CartPole::new();
        let start = State::new(0.0, 0.0, 0.5, 12.0).with_action(0.0);
        let config = RolloutConfig::new(20).remap_angle();
        for pair in rollout(Dynamics::Simulated(&sim), start, config) {
            assert!(pair.state.pole_angle.abs() <= PI + 1e-12);
        }
    }

    #[test]
    fn test_action_is_carried_unchanged() {
        let sim = CartPole::new();
        let start = State::new(0.0, 0.0, 2.5, 0.0).with_action(4.5);
        for pair in rollout(Dynamics::Simulated(&sim), start, RolloutConfig::new(5)) {
            assert_eq!(pair.action, 4.5);
        }
    }
}
