//! Choosing what advances the state: true physics or the fitted model.
//!
//! Rollouts and objectives are written once against [`Dynamics::advance`];
//! which transition function runs underneath is the caller's pick. The
//! variant set is closed on purpose — there are exactly two ways to advance
//! a cart-pole state here, and the match below is the whole dispatch.

use cartpole_model::KernelModel;
use cartpole_sim::{CartPole, State, StateAction};

/// The transition function driving a rollout.
#[derive(Debug, Clone)]
pub enum Dynamics<'a> {
    /// Integrate the true equations of motion. Constants come from the
    /// referenced simulator; its own state is never touched.
    Simulated(&'a CartPole),
    /// Add the fitted model's predicted state delta.
    Learned(&'a KernelModel),
}

impl Dynamics<'_> {
    /// Advance one visible step: `(state, action) → (state', action)`.
    ///
    /// The action rides along unchanged; choosing a new action each step is
    /// the policy layer's job.
    pub fn advance(&self, input: &StateAction) -> StateAction {
        match self {
            Dynamics::Simulated(template) => {
                let mut cp = (*template).clone();
                cp.set_state(input.state);
                cp.apply_action(input.action);
                StateAction::new(cp.state(), input.action)
            }
            Dynamics::Learned(model) => {
                let delta = model.predict(&input.to_array());
                let s = input.state.to_array();
                let next = State::from_array([
                    s[0] + delta[0],
                    s[1] + delta[1],
                    s[2] + delta[2],
                    s[3] + delta[3],
                ]);
                StateAction::new(next, input.action)
            }
        }
    }
}
