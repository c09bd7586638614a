//! The cart-pole physics engine.
//!
//! A cart of mass `cart_mass` runs on a frictive track; a pole of mass
//! `pole_mass` and length `2 · pole_length` is hinged to it. The commanded
//! force is saturated through a tanh, then the equations of motion are
//! integrated with `sim_steps` semi-implicit Euler substeps spanning
//! `delta_time` seconds.
//!
//! The integration order — velocities before positions — matters: the
//! semi-implicit scheme is symplectic, so the unforced pendulum's energy
//! stays bounded over long horizons where forward Euler spirals outward.
//!
//! Sign check: with zero force from a non-equilibrium start the pole must
//! begin falling within a few steps. An integrator with the gravity sign
//! inverted also falls eventually (round-off oscillations grow), but only
//! after tens or hundreds of steps — that slow fall is the symptom to watch
//! for when touching these equations.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::angle::remap_angle;
use crate::state::State;

/// Cart-pole dynamics with owned state and physical constants.
///
/// Constants are public and builder-adjustable; the state is reached
/// through [`state()`](Self::state) / [`set_state()`](Self::set_state).
///
/// # Example
///
/// ```rust
/// use cartpole_sim::{CartPole, State};
///
/// let mut cp = CartPole::new().with_timing(0.1, 100);
/// cp.set_state(State::new(0.0, 0.0, 0.5, 0.0));
/// cp.apply_action(0.0);
/// // The pole falls away from upright under gravity.
/// assert!(cp.state().pole_angle > 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartPole {
    state: State,
    /// Half-length of the pole (hinge to center of mass).
    pub pole_length: f64,
    /// Mass of the pole.
    pub pole_mass: f64,
    /// Mass of the cart.
    pub cart_mass: f64,
    /// Friction coefficient of the cart on the track.
    pub mu_cart: f64,
    /// Friction coefficient of the pole hinge.
    pub mu_pole: f64,
    /// Gravitational acceleration.
    pub gravity: f64,
    /// Saturation bound for the commanded force.
    pub max_force: f64,
    /// Euler substeps per [`apply_action`](Self::apply_action) call.
    pub sim_steps: u32,
    /// Seconds of motion integrated per [`apply_action`](Self::apply_action) call.
    pub delta_time: f64,
}

impl CartPole {
    /// Create a cart-pole with the standard constants, at the down-hanging
    /// equilibrium.
    pub fn new() -> Self {
        Self {
            state: State::new(0.0, 0.0, PI, 0.0),
            pole_length: 0.5,
            pole_mass: 0.5,
            cart_mass: 0.5,
            mu_cart: 0.001,
            mu_pole: 0.001,
            gravity: 9.8,
            max_force: 20.0,
            sim_steps: 50,
            delta_time: 0.05,
        }
    }

    /// Set the visible step duration and the substep count.
    pub fn with_timing(mut self, delta_time: f64, sim_steps: u32) -> Self {
        self.delta_time = delta_time;
        self.sim_steps = sim_steps;
        self
    }

    /// Set the cart and pole masses.
    pub fn with_masses(mut self, cart_mass: f64, pole_mass: f64) -> Self {
        self.cart_mass = cart_mass;
        self.pole_mass = pole_mass;
        self
    }

    /// Set the track and hinge friction coefficients.
    pub fn with_friction(mut self, mu_cart: f64, mu_pole: f64) -> Self {
        self.mu_cart = mu_cart;
        self.mu_pole = mu_pole;
        self
    }

    /// The current state.
    pub fn state(&self) -> State {
        self.state
    }

    /// Overwrite the state. No validation; any finite state is legal.
    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Return to the down-hanging equilibrium (0, 0, π, 0).
    pub fn reset(&mut self) {
        self.state = State::new(0.0, 0.0, PI, 0.0);
    }

    /// Fold the pole angle onto [-π, π] in place.
    pub fn remap_angle(&mut self) {
        self.state.pole_angle = remap_angle(self.state.pole_angle);
    }

    /// Advance the dynamics by `delta_time` seconds under a commanded force.
    ///
    /// The command is saturated to (-max_force, max_force) through
    /// `max_force · tanh(action / max_force)` rather than clamped, so the
    /// response stays smooth in the command.
    pub fn apply_action(&mut self, action: f64) {
        let force = self.max_force * (action / self.max_force).tanh();
        let dt = self.delta_time / f64::from(self.sim_steps);

        for _ in 0..self.sim_steps {
            let s = self.state.pole_angle.sin();
            let c = self.state.pole_angle.cos();
            let m = 4.0 * (self.cart_mass + self.pole_mass) - 3.0 * self.pole_mass * c * c;

            let cart_accel = (2.0
                * (self.pole_length * self.pole_mass * self.state.pole_velocity.powi(2) * s
                    + force
                    - self.mu_cart * self.state.cart_velocity)
                - 3.0 * self.pole_mass * self.gravity * c * s)
                / m;

            let pole_accel = (-3.0
                * c
                * (self.pole_length / 2.0 * self.pole_mass * self.state.pole_velocity.powi(2) * s
                    + force
                    - self.mu_cart * self.state.cart_velocity)
                + 6.0 * (self.cart_mass + self.pole_mass) / (self.pole_mass * self.pole_length)
                    * (self.pole_mass * self.gravity * s
                        - 2.0 / self.pole_length * self.mu_pole * self.state.pole_velocity))
                / m;

            // Velocities first, then positions from the updated velocities.
            self.state.cart_velocity += dt * cart_accel;
            self.state.pole_velocity += dt * pole_accel;
            self.state.pole_angle += dt * self.state.pole_velocity;
            self.state.cart_location += dt * self.state.cart_velocity;
        }
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_is_down_hanging() {
        let mut cp = CartPole::new();
        cp.set_state(State::new(1.0, 2.0, 3.0, 4.0));
        cp.reset();
        assert_eq!(cp.state(), State::new(0.0, 0.0, PI, 0.0));
    }

    #[test]
    fn test_down_equilibrium_holds() {
        // sin(π) is ~1e-16 in floating point, so the equilibrium is held
        // only up to that round-off; ten seconds of integration must not
        // amplify it to anything visible.
        let mut cp = CartPole::new();
        cp.reset();
        for _ in 0..200 {
            cp.apply_action(0.0);
        }
        let state = cp.state();
        assert!(state.cart_location.abs() < 1e-9);
        assert!(state.cart_velocity.abs() < 1e-9);
        assert!((state.pole_angle - PI).abs() < 1e-9);
        assert!(state.pole_velocity.abs() < 1e-9);
    }

    #[test]
    fn test_pole_falls_under_gravity() {
        // From horizontal with zero force the angle must move toward π
        // immediately and monotonically: the pole falls, it does not hover.
        let mut cp = CartPole::new();
        cp.set_state(State::new(0.0, 0.0, PI / 2.0, 0.0));

        let mut previous = PI / 2.0;
        for _ in 0..5 {
            cp.apply_action(0.0);
            let angle = cp.state().pole_angle;
            assert!(angle > previous, "pole is not falling: {} -> {}", previous, angle);
            previous = angle;
        }
        assert!(cp.state().pole_velocity > 0.0);
    }

    #[test]
    fn test_upright_is_unstable() {
        let mut cp = CartPole::new();
        cp.set_state(State::new(0.0, 0.0, 0.01, 0.0));
        for _ in 0..20 {
            cp.apply_action(0.0);
        }
        assert!(cp.state().pole_angle.abs() > 0.01);
    }

    #[test]
    fn test_force_saturates() {
        let mut gentle = CartPole::new();
        gentle.reset();
        gentle.apply_action(20.0);

        let mut extreme = CartPole::new();
        extreme.reset();
        extreme.apply_action(2000.0);

        // tanh saturation: a 100x larger command may not move the cart
        // more than the bound allows.
        assert!(extreme.state().cart_velocity < gentle.state().cart_velocity * 1.5);
    }

    #[test]
    fn test_single_step_from_tilted_start() {
        // One visible step from (0, 0, 3.0, 0) with no force: the pole
        // accelerates toward π, and the cart picks up the hinge reaction.
        let mut cp = CartPole::new();
        cp.set_state(State::new(0.0, 0.0, 3.0, 0.0));
        cp.apply_action(0.0);

        let state = cp.state();
        assert!(state.pole_angle != 3.0);
        assert!(state.pole_velocity != 0.0);
        assert!(state.pole_angle > 3.0 && state.pole_angle < PI + 0.2);
    }

    #[test]
    fn test_opposite_forces_mirror_cart() {
        let mut left = CartPole::new();
        left.reset();
        left.apply_action(-10.0);

        let mut right = CartPole::new();
        right.reset();
        right.apply_action(10.0);

        assert!((left.state().cart_velocity + right.state().cart_velocity).abs() < 1e-9);
    }
}
