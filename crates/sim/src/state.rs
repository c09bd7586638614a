//! State carriers for the cart-pole system.
//!
//! [`State`] is the four-dimensional physical state; [`StateAction`] pairs
//! it with the scalar force command, which is the five-component vector the
//! transition model works on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::angle::remap_angle;
use crate::error::SimError;
use crate::loss::{loss, DEFAULT_LOSS_SCALE};

/// The cart-pole state: (cart location, cart velocity, pole angle, pole
/// angular velocity).
///
/// Pole angle 0 is upright, π is hanging straight down.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct State {
    pub cart_location: f64,
    pub cart_velocity: f64,
    pub pole_angle: f64,
    pub pole_velocity: f64,
}

impl State {
    /// Create a state from its four components.
    pub fn new(cart_location: f64, cart_velocity: f64, pole_angle: f64, pole_velocity: f64) -> Self {
        Self {
            cart_location,
            cart_velocity,
            pole_angle,
            pole_velocity,
        }
    }

    /// The components in fixed order.
    pub fn to_array(self) -> [f64; 4] {
        [
            self.cart_location,
            self.cart_velocity,
            self.pole_angle,
            self.pole_velocity,
        ]
    }

    /// Build a state from components in fixed order.
    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    /// The same state with the pole angle folded onto [-π, π].
    pub fn remapped(mut self) -> Self {
        self.pole_angle = remap_angle(self.pole_angle);
        self
    }

    /// Loss under the default scale coefficients.
    pub fn loss(&self) -> f64 {
        loss(self, &DEFAULT_LOSS_SCALE)
    }

    /// Attach a force command.
    pub fn with_action(self, action: f64) -> StateAction {
        StateAction {
            state: self,
            action,
        }
    }
}

impl TryFrom<&[f64]> for State {
    type Error = SimError;

    fn try_from(slice: &[f64]) -> Result<Self, SimError> {
        if slice.len() != 4 {
            return Err(SimError::StateLength { got: slice.len() });
        }
        Ok(Self::new(slice[0], slice[1], slice[2], slice[3]))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(x: {:.4}, v: {:.4}, θ: {:.4}, ω: {:.4})",
            self.cart_location, self.cart_velocity, self.pole_angle, self.pole_velocity
        )
    }
}

/// A state together with the force command applied in it.
///
/// This is the five-component input vector of the transition model; the
/// model's output is the per-component [`state_delta`](Self::state_delta)
/// between two of these.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateAction {
    pub state: State,
    pub action: f64,
}

impl StateAction {
    /// Pair a state with a force command.
    pub fn new(state: State, action: f64) -> Self {
        Self { state, action }
    }

    /// The five components: state in fixed order, then the action.
    pub fn to_array(self) -> [f64; 5] {
        let s = self.state.to_array();
        [s[0], s[1], s[2], s[3], self.action]
    }

    /// Build from five components in fixed order.
    pub fn from_array(a: [f64; 5]) -> Self {
        Self {
            state: State::new(a[0], a[1], a[2], a[3]),
            action: a[4],
        }
    }

    /// Componentwise state difference `next - self` (the action does not
    /// contribute).
    pub fn state_delta(&self, next: &StateAction) -> [f64; 4] {
        let a = self.state.to_array();
        let b = next.state.to_array();
        [b[0] - a[0], b[1] - a[1], b[2] - a[2], b[3] - a[3]]
    }

    /// The same pair with the pole angle folded onto [-π, π].
    pub fn remapped(mut self) -> Self {
        self.state = self.state.remapped();
        self
    }
}

impl TryFrom<&[f64]> for StateAction {
    type Error = SimError;

    fn try_from(slice: &[f64]) -> Result<Self, SimError> {
        if slice.len() != 5 {
            return Err(SimError::StateActionLength { got: slice.len() });
        }
        Ok(Self::from_array([
            slice[0], slice[1], slice[2], slice[3], slice[4],
        ]))
    }
}

impl fmt::Display for StateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} u: {:.4}", self.state, self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_array_round_trip() {
        let state = State::new(0.1, -2.0, 3.0, 0.5);
        assert_eq!(State::from_array(state.to_array()), state);

        let pair = state.with_action(-7.0);
        assert_eq!(StateAction::from_array(pair.to_array()), pair);
    }

    #[test]
    fn test_try_from_rejects_wrong_length() {
        let short = [1.0, 2.0, 3.0];
        assert!(matches!(
            State::try_from(&short[..]),
            Err(SimError::StateLength { got: 3 })
        ));
        assert!(matches!(
            StateAction::try_from(&short[..]),
            Err(SimError::StateActionLength { got: 3 })
        ));
    }

    #[test]
    fn test_state_delta() {
        let a = State::new(0.0, 1.0, 2.0, 3.0).with_action(4.0);
        let b = State::new(1.0, 1.5, 1.0, 3.0).with_action(9.0);
        assert_eq!(a.state_delta(&b), [1.0, 0.5, -1.0, 0.0]);
    }

    #[test]
    fn test_remapped_folds_angle_only() {
        let pair = State::new(1.0, 2.0, 3.0 * PI, 4.0).with_action(5.0);
        let remapped = pair.remapped();
        assert!((remapped.state.pole_angle - PI).abs() < 1e-12);
        assert_eq!(remapped.state.cart_location, 1.0);
        assert_eq!(remapped.action, 5.0);
    }
}
