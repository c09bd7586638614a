//! Policies: state → force command.
//!
//! A policy decides how hard to push the cart given the current state.
//! Policies and dynamics are independent, swappable parts: the objective
//! in [`crate::objective`] works with any pairing of the two.

use nalgebra::{Matrix4, Vector4};

use cartpole_sim::State;

use crate::error::ControlError;

/// A policy maps states to scalar force commands.
pub trait Policy {
    /// Select a force command for the given state.
    fn act(&self, state: &State) -> f64;
}

/// Any `Fn(&State) -> f64` is a policy.
impl<F> Policy for F
where
    F: Fn(&State) -> f64,
{
    fn act(&self, state: &State) -> f64 {
        self(state)
    }
}

/// A policy that always commands the same force.
///
/// Zero force is the baseline for free-dynamics experiments.
#[derive(Debug, Clone, Copy)]
pub struct ConstantPolicy {
    pub force: f64,
}

impl ConstantPolicy {
    /// Create a policy that always returns the given force.
    pub fn new(force: f64) -> Self {
        Self { force }
    }
}

impl Policy for ConstantPolicy {
    fn act(&self, _state: &State) -> f64 {
        self.force
    }
}

/// A saturated linear feedback policy.
///
/// The raw command is the dot product of the weights with the state; it is
/// squashed through `max_force · tanh(w·s / max_force)` so the commanded
/// force respects the same bound the simulator enforces.
#[derive(Debug, Clone, Copy)]
pub struct LinearPolicy {
    /// Feedback gain per state component.
    pub weights: [f64; 4],
    /// Saturation bound on the command.
    pub max_force: f64,
}

impl LinearPolicy {
    /// Create a linear policy with the standard force bound.
    pub fn new(weights: [f64; 4]) -> Self {
        Self {
            weights,
            max_force: 20.0,
        }
    }

    /// Set the saturation bound.
    pub fn with_max_force(mut self, max_force: f64) -> Self {
        self.max_force = max_force;
        self
    }
}

impl Policy for LinearPolicy {
    fn act(&self, state: &State) -> f64 {
        let raw: f64 = self
            .weights
            .iter()
            .zip(state.to_array().iter())
            .map(|(w, s)| w * s)
            .sum();
        self.max_force * (raw / self.max_force).tanh()
    }
}

/// A weighted mixture of Gaussians over the state space.
///
/// The command is `Σᵢ wᵢ · exp(-0.5 · (s - cᵢ)ᵀ M (s - cᵢ))`, a smooth
/// nonlinear field shaped by the centers. The metric M is built as `AᵀA`
/// from the caller's shape matrix, so it is positive semi-definite for any
/// A and the exponent can never blow up positive.
#[derive(Debug, Clone)]
pub struct RbfPolicy {
    weights: Vec<f64>,
    centers: Vec<State>,
    metric: Matrix4<f64>,
}

impl RbfPolicy {
    /// Create a mixture policy from weights, centers, and a shape matrix.
    ///
    /// # Errors
    ///
    /// Fails fast if the weight and center counts differ.
    pub fn new(
        weights: Vec<f64>,
        centers: Vec<State>,
        shape: Matrix4<f64>,
    ) -> Result<Self, ControlError> {
        if weights.len() != centers.len() {
            return Err(ControlError::WeightCenterMismatch {
                weights: weights.len(),
                centers: centers.len(),
            });
        }
        Ok(Self {
            weights,
            centers,
            metric: shape.transpose() * shape,
        })
    }

    /// The positive semi-definite metric in use.
    pub fn metric(&self) -> &Matrix4<f64> {
        &self.metric
    }
}

impl Policy for RbfPolicy {
    fn act(&self, state: &State) -> f64 {
        let s = Vector4::from(state.to_array());
        self.weights
            .iter()
            .zip(self.centers.iter())
            .map(|(w, center)| {
                let d = s - Vector4::from(center.to_array());
                w * (-0.5 * (self.metric * d).dot(&d)).exp()
            })
            .sum()
    }
}
