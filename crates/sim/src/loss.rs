//! Distance-from-goal loss.
//!
//! The goal configuration is the upright, stationary, centered state — all
//! four components zero. The loss is a Gaussian well around it:
//!
//! ```text
//! loss(s) = 1 - exp(-0.5 · Σᵢ (sᵢ / scaleᵢ)²)
//! ```
//!
//! Zero at the goal, approaching 1 as the scaled norm grows, never
//! reaching it for finite input.

use crate::state::State;

/// Default per-dimension scale coefficients: cart location and velocity at
/// unit scale, pole angle and angular velocity weighted twice as heavily.
pub const DEFAULT_LOSS_SCALE: [f64; 4] = [1.0, 1.0, 0.5, 0.5];

/// Score a state's deviation from the upright, stationary configuration.
///
/// Returns a value in [0, 1). The pole angle is used as given — callers
/// remap it first if they want the principal-interval distance.
pub fn loss(state: &State, scale: &[f64; 4]) -> f64 {
    let s = state.to_array();
    let squared_norm: f64 = s
        .iter()
        .zip(scale.iter())
        .map(|(component, scale)| (component / scale).powi(2))
        .sum();
    1.0 - (-0.5 * squared_norm).exp()
}
