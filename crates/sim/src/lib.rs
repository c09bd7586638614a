//! # Cart-Pole Simulator
//!
//! This crate implements the physical side of the cart-pole system:
//!
//! - [`State`]: the four-dimensional state (cart location, cart velocity,
//!   pole angle, pole angular velocity)
//! - [`remap_angle()`]: fold any angle back onto the principal interval
//! - [`loss()`]: score a state's distance from the upright, stationary goal
//! - [`CartPole`]: the nonlinear dynamics, advanced by semi-implicit Euler
//!
//! The angle convention is fixed throughout: **0 is upright, π is hanging
//! straight down**. Nothing forces the angle into a canonical range unless
//! remapping is applied explicitly.
//!
//! ## Example
//!
//! ```rust
//! use cartpole_sim::CartPole;
//!
//! let mut cp = CartPole::new();
//! cp.reset(); // down-hanging equilibrium: (0, 0, π, 0)
//!
//! // Push the cart; one call integrates delta_time seconds of motion.
//! cp.apply_action(5.0);
//! assert!(cp.state().cart_velocity > 0.0);
//! ```

pub mod angle;
pub mod cartpole;
mod error;
pub mod loss;
pub mod state;

pub use angle::remap_angle;
pub use cartpole::CartPole;
pub use error::SimError;
pub use loss::{loss, DEFAULT_LOSS_SCALE};
pub use state::{State, StateAction};
