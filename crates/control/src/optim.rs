//! Gradient descent over black-box objectives.
//!
//! The rollout objective exposes no gradients, so the descent estimates
//! them by central finite differences: two objective evaluations per
//! parameter per iteration. Adequate for the handful of parameters a
//! policy carries; not meant for high-dimensional fits.

/// Finite-difference gradient descent.
///
/// # Example
///
/// ```rust
/// use cartpole_control::GradientDescent;
///
/// let optimizer = GradientDescent::new(0.1, 60);
/// let mut params = vec![0.0];
/// let history = optimizer.minimize(|p| (p[0] - 3.0).powi(2), &mut params);
///
/// assert!((params[0] - 3.0).abs() < 1e-3);
/// assert!(history.last().unwrap() < history.first().unwrap());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GradientDescent {
    /// Step size per iteration.
    pub learning_rate: f64,
    /// Number of descent iterations.
    pub iterations: usize,
    /// Half-width of the central difference stencil.
    pub fd_step: f64,
}

impl GradientDescent {
    /// Create an optimizer with the default stencil width (1e-4).
    pub fn new(learning_rate: f64, iterations: usize) -> Self {
        Self {
            learning_rate,
            iterations,
            fd_step: 1e-4,
        }
    }

    /// Set the finite-difference stencil half-width.
    pub fn with_fd_step(mut self, fd_step: f64) -> Self {
        self.fd_step = fd_step;
        self
    }

    /// Minimize `objective` by updating `params` in place.
    ///
    /// Returns the objective value after each iteration.
    pub fn minimize<F>(&self, objective: F, params: &mut [f64]) -> Vec<f64>
    where
        F: Fn(&[f64]) -> f64,
    {
        let mut history = Vec::with_capacity(self.iterations);
        let mut gradient = vec![0.0; params.len()];

        for _ in 0..self.iterations {
            for i in 0..params.len() {
                let saved = params[i];
                params[i] = saved + self.fd_step;
                let up = objective(params);
                params[i] = saved - self.fd_step;
                let down = objective(params);
                params[i] = saved;
                gradient[i] = (up - down) / (2.0 * self.fd_step);
            }

            for (param, grad) in params.iter_mut().zip(gradient.iter()) {
                *param -= self.learning_rate * grad;
            }

            history.push(objective(params));
        }

        history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimizes_a_quadratic() {
        let optimizer = GradientDescent::new(0.2, 100);
        let mut params = vec![5.0, -4.0];
        let history =
            optimizer.minimize(|p| (p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2), &mut params);

        assert!((params[0] - 1.0).abs() < 1e-4);
        assert!((params[1] + 2.0).abs() < 1e-4);
        assert_eq!(history.len(), 100);
        assert!(history.last().unwrap() < history.first().unwrap());
    }

    #[test]
    fn test_zero_iterations_leaves_params_alone() {
        let optimizer = GradientDescent::new(0.1, 0);
        let mut params = vec![2.0];
        let history = optimizer.minimize(|p| p[0] * p[0], &mut params);
        assert_eq!(params, vec![2.0]);
        assert!(history.is_empty());
    }

    #[test]
    fn test_already_at_minimum_stays_put() {
        let optimizer = GradientDescent::new(0.5, 10);
        let mut params = vec![0.0];
        optimizer.minimize(|p| p[0] * p[0], &mut params);
        assert!(params[0].abs() < 1e-9);
    }
}
