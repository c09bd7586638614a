//! Synthetic transition data for fitting the transition model.
//!
//! Starts are drawn over a wide slice of the state-action space (the cart
//! near the origin, velocities and actions spanning their working ranges),
//! each is simulated forward, and the recorded target is the state delta.
//! All sampling runs on a caller-owned generator, so a seeded generator
//! reproduces the data set exactly.

use std::f64::consts::PI;

use nalgebra::DMatrix;
use rand::Rng;

use cartpole_sim::{CartPole, StateAction};

use crate::error::ControlError;

/// A train/test split of transition samples.
///
/// Inputs are N×5 state-action rows; targets are the matching N×4 state
/// deltas.
#[derive(Debug, Clone)]
pub struct TrainingData {
    pub x_train: DMatrix<f64>,
    pub y_train: DMatrix<f64>,
    pub x_test: DMatrix<f64>,
    pub y_test: DMatrix<f64>,
}

impl TrainingData {
    /// Number of training samples.
    pub fn train_len(&self) -> usize {
        self.x_train.nrows()
    }

    /// Number of held-out samples.
    pub fn test_len(&self) -> usize {
        self.x_test.nrows()
    }
}

/// Run `steps` visible steps from `start` with the carried action and
/// return the final state-action pair.
///
/// The template simulator supplies the constants; its own state is never
/// touched.
pub fn simulate(template: &CartPole, start: StateAction, steps: usize, remap: bool) -> StateAction {
    let mut cp = template.clone();
    cp.set_state(start.state);
    for _ in 0..steps {
        cp.apply_action(start.action);
        if remap {
            cp.remap_angle();
        }
    }
    StateAction::new(cp.state(), start.action)
}

/// Draw a random starting state-action pair.
///
/// Cart location ~ N(0, 1); cart velocity uniform on ±10; pole angle
/// uniform on ±π; pole velocity uniform on ±15; action uniform on ±20.
pub fn sample_start<R: Rng + ?Sized>(rng: &mut R) -> StateAction {
    StateAction::from_array([
        standard_normal(rng),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-PI..PI),
        rng.gen_range(-15.0..15.0),
        rng.gen_range(-20.0..20.0),
    ])
}

/// Generate `n` transition samples and split them for training.
///
/// Each sample pairs a random start with the state delta after `steps`
/// visible steps. The first `⌊n·train_proportion⌋` rows form the training
/// split, the remainder the test split.
///
/// # Errors
///
/// Fails fast when `n` is zero, `train_proportion` is outside (0, 1], or
/// the split would leave the training half empty.
pub fn generate_data<R: Rng + ?Sized>(
    template: &CartPole,
    n: usize,
    steps: usize,
    train_proportion: f64,
    remap: bool,
    rng: &mut R,
) -> Result<TrainingData, ControlError> {
    if n == 0 {
        return Err(ControlError::ZeroSamples);
    }
    if !(train_proportion > 0.0 && train_proportion <= 1.0) {
        return Err(ControlError::BadTrainProportion {
            value: train_proportion,
        });
    }
    let train_count = (n as f64 * train_proportion) as usize;
    if train_count == 0 {
        return Err(ControlError::EmptyTrainingSplit {
            samples: n,
            proportion: train_proportion,
        });
    }

    let mut x = DMatrix::zeros(n, 5);
    let mut y = DMatrix::zeros(n, 4);
    for i in 0..n {
        let start = sample_start(rng);
        let end = simulate(template, start, steps, remap);
        let delta = start.state_delta(&end);
        for (j, value) in start.to_array().iter().enumerate() {
            x[(i, j)] = *value;
        }
        for (j, value) in delta.iter().enumerate() {
            y[(i, j)] = *value;
        }
    }

    Ok(TrainingData {
        x_train: x.rows(0, train_count).into_owned(),
        y_train: y.rows(0, train_count).into_owned(),
        x_test: x.rows(train_count, n - train_count).into_owned(),
        y_test: y.rows(train_count, n - train_count).into_owned(),
    })
}

/// Add zero-mean Gaussian noise to every entry in place.
pub fn add_noise<R: Rng + ?Sized>(matrix: &mut DMatrix<f64>, std_dev: f64, rng: &mut R) {
    for value in matrix.iter_mut() {
        *value += std_dev * standard_normal(rng);
    }
}

/// A standard-normal draw from the caller's generator (Box–Muller).
pub fn standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen::<f64>().max(1e-12);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cartpole_sim::State;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_simulate_zero_steps_is_identity() {
        let template = CartPole::new();
        let start = State::new(0.1, 0.2, 0.3, 0.4).with_action(5.0);
        assert_eq!(simulate(&template, start, 0, false), start);
    }

    #[test]
    fn test_generate_data_shapes_and_split() {
        let template = CartPole::new();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let data = generate_data(&template, 10, 1, 0.8, false, &mut rng).unwrap();

        assert_eq!(data.train_len(), 8);
        assert_eq!(data.test_len(), 2);
        assert_eq!(data.x_train.ncols(), 5);
        assert_eq!(data.y_train.ncols(), 4);
        assert_eq!(data.x_test.ncols(), 5);
        assert_eq!(data.y_test.ncols(), 4);
    }

    #[test]
    fn test_generate_data_is_seed_deterministic() {
        let template = CartPole::new();
        let a = generate_data(&template, 6, 1, 0.5, true, &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        let b = generate_data(&template, 6, 1, 0.5, true, &mut ChaCha8Rng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a.x_train, b.x_train);
        assert_eq!(a.y_test, b.y_test);
    }

    #[test]
    fn test_generate_data_rejects_bad_arguments() {
        let template = CartPole::new();
        let mut rng = ChaCha8Rng::seed_from_u64(0);

        assert!(matches!(
            generate_data(&template, 0, 1, 0.8, false, &mut rng),
            Err(ControlError::ZeroSamples)
        ));
        assert!(matches!(
            generate_data(&template, 10, 1, 1.5, false, &mut rng),
            Err(ControlError::BadTrainProportion { .. })
        ));
        assert!(matches!(
            generate_data(&template, 10, 1, 0.05, false, &mut rng),
            Err(ControlError::EmptyTrainingSplit { samples: 10, .. })
        ));
    }

    #[test]
    fn test_sample_start_respects_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for _ in 0..50 {
            let pair = sample_start(&mut rng);
            assert!(pair.state.cart_velocity.abs() < 10.0);
            assert!(pair.state.pole_angle.abs() < PI);
            assert!(pair.state.pole_velocity.abs() < 15.0);
            assert!(pair.action.abs() < 20.0);
        }
    }

    #[test]
    fn test_add_noise_perturbs_every_entry() {
        let mut matrix = DMatrix::zeros(4, 5);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        add_noise(&mut matrix, 0.5, &mut rng);
        // With continuous noise an exactly-zero entry has probability zero.
        assert!(matrix.iter().all(|v| *v != 0.0));
    }

    #[test]
    fn test_standard_normal_moments() {
        let mut rng = ChaCha8Rng::seed_from_u64(17);
        let n = 4000;
        let draws: Vec<f64> = (0..n).map(|_| standard_normal(&mut rng)).collect();
        let mean = draws.iter().sum::<f64>() / n as f64;
        let var = draws.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n as f64;
        assert!(mean.abs() < 0.1);
        assert!((var - 1.0).abs() < 0.15);
    }
}
