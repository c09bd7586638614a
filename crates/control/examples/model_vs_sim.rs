//! Fit a transition model on simulated data, then watch it track (and
//! drift from) the true dynamics.
//!
//! Run with: cargo run -p cartpole-control --example model_vs_sim

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use cartpole_control::{compare, generate_data, RolloutConfig};
use cartpole_model::{rmse, Bandwidth, FitConfig, KernelModel};
use cartpole_sim::{CartPole, State};

fn main() {
    println!("=== Cart-Pole: Kernel Model vs Simulator ===\n");

    let sim = CartPole::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    // -------------------------------------------------------------------------
    // 1. Sample transitions from the simulator
    // -------------------------------------------------------------------------
    let samples = 500;
    let data = generate_data(&sim, samples, 1, 0.8, true, &mut rng)
        .expect("data generation arguments are valid");
    println!(
        "1. Sampled {} transitions ({} train / {} test)",
        samples,
        data.train_len(),
        data.test_len()
    );

    // -------------------------------------------------------------------------
    // 2. Fit the kernel-ridge model
    // -------------------------------------------------------------------------
    let bandwidth = Bandwidth::new([2.0, 10.0, 1.0, 10.0, 15.0]).expect("positive widths");
    let config = FitConfig::new(120, bandwidth);
    let model = KernelModel::fit(&data.x_train, &data.y_train, &config, &mut rng)
        .expect("training data is well-shaped");
    println!("2. Fitted {} basis points", model.num_basis());

    let predictions = model
        .predict_batch(&data.x_test)
        .expect("test inputs are well-shaped");
    let errors = rmse(&predictions, &data.y_test).expect("shapes match");
    println!("   Held-out single-step RMSE per dimension:");
    println!("     cart location:  {:.5}", errors[0]);
    println!("     cart velocity:  {:.5}", errors[1]);
    println!("     pole angle:     {:.5}", errors[2]);
    println!("     pole velocity:  {:.5}", errors[3]);
    println!();

    // -------------------------------------------------------------------------
    // 3. Roll both forward from the same start
    // -------------------------------------------------------------------------
    let start = State::new(0.0, 0.0, 3.0, 0.0).with_action(0.0);
    println!("3. Rollouts from {} over 20 steps\n", start);

    let anchored = compare(&model, &sim, start, RolloutConfig::new(20).remap_angle());
    println!("{}", anchored);

    let compounded = compare(
        &model,
        &sim,
        start,
        RolloutConfig::new(20).remap_angle().compound(),
    );
    println!("{}", compounded);

    println!("Anchored predictions restart from ground truth every step;");
    println!("compounded ones chain, so their error is the one that grows.");
}
