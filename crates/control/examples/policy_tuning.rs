//! Tune a linear feedback policy against the cumulative-loss objective.
//!
//! Run with: cargo run -p cartpole-control --example policy_tuning

use cartpole_control::{
    loss_after_steps, Dynamics, GradientDescent, LinearPolicy, ScaleSchedule,
};
use cartpole_sim::{CartPole, State};

fn main() {
    println!("=== Cart-Pole: Linear Policy Tuning ===\n");

    let sim = CartPole::new();
    let dynamics = Dynamics::Simulated(&sim);

    // Slightly off upright; the policy must catch the pole before it falls.
    let start = State::new(0.0, 0.0, 0.2, 0.0);
    let steps = 25;
    let schedule = ScaleSchedule::default();

    let objective = |params: &[f64]| {
        let policy = LinearPolicy::new([params[0], params[1], params[2], params[3]]);
        loss_after_steps(&dynamics, &policy, start, steps, &schedule)
    };

    let mut gains = [0.5, 1.0, 15.0, 2.0];
    println!("Initial gains:     {:?}", gains);
    println!("Initial objective: {:.4}", objective(&gains));

    let optimizer = GradientDescent::new(0.05, 40).with_fd_step(1e-3);
    let history = optimizer.minimize(&objective, &mut gains);

    println!("Tuned gains:       {:?}", gains);
    println!("Tuned objective:   {:.4}", history.last().unwrap());
    println!();

    println!("Objective per iteration:");
    for (iteration, value) in history.iter().enumerate().step_by(5) {
        println!("  iter {:>3}: {:.4}", iteration, value);
    }
}
