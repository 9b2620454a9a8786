//! DQN agent learning to balance a pole.

use palaestra::agent::DqnAgentBuilder;
use palaestra::envs::CartPole;
use palaestra::trainer::Trainer;

fn main() {
    println!("CartPole DQN");
    println!("============\n");

    let agent = DqnAgentBuilder::new()
        .input_size(4)
        .hidden_size(64)
        .output_size(2)
        .learning_rate(0.001)
        .gamma(0.95)
        .batch_size(32)
        .seed(7)
        .build()
        .expect("valid agent configuration");

    let mut trainer = Trainer::new(agent, CartPole::seeded(7)).with_step_cap(500);

    let episodes = 400;
    for episode in 0..episodes {
        let report = trainer.run_episode().expect("episode should run");

        if (episode + 1) % 50 == 0 {
            println!(
                "episode {:4}: steps={:3}, avg(50)={:6.1}, epsilon={:.3}",
                episode + 1,
                report.steps,
                trainer.tracker.recent_average(50),
                trainer.agent.epsilon,
            );
        }
    }

    println!(
        "\nbest score: {:.1}, average over last 100: {:.1}",
        trainer.tracker.best().unwrap_or(0.0),
        trainer.tracker.recent_average(100),
    );

    // Greedy evaluation.
    trainer.agent.epsilon = 0.0;
    let mut eval_steps = Vec::new();
    for _ in 0..10 {
        let report = trainer.run_episode().expect("episode should run");
        eval_steps.push(report.steps);
    }
    let average = eval_steps.iter().sum::<usize>() as f64 / eval_steps.len() as f64;
    println!("greedy evaluation: average {:.1} steps over 10 episodes", average);
}
