//! Tabular Q-learning agent solving a random maze.

use palaestra::agent::TabularQLearningAgent;
use palaestra::config::TabularConfig;
use palaestra::envs::Maze;
use palaestra::trainer::Trainer;

fn main() {
    println!("Maze Q-learning");
    println!("===============\n");

    let maze = Maze::seeded(8, 3);
    println!(
        "maze 8x8, shortest path: {} steps",
        maze.shortest_path_len().expect("generated mazes are solvable"),
    );

    let config = TabularConfig {
        epsilon_decay: 0.999,
        ..TabularConfig::default()
    };
    let agent = TabularQLearningAgent::seeded(4, config, 3);
    let mut trainer = Trainer::new(agent, maze).with_step_cap(300);

    let episodes = 500;
    let mut solved = 0;
    for episode in 0..episodes {
        let report = trainer.run_episode().expect("episode should run");
        if report.done {
            solved += 1;
        }

        if (episode + 1) % 100 == 0 {
            let stats = trainer.agent.stats();
            println!(
                "episode {:4}: avg(100)={:6.2}, solved={:3}, states={:2}, epsilon={:.3}",
                episode + 1,
                trainer.tracker.recent_average(100),
                solved,
                stats.states,
                stats.epsilon,
            );
        }
    }

    let stats = trainer.agent.stats();
    println!(
        "\nvisited {} states, q-values in [{:.2}, {:.2}]",
        stats.states, stats.min_q, stats.max_q,
    );
}
