//! End-to-end tests driving the agents against the built-in environments.

use ndarray::array;

use palaestra::agent::{DqnAgent, DqnAgentBuilder, DqnModel, QLearningModel, TabularQLearningAgent};
use palaestra::config::{DqnConfig, TabularConfig};
use palaestra::envs::{CartPole, LunarLander, Maze};
use palaestra::trainer::Trainer;

#[test]
fn dqn_trains_on_cartpole() {
    let agent = DqnAgentBuilder::new()
        .input_size(4)
        .hidden_size(16)
        .output_size(2)
        .batch_size(16)
        .seed(7)
        .build()
        .unwrap();

    let mut trainer = Trainer::new(agent, CartPole::seeded(7)).with_step_cap(200);
    let reports = trainer.run(30).unwrap();

    assert_eq!(reports.len(), 30);
    assert_eq!(trainer.tracker.episodes(), 30);
    assert!(reports.iter().all(|r| r.steps >= 1));
    assert!(trainer.tracker.best().unwrap() >= 1.0);

    // Hundreds of training steps have passed: warm-up is over and epsilon
    // has decayed.
    assert!(trainer.agent.training_step > 100);
    assert!(trainer.agent.epsilon < 0.9);
    assert!(trainer.agent.epsilon >= trainer.agent.config().epsilon_min);
}

#[test]
fn dqn_runs_on_lander() {
    let agent = DqnAgentBuilder::new()
        .input_size(8)
        .hidden_size(16)
        .output_size(4)
        .batch_size(8)
        .seed(11)
        .build()
        .unwrap();

    let mut trainer = Trainer::new(agent, LunarLander::seeded(11)).with_step_cap(300);
    let reports = trainer.run(5).unwrap();

    assert_eq!(reports.len(), 5);
    assert!(reports.iter().all(|r| r.steps >= 1));
}

#[test]
fn tabular_agent_reaches_maze_goal() {
    let config = TabularConfig {
        epsilon_decay: 0.999,
        ..TabularConfig::default()
    };
    let agent = TabularQLearningAgent::seeded(4, config, 21);

    let mut trainer = Trainer::new(agent, Maze::open(8)).with_step_cap(300);
    let reports = trainer.run(400).unwrap();

    // The goal is the only terminal cell, so any completed episode means
    // the agent found it.
    assert!(reports.iter().any(|r| r.done));

    let stats = trainer.agent.stats();
    assert!(stats.states > 1);
    assert!(stats.epsilon < trainer.agent.config().epsilon);
}

#[test]
fn dqn_model_round_trips_through_json() {
    let mut agent = DqnAgent::seeded(
        4,
        8,
        2,
        DqnConfig {
            batch_size: 4,
            min_memory_size: 4,
            ..DqnConfig::default()
        },
        31,
    );

    let state = array![0.1, -0.2, 0.3, -0.4];
    for _ in 0..4 {
        agent.remember(state.view(), 1, 0.5, state.view(), false).unwrap();
    }
    for _ in 0..10 {
        agent.replay().unwrap();
    }

    let payload = agent.save().to_json().unwrap();
    let model = DqnModel::from_json(&payload).unwrap();

    let mut restored = DqnAgent::seeded(4, 8, 2, DqnConfig::default(), 99);
    restored.load(&model).unwrap();

    agent.epsilon = 0.0;
    restored.epsilon = 0.0;
    for state in [
        array![0.0, 0.0, 0.0, 0.0],
        array![0.5, -0.5, 0.5, -0.5],
        array![2.0, 1.0, -1.0, -2.0],
    ] {
        assert_eq!(
            agent.act(state.view()).unwrap(),
            restored.act(state.view()).unwrap()
        );
    }
}

#[test]
fn tabular_model_round_trips_through_bytes() {
    let mut agent = TabularQLearningAgent::seeded(4, TabularConfig::default(), 41);
    for x in 0..4 {
        for y in 0..4 {
            let state = array![x as f64, y as f64];
            agent
                .update(state.view(), (x + y) % 4, x as f64 - y as f64, state.view(), true)
                .unwrap();
        }
    }

    let bytes = agent.save().to_bytes().unwrap();
    let model = QLearningModel::from_bytes(&bytes).unwrap();

    let mut restored = TabularQLearningAgent::seeded(4, TabularConfig::default(), 42);
    restored.load(&model).unwrap();

    assert_eq!(restored.stats(), agent.stats());
    for x in 0..4 {
        for y in 0..4 {
            let state = array![x as f64, y as f64];
            assert_eq!(
                restored.best_action(state.view()),
                agent.best_action(state.view())
            );
        }
    }
}

#[test]
fn seeded_training_is_reproducible() {
    let run = |seed: u64| {
        let agent = DqnAgentBuilder::new()
            .input_size(4)
            .hidden_size(8)
            .output_size(2)
            .batch_size(8)
            .seed(seed)
            .build()
            .unwrap();
        let mut trainer = Trainer::new(agent, CartPole::seeded(seed)).with_step_cap(200);
        let reports = trainer.run(10).unwrap();
        (
            reports.iter().map(|r| r.steps).collect::<Vec<_>>(),
            trainer.agent.save(),
        )
    };

    let (steps_a, model_a) = run(5);
    let (steps_b, model_b) = run(5);
    assert_eq!(steps_a, steps_b);
    assert_eq!(model_a, model_b);
}
