use ndarray::array;

use crate::agent::{QLearningModel, TabularQLearningAgent};
use crate::config::TabularConfig;

fn agent_with(learning_rate: f64, gamma: f64, seed: u64) -> TabularQLearningAgent {
    let config = TabularConfig {
        learning_rate,
        gamma,
        ..TabularConfig::default()
    };
    TabularQLearningAgent::seeded(4, config, seed)
}

#[test]
fn test_unseen_states_initialize_to_zero() {
    let mut agent = agent_with(0.1, 0.9, 0);
    let values = agent.q_values_mut(array![3.0, 5.0].view());
    assert_eq!(values.len(), 4);
    assert!(values.iter().all(|&q| q == 0.0));
    assert_eq!(agent.stats().states, 1);
}

#[test]
fn test_greedy_tie_breaks_toward_lowest_index() {
    let mut agent = agent_with(0.1, 0.9, 1);
    let state = array![0.0, 0.0];

    // All zeros: the first action wins.
    assert_eq!(agent.best_action(state.view()), 0);

    *agent.q_values_mut(state.view()) = array![1.0, 2.0, 2.0, -1.0];
    assert_eq!(agent.best_action(state.view()), 1);
}

#[test]
fn test_act_stays_in_range() {
    let mut agent = agent_with(0.1, 0.9, 2);
    agent.epsilon = 1.0;
    let state = array![1.0, 1.0];
    for _ in 0..50 {
        assert!(agent.act(state.view()).unwrap() < 4);
    }
}

#[test]
fn test_update_rejects_invalid_action() {
    let mut agent = agent_with(0.1, 0.9, 3);
    let state = array![0.0, 0.0];
    assert!(agent.update(state.view(), 9, 1.0, state.view(), true).is_err());
}

#[test]
fn test_bandit_converges_to_reward() {
    // Single state, every action terminal with reward 1: the table must
    // converge to the reward for every action taken.
    let mut agent = agent_with(0.5, 0.9, 4);
    let state = array![0.0];

    for _ in 0..60 {
        for action in 0..2 {
            agent.update(state.view(), action, 1.0, state.view(), true).unwrap();
        }
    }

    let values = agent.q_values_mut(state.view());
    assert!((values[0] - 1.0).abs() < 1e-6);
    assert!((values[1] - 1.0).abs() < 1e-6);
    // Untouched actions stay at zero.
    assert_eq!(values[2], 0.0);
    assert_eq!(values[3], 0.0);
}

#[test]
fn test_td_update_bootstraps_from_next_state() {
    let mut agent = agent_with(0.5, 0.9, 5);
    let s1 = array![0.0, 0.0];
    let s2 = array![1.0, 0.0];

    // Seed the next state's value, then check the bootstrapped update.
    agent.update(s2.view(), 0, 1.0, s2.view(), true).unwrap();
    assert!((agent.q_values_mut(s2.view())[0] - 0.5).abs() < 1e-12);

    agent.update(s1.view(), 1, 0.0, s2.view(), false).unwrap();
    // target = 0 + 0.9 * 0.5; q = 0 + 0.5 * target
    assert!((agent.q_values_mut(s1.view())[1] - 0.225).abs() < 1e-12);
}

#[test]
fn test_epsilon_decays_from_first_update() {
    let mut agent = agent_with(0.1, 0.9, 6);
    let state = array![0.0, 0.0];
    let expected = agent.epsilon * agent.config().epsilon_decay;

    agent.update(state.view(), 0, 0.0, state.view(), true).unwrap();
    assert!((agent.epsilon - expected).abs() < 1e-12);

    // And keeps decaying monotonically down to the floor.
    let mut previous = agent.epsilon;
    for _ in 0..2000 {
        agent.update(state.view(), 0, 0.0, state.view(), true).unwrap();
        assert!(agent.epsilon <= previous);
        previous = agent.epsilon;
    }
    assert_eq!(agent.epsilon, agent.config().epsilon_min);
}

#[test]
fn test_save_load_round_trip_is_exact() {
    let mut agent = agent_with(0.3, 0.8, 7);
    let states = [
        array![0.0, 0.0],
        array![-1.0, 2.0],
        array![5.0, 7.0],
    ];
    for (i, state) in states.iter().enumerate() {
        agent
            .update(state.view(), i % 4, i as f64 + 0.5, state.view(), true)
            .unwrap();
    }

    let model = agent.save();
    let payload = model.to_json().unwrap();
    let restored_model = QLearningModel::from_json(&payload).unwrap();
    assert_eq!(restored_model, model);

    let mut restored = TabularQLearningAgent::seeded(4, TabularConfig::default(), 8);
    restored.load(&restored_model).unwrap();

    assert_eq!(restored.epsilon, agent.epsilon);
    assert_eq!(restored.config().learning_rate, 0.3);
    assert_eq!(restored.config().gamma, 0.8);
    assert_eq!(restored.stats(), agent.stats());
    for state in &states {
        assert_eq!(
            restored.q_values_mut(state.view()),
            agent.q_values_mut(state.view())
        );
    }
}

#[test]
fn test_load_rejects_malformed_keys() {
    let mut agent = agent_with(0.1, 0.9, 9);
    let state = array![0.0, 0.0];
    agent.update(state.view(), 0, 1.0, state.view(), true).unwrap();
    let stats_before = agent.stats();

    let model = QLearningModel {
        q_table: vec![("not,a,number,x".to_string(), vec![0.0; 4])],
        learning_rate: 0.1,
        gamma: 0.9,
        epsilon: 0.5,
        epsilon_decay: 0.995,
        epsilon_min: 0.01,
    };
    assert!(agent.load(&model).is_err());

    // A rejected load leaves the table untouched.
    assert_eq!(agent.stats(), stats_before);
}

#[test]
fn test_load_rejects_wrong_row_length() {
    let mut agent = agent_with(0.1, 0.9, 10);
    let model = QLearningModel {
        q_table: vec![("1,1".to_string(), vec![0.0; 3])],
        learning_rate: 0.1,
        gamma: 0.9,
        epsilon: 0.5,
        epsilon_decay: 0.995,
        epsilon_min: 0.01,
    };
    assert!(agent.load(&model).is_err());
}
