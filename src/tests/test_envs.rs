use crate::env::Environment;
use crate::envs::{CartPole, LunarLander, Maze};

#[test]
fn test_cartpole_reset_observation() {
    let mut env = CartPole::seeded(0);
    let obs = env.reset();
    assert_eq!(obs.len(), 4);
    assert_eq!(env.observation_len(), 4);
    assert_eq!(env.num_actions(), 2);

    // Position and angle are perturbed; velocities start at zero.
    assert!(obs[0].abs() < 0.05);
    assert_eq!(obs[1], 0.0);
    assert!(obs[2].abs() < 0.05);
    assert_eq!(obs[3], 0.0);
}

#[test]
fn test_cartpole_is_deterministic_given_seed() {
    let mut a = CartPole::seeded(42);
    let mut b = CartPole::seeded(42);
    assert_eq!(a.reset(), b.reset());

    for i in 0..100 {
        let action = i % 2;
        let step_a = a.step(action).unwrap();
        let step_b = b.step(action).unwrap();
        assert_eq!(step_a.state, step_b.state);
        assert_eq!(step_a.reward, step_b.reward);
        assert_eq!(step_a.done, step_b.done);
    }
}

#[test]
fn test_cartpole_terminates_under_constant_push() {
    let mut env = CartPole::seeded(1);
    env.reset();

    let mut done = false;
    for _ in 0..500 {
        let step = env.step(1).unwrap();
        if step.done {
            // The terminating step still pays its survival reward.
            assert_eq!(step.reward, 1.0);
            done = true;
            break;
        }
        assert_eq!(step.reward, 1.0);
    }
    assert!(done);

    // Stepping past termination yields nothing.
    let after = env.step(1).unwrap();
    assert!(after.done);
    assert_eq!(after.reward, 0.0);
}

#[test]
fn test_cartpole_rejects_invalid_action() {
    let mut env = CartPole::seeded(2);
    env.reset();
    assert!(env.step(2).is_err());
}

#[test]
fn test_maze_layout_and_reset() {
    let mut env = Maze::open(8);
    assert_eq!(env.size(), 8);
    assert_eq!(env.start(), (1, 1));
    assert_eq!(env.goal(), (6, 6));

    let obs = env.reset();
    assert_eq!(obs.len(), 2);
    assert_eq!(obs[0], 1.0);
    assert_eq!(obs[1], 1.0);

    // Without interior walls the shortest path is the Manhattan distance.
    assert_eq!(env.shortest_path_len(), Some(10));
}

#[test]
fn test_maze_wall_bump_keeps_agent_in_place() {
    let mut env = Maze::open(8);
    env.reset();

    // Moving up from (1, 1) hits the border.
    let step = env.step(0).unwrap();
    assert_eq!(step.reward, -1.0);
    assert!(!step.done);
    assert_eq!(step.state[0], 1.0);
    assert_eq!(step.state[1], 1.0);
    assert_eq!(step.info.get("hit_wall").map(String::as_str), Some("true"));
}

#[test]
fn test_maze_walk_to_goal() {
    let mut env = Maze::open(8);
    env.reset();

    // Five moves right, then five moves down, lands on the goal.
    let mut last = None;
    for action in [1, 1, 1, 1, 1, 2, 2, 2, 2, 2] {
        let step = env.step(action).unwrap();
        last = Some(step);
    }
    let last = last.unwrap();
    assert!(last.done);
    assert_eq!(last.reward, 10.0);
    assert_eq!(last.info.get("success").map(String::as_str), Some("true"));
    assert_eq!(last.state[0], 6.0);
    assert_eq!(last.state[1], 6.0);
}

#[test]
fn test_maze_step_cost() {
    let mut env = Maze::open(8);
    env.reset();
    let step = env.step(1).unwrap();
    assert_eq!(step.reward, -0.01);
    assert!(!step.done);
}

#[test]
fn test_maze_generation_is_seeded_and_solvable() {
    let a = Maze::seeded(8, 7);
    let b = Maze::seeded(8, 7);
    for y in 0..8 {
        for x in 0..8 {
            assert_eq!(a.is_wall(x, y), b.is_wall(x, y));
        }
    }
    assert!(a.shortest_path_len().is_some());
}

#[test]
fn test_maze_rejects_invalid_action() {
    let mut env = Maze::open(8);
    env.reset();
    assert!(env.step(4).is_err());
}

#[test]
fn test_lander_reset_observation() {
    let mut env = LunarLander::seeded(0);
    let obs = env.reset();
    assert_eq!(obs.len(), 8);
    assert_eq!(env.observation_len(), 8);
    assert_eq!(env.num_actions(), 4);

    // Centered horizontally, legs off the ground, full tank.
    assert_eq!(obs[0], 0.0);
    assert_eq!(obs[6], 0.0);
    assert_eq!(obs[7], 0.0);
    assert_eq!(env.fuel(), 100.0);
}

#[test]
fn test_lander_burns_fuel() {
    let mut env = LunarLander::seeded(1);
    env.reset();

    env.step(2).unwrap();
    assert_eq!(env.fuel(), 99.5);
    env.step(1).unwrap();
    assert!((env.fuel() - 99.2).abs() < 1e-9);

    // A no-op burns nothing.
    let before = env.fuel();
    env.step(0).unwrap();
    assert_eq!(env.fuel(), before);
}

#[test]
fn test_lander_freefall_ends_in_failure() {
    let mut env = LunarLander::seeded(2);
    env.reset();

    let mut terminal_reward = None;
    for _ in 0..1000 {
        let step = env.step(0).unwrap();
        if step.done {
            terminal_reward = Some(step.reward);
            break;
        }
    }

    // Falling with no thrust always ends the episode badly.
    let reward = terminal_reward.expect("freefall episode should terminate");
    assert!(reward <= -50.0);
}

#[test]
fn test_lander_is_deterministic_given_seed() {
    let mut a = LunarLander::seeded(3);
    let mut b = LunarLander::seeded(3);
    assert_eq!(a.reset(), b.reset());

    for i in 0..50 {
        let action = i % 4;
        let step_a = a.step(action).unwrap();
        let step_b = b.step(action).unwrap();
        assert_eq!(step_a.state, step_b.state);
        assert_eq!(step_a.reward, step_b.reward);
        assert_eq!(step_a.done, step_b.done);
    }
}

#[test]
fn test_lander_rejects_invalid_action() {
    let mut env = LunarLander::seeded(4);
    env.reset();
    assert!(env.step(4).is_err());
}
