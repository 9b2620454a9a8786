//! # Palaestra - A Small Reinforcement Learning Engine
//!
//! Palaestra is a self-contained learning engine for watching simple
//! value-based agents train against small simulated environments. The
//! neural function approximator is written from scratch: a two-layer
//! perceptron with manual batch backpropagation, no autograd, no BLAS
//! backend beyond ndarray itself. Given a fixed seed and fixed
//! hyperparameters, training is fully reproducible.
//!
//! ## What's inside
//!
//! - **Q-network**: input -> hidden ReLU -> linear output, with a frozen
//!   target-parameter snapshot for stable bootstrapped targets
//! - **Experience replay**: fixed-capacity FIFO buffer with uniform
//!   sampling
//! - **DQN agent**: epsilon-greedy policy, masked TD targets, scheduled
//!   target-network syncs
//! - **Tabular Q-learning agent**: sparse action-value table over
//!   discretized states
//! - **Environments**: cart-pole, grid maze, and lunar lander dynamics
//!   (simulation only; rendering belongs to the driver)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use palaestra::agent::DqnAgentBuilder;
//! use palaestra::envs::CartPole;
//! use palaestra::trainer::Trainer;
//!
//! let agent = DqnAgentBuilder::new()
//!     .input_size(4)
//!     .hidden_size(128)
//!     .output_size(2)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let mut trainer = Trainer::new(agent, CartPole::seeded(7));
//! let report = trainer.run_episode().unwrap();
//! println!("episode lasted {} steps, score {}", report.steps, report.score);
//! ```
//!
//! ## Module Organization
//!
//! - [`agent`] - DQN and tabular Q-learning agents
//! - [`config`] - Hyperparameter sets with sensible defaults
//! - [`env`] - The environment contract agents are driven against
//! - [`envs`] - Built-in environment simulators
//! - [`error`] - Error types and result handling
//! - [`metrics`] - Episode score tracking
//! - [`network`] - The two-layer Q-network with manual backpropagation
//! - [`replay_buffer`] - Experience replay for decorrelated updates
//! - [`trainer`] - Synchronous episode driver

pub mod agent;
pub mod config;
pub mod env;
pub mod envs;
pub mod error;
pub mod metrics;
pub mod network;
pub mod replay_buffer;
pub mod trainer;

#[cfg(test)]
mod tests;
