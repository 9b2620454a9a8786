//! Synchronous episode driver.
//!
//! Runs the standard single-threaded loop: `act`, `step`, `observe`, until
//! the environment terminates the episode or the step cap is hit. The
//! learning engine itself never blocks or suspends; any pacing for
//! visualization belongs to the caller between episodes.

use crate::agent::Agent;
use crate::env::Environment;
use crate::error::Result;
use crate::metrics::ScoreTracker;

/// Outcome of one training episode.
#[derive(Clone, Debug, PartialEq)]
pub struct EpisodeReport {
    /// Steps taken before termination or the step cap.
    pub steps: usize,
    /// Sum of rewards over the episode.
    pub score: f64,
    /// Whether the environment signalled termination (false means the step
    /// cap cut the episode short).
    pub done: bool,
}

/// Drives an agent against an environment, one episode at a time.
pub struct Trainer<A: Agent, E: Environment> {
    pub agent: A,
    pub env: E,
    /// Episodes are cut short after this many steps.
    pub max_episode_steps: usize,
    pub tracker: ScoreTracker,
}

impl<A: Agent, E: Environment> Trainer<A, E> {
    const DEFAULT_STEP_CAP: usize = 500;
    const DEFAULT_HISTORY: usize = 100;

    pub fn new(agent: A, env: E) -> Self {
        Trainer {
            agent,
            env,
            max_episode_steps: Self::DEFAULT_STEP_CAP,
            tracker: ScoreTracker::new(Self::DEFAULT_HISTORY),
        }
    }

    pub fn with_step_cap(mut self, max_episode_steps: usize) -> Self {
        self.max_episode_steps = max_episode_steps;
        self
    }

    /// Run a single episode to termination (or the step cap) and record its
    /// score.
    pub fn run_episode(&mut self) -> Result<EpisodeReport> {
        let mut state = self.env.reset();
        let mut score = 0.0;
        let mut steps = 0;
        let mut done = false;

        while !done && steps < self.max_episode_steps {
            let action = self.agent.act(state.view())?;
            let outcome = self.env.step(action)?;
            self.agent.observe(
                state.view(),
                action,
                outcome.reward,
                outcome.state.view(),
                outcome.done,
            )?;
            score += outcome.reward;
            state = outcome.state;
            done = outcome.done;
            steps += 1;
        }

        self.tracker.record(score);
        Ok(EpisodeReport { steps, score, done })
    }

    /// Run `episodes` episodes back to back.
    pub fn run(&mut self, episodes: usize) -> Result<Vec<EpisodeReport>> {
        (0..episodes).map(|_| self.run_episode()).collect()
    }
}
