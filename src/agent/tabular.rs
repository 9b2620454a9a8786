use ndarray::{Array1, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::agent::{argmax, Agent};
use crate::config::TabularConfig;
use crate::error::{PalaestraError, Result};

/// Tabular Q-learning agent.
///
/// Keeps a sparse table of action-values keyed by the discretized state:
/// each observation is mapped to its exact tuple of integer coordinates, so
/// this agent fits environments with small discrete state spaces (a grid
/// maze); continuous observations must be discretized externally first.
///
/// Rows are created lazily: the first access to an unseen key inserts a
/// zero vector. The table grows monotonically over the agent's lifetime.
///
/// Epsilon decays on every [`update`](TabularQLearningAgent::update) call,
/// with no warm-up gate. The DQN agent gates its decay behind a warm-up
/// threshold instead; the two schedules differ on purpose.
pub struct TabularQLearningAgent {
    num_actions: usize,
    /// Current exploration probability.
    pub epsilon: f64,
    config: TabularConfig,
    q_table: HashMap<Vec<i64>, Array1<f64>>,
    rng: StdRng,
}

/// Round each coordinate to its integer grid cell.
fn state_key(state: ArrayView1<f64>) -> Vec<i64> {
    state.iter().map(|&v| v.round() as i64).collect()
}

impl TabularQLearningAgent {
    /// Create an agent with an entropy-seeded RNG.
    pub fn new(num_actions: usize, config: TabularConfig) -> Self {
        Self::with_rng(num_actions, config, StdRng::from_entropy())
    }

    /// Create an agent with a fixed seed; action selection is then
    /// reproducible.
    pub fn seeded(num_actions: usize, config: TabularConfig, seed: u64) -> Self {
        Self::with_rng(num_actions, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(num_actions: usize, config: TabularConfig, rng: StdRng) -> Self {
        let epsilon = config.epsilon;
        TabularQLearningAgent {
            num_actions,
            epsilon,
            config,
            q_table: HashMap::new(),
            rng,
        }
    }

    pub fn config(&self) -> &TabularConfig {
        &self.config
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    /// Action-value row for a state, inserting a zero vector on first access.
    pub fn q_values_mut(&mut self, state: ArrayView1<f64>) -> &mut Array1<f64> {
        let num_actions = self.num_actions;
        self.q_table
            .entry(state_key(state))
            .or_insert_with(|| Array1::zeros(num_actions))
    }

    /// Epsilon-greedy action selection over the state's action-value row
    /// (ties break toward the lowest index).
    pub fn act(&mut self, state: ArrayView1<f64>) -> Result<usize> {
        if self.rng.gen::<f64>() < self.epsilon {
            return Ok(self.rng.gen_range(0..self.num_actions));
        }
        Ok(self.best_action(state))
    }

    /// Greedy action for a state, lazily initializing its row.
    pub fn best_action(&mut self, state: ArrayView1<f64>) -> usize {
        argmax(self.q_values_mut(state))
    }

    /// One TD(0) update, followed by the unconditional epsilon decay.
    pub fn update(
        &mut self,
        state: ArrayView1<f64>,
        action: usize,
        reward: f64,
        next_state: ArrayView1<f64>,
        done: bool,
    ) -> Result<()> {
        if action >= self.num_actions {
            return Err(PalaestraError::InvalidAction {
                action,
                num_actions: self.num_actions,
            });
        }

        let target = if done {
            reward
        } else {
            let next_max = self
                .q_values_mut(next_state)
                .iter()
                .fold(f64::NEG_INFINITY, |m, &v| m.max(v));
            reward + self.config.gamma * next_max
        };

        let learning_rate = self.config.learning_rate;
        let q = &mut self.q_values_mut(state)[action];
        *q += learning_rate * (target - *q);

        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
        Ok(())
    }

    /// Summary statistics over the table, for dashboards and diagnostics.
    pub fn stats(&self) -> QTableStats {
        let mut max_q = f64::NEG_INFINITY;
        let mut min_q = f64::INFINITY;
        let mut total_values = 0;
        for values in self.q_table.values() {
            total_values += values.len();
            for &q in values.iter() {
                max_q = max_q.max(q);
                min_q = min_q.min(q);
            }
        }
        QTableStats {
            states: self.q_table.len(),
            total_values,
            max_q,
            min_q,
            epsilon: self.epsilon,
        }
    }

    /// Snapshot the full table and hyperparameters.
    ///
    /// Keys are rendered as comma-joined coordinate strings and sorted so
    /// the payload is reproducible.
    pub fn save(&self) -> QLearningModel {
        let mut keys: Vec<&Vec<i64>> = self.q_table.keys().collect();
        keys.sort();
        let q_table = keys
            .into_iter()
            .map(|key| {
                let rendered = key
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                (rendered, self.q_table[key].to_vec())
            })
            .collect();
        QLearningModel {
            q_table,
            learning_rate: self.config.learning_rate,
            gamma: self.config.gamma,
            epsilon: self.epsilon,
            epsilon_decay: self.config.epsilon_decay,
            epsilon_min: self.config.epsilon_min,
        }
    }

    /// Restore a snapshot: every key, every component, plus hyperparameters.
    ///
    /// The whole payload is parsed and validated before any live state is
    /// replaced; a malformed key or a wrong-length value row leaves the
    /// agent untouched.
    pub fn load(&mut self, model: &QLearningModel) -> Result<()> {
        let mut q_table = HashMap::with_capacity(model.q_table.len());
        for (rendered, values) in &model.q_table {
            let key = rendered
                .split(',')
                .map(|c| {
                    c.parse::<i64>().map_err(|_| {
                        PalaestraError::SerializationError(format!(
                            "malformed state key '{}'",
                            rendered
                        ))
                    })
                })
                .collect::<Result<Vec<i64>>>()?;
            if values.len() != self.num_actions {
                return Err(PalaestraError::SerializationError(format!(
                    "state '{}' has {} action-values, agent expects {}",
                    rendered,
                    values.len(),
                    self.num_actions
                )));
            }
            q_table.insert(key, Array1::from_vec(values.clone()));
        }

        self.q_table = q_table;
        self.config.learning_rate = model.learning_rate;
        self.config.gamma = model.gamma;
        self.config.epsilon_decay = model.epsilon_decay;
        self.config.epsilon_min = model.epsilon_min;
        self.epsilon = model.epsilon;
        Ok(())
    }
}

impl Agent for TabularQLearningAgent {
    fn act(&mut self, state: ArrayView1<f64>) -> Result<usize> {
        TabularQLearningAgent::act(self, state)
    }

    fn observe(
        &mut self,
        state: ArrayView1<f64>,
        action: usize,
        reward: f64,
        next_state: ArrayView1<f64>,
        done: bool,
    ) -> Result<()> {
        self.update(state, action, reward, next_state, done)
    }
}

/// Summary of a Q-table's contents.
#[derive(Clone, Debug, PartialEq)]
pub struct QTableStats {
    pub states: usize,
    pub total_values: usize,
    pub max_q: f64,
    pub min_q: f64,
    pub epsilon: f64,
}

/// Persisted form of a tabular agent: the full key/value table plus
/// hyperparameters. Round-trips exactly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QLearningModel {
    pub q_table: Vec<(String, Vec<f64>)>,
    pub learning_rate: f64,
    pub gamma: f64,
    pub epsilon: f64,
    pub epsilon_decay: f64,
    pub epsilon_min: f64,
}

impl QLearningModel {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(payload: &str) -> Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(payload: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(payload)?)
    }
}
