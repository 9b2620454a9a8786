use ndarray::{Array1, Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::agent::{argmax, Agent};
use crate::config::DqnConfig;
use crate::error::{PalaestraError, Result};
use crate::network::{NetworkParameters, QNetwork};
use crate::replay_buffer::{ReplayBuffer, Transition};

/// Deep Q-Network agent.
///
/// Orchestrates the Q-network, the experience replay memory, the
/// epsilon-greedy policy, and the target-network sync schedule. Training
/// moves through three phases driven purely by counters: collecting (the
/// memory is below `min_memory_size`, [`replay`](DqnAgent::replay) is a
/// no-op), warming (training runs but epsilon does not decay yet), and
/// normal training with active epsilon decay.
///
/// # Example
///
/// ```rust,no_run
/// use palaestra::agent::DqnAgentBuilder;
/// use ndarray::array;
///
/// let mut agent = DqnAgentBuilder::new()
///     .input_size(4)
///     .hidden_size(128)
///     .output_size(2)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// let state = array![0.1, -0.2, 0.3, -0.1];
/// let action = agent.act(state.view()).unwrap();
///
/// // After the environment step...
/// let next_state = array![0.15, -0.25, 0.35, -0.05];
/// agent.remember(state.view(), action, 1.0, next_state.view(), false).unwrap();
/// agent.replay().unwrap();
/// ```
pub struct DqnAgent {
    /// Live and target Q-value approximator.
    pub network: QNetwork,

    /// Experience replay memory.
    pub memory: ReplayBuffer,

    /// Current exploration probability.
    pub epsilon: f64,

    /// Number of completed training steps; gates the epsilon decay warm-up.
    pub training_step: usize,

    /// Counter for the target-network sync schedule.
    pub step_count: usize,

    config: DqnConfig,
    rng: StdRng,
}

impl DqnAgent {
    /// Create an agent with an entropy-seeded RNG.
    pub fn new(input_size: usize, hidden_size: usize, output_size: usize, config: DqnConfig) -> Self {
        Self::with_rng(input_size, hidden_size, output_size, config, StdRng::from_entropy())
    }

    /// Create an agent with a fixed seed; training is then reproducible.
    pub fn seeded(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        config: DqnConfig,
        seed: u64,
    ) -> Self {
        Self::with_rng(input_size, hidden_size, output_size, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(
        input_size: usize,
        hidden_size: usize,
        output_size: usize,
        config: DqnConfig,
        mut rng: StdRng,
    ) -> Self {
        let network = QNetwork::new(input_size, hidden_size, output_size, &mut rng);
        let memory = ReplayBuffer::new(config.memory_capacity);
        let epsilon = config.epsilon;
        DqnAgent {
            network,
            memory,
            epsilon,
            training_step: 0,
            step_count: 0,
            config,
            rng,
        }
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn num_actions(&self) -> usize {
        self.network.output_size()
    }

    /// Epsilon-greedy action selection: with probability epsilon a uniformly
    /// random action, otherwise the argmax of the live network's Q-values
    /// (ties break toward the lowest index).
    pub fn act(&mut self, state: ArrayView1<f64>) -> Result<usize> {
        if state.len() != self.network.input_size() {
            return Err(PalaestraError::dimension_mismatch(
                format!("state of length {}", self.network.input_size()),
                format!("length {}", state.len()),
            ));
        }
        if self.rng.gen::<f64>() < self.epsilon {
            return Ok(self.rng.gen_range(0..self.num_actions()));
        }
        let q_values = self.network.predict(state)?;
        Ok(argmax(&q_values))
    }

    /// Store one transition in the replay memory, applying the configured
    /// reward scaling first.
    pub fn remember(
        &mut self,
        state: ArrayView1<f64>,
        action: usize,
        reward: f64,
        next_state: ArrayView1<f64>,
        done: bool,
    ) -> Result<()> {
        let input_size = self.network.input_size();
        if state.len() != input_size || next_state.len() != input_size {
            return Err(PalaestraError::dimension_mismatch(
                format!("states of length {}", input_size),
                format!("lengths {} and {}", state.len(), next_state.len()),
            ));
        }
        if action >= self.num_actions() {
            return Err(PalaestraError::InvalidAction {
                action,
                num_actions: self.num_actions(),
            });
        }
        let reward = match self.config.reward_scale {
            Some(scale) => reward * scale,
            None => reward,
        };
        self.memory.push(Transition {
            state: state.to_owned(),
            action,
            reward,
            next_state: next_state.to_owned(),
            done,
        });
        Ok(())
    }

    /// One training step: sample a batch, regress the live network against
    /// masked TD targets, advance the counters.
    ///
    /// Returns `None` while the memory is still below `min_memory_size`
    /// (the expected steady state before warm-up), otherwise the batch loss.
    ///
    /// Each target vector starts from the live network's own prediction for
    /// the sampled state, so every action except the taken one contributes
    /// exactly zero gradient; the taken action's component is replaced by
    /// `reward + gamma * max_a Q_target(next_state, a)` (or just the reward
    /// on terminal transitions).
    pub fn replay(&mut self) -> Result<Option<f64>> {
        if self.memory.len() < self.config.min_memory_size {
            return Ok(None);
        }

        let batch = self.memory.sample(self.config.batch_size, &mut self.rng);
        let batch_size = batch.len();
        let input_size = self.network.input_size();
        let num_actions = self.network.output_size();

        let mut states = Array2::zeros((batch_size, input_size));
        let mut targets = Array2::zeros((batch_size, num_actions));
        for (i, transition) in batch.iter().enumerate() {
            let mut target = self.network.forward(transition.state.view(), false)?.output;
            let bootstrap = if transition.done {
                0.0
            } else {
                let next_q = self.network.forward(transition.next_state.view(), true)?.output;
                self.config.gamma * next_q.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v))
            };
            target[transition.action] = transition.reward + bootstrap;
            states.row_mut(i).assign(&transition.state);
            targets.row_mut(i).assign(&target);
        }

        let loss = self.network.train_batch(
            states.view(),
            targets.view(),
            self.config.learning_rate,
            self.config.gradient_clip,
        )?;

        self.training_step += 1;
        if self.training_step > self.config.warm_up_steps && self.epsilon > self.config.epsilon_min {
            self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.epsilon_min);
        }

        self.step_count += 1;
        if self.step_count % self.config.update_target_freq == 0 {
            self.network.sync_target();
        }

        Ok(Some(loss))
    }

    /// Snapshot the live parameters and exploration state.
    pub fn save(&self) -> DqnModel {
        let p = &self.network.params;
        DqnModel {
            weights1: p.weights1.clone(),
            bias1: p.bias1.clone(),
            weights2: p.weights2.clone(),
            bias2: p.bias2.clone(),
            epsilon: self.epsilon,
        }
    }

    /// Restore a snapshot. Rejects mismatched shapes before touching any
    /// live state, and re-syncs the target network so it cannot be staler
    /// than the restored parameters.
    pub fn load(&mut self, model: &DqnModel) -> Result<()> {
        let (i, h, o) = (
            self.network.input_size(),
            self.network.hidden_size(),
            self.network.output_size(),
        );
        if model.weights1.dim() != (i, h)
            || model.bias1.len() != h
            || model.weights2.dim() != (h, o)
            || model.bias2.len() != o
        {
            return Err(PalaestraError::SerializationError(format!(
                "model shapes do not fit a {}x{}x{} network",
                i, h, o
            )));
        }
        self.network.params = NetworkParameters {
            weights1: model.weights1.clone(),
            bias1: model.bias1.clone(),
            weights2: model.weights2.clone(),
            bias2: model.bias2.clone(),
        };
        self.network.sync_target();
        self.epsilon = model.epsilon;
        Ok(())
    }
}

impl Agent for DqnAgent {
    fn act(&mut self, state: ArrayView1<f64>) -> Result<usize> {
        DqnAgent::act(self, state)
    }

    fn observe(
        &mut self,
        state: ArrayView1<f64>,
        action: usize,
        reward: f64,
        next_state: ArrayView1<f64>,
        done: bool,
    ) -> Result<()> {
        self.remember(state, action, reward, next_state, done)?;
        self.replay()?;
        Ok(())
    }
}

/// Persisted form of a DQN agent: the live parameters plus epsilon.
///
/// The payload is pure data; writing it to disk (and choosing a format for
/// the file) is the driver's concern. [`to_json`](DqnModel::to_json) and
/// [`to_bytes`](DqnModel::to_bytes) cover the two formats drivers use.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DqnModel {
    pub weights1: Array2<f64>,
    pub bias1: Array1<f64>,
    pub weights2: Array2<f64>,
    pub bias2: Array1<f64>,
    pub epsilon: f64,
}

impl DqnModel {
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

/// Builder for [`DqnAgent`].
pub struct DqnAgentBuilder {
    input_size: Option<usize>,
    hidden_size: usize,
    output_size: Option<usize>,
    config: DqnConfig,
    seed: Option<u64>,
}

impl DqnAgentBuilder {
    pub fn new() -> Self {
        DqnAgentBuilder {
            input_size: None,
            hidden_size: 128,
            output_size: None,
            config: DqnConfig::default(),
            seed: None,
        }
    }

    pub fn input_size(mut self, size: usize) -> Self {
        self.input_size = Some(size);
        self
    }

    pub fn hidden_size(mut self, size: usize) -> Self {
        self.hidden_size = size;
        self
    }

    pub fn output_size(mut self, size: usize) -> Self {
        self.output_size = Some(size);
        self
    }

    /// Replace the whole hyperparameter set at once.
    pub fn config(mut self, config: DqnConfig) -> Self {
        self.config = config;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn gamma(mut self, gamma: f64) -> Self {
        self.config.gamma = gamma;
        self
    }

    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    pub fn epsilon_decay(mut self, decay: f64) -> Self {
        self.config.epsilon_decay = decay;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    pub fn update_target_freq(mut self, freq: usize) -> Self {
        self.config.update_target_freq = freq;
        self
    }

    pub fn reward_scale(mut self, scale: f64) -> Self {
        self.config.reward_scale = Some(scale);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn build(self) -> Result<DqnAgent> {
        let input_size = self.input_size.ok_or_else(|| {
            PalaestraError::invalid_parameter("input_size", "must be specified")
        })?;
        let output_size = self.output_size.ok_or_else(|| {
            PalaestraError::invalid_parameter("output_size", "must be specified")
        })?;
        if input_size == 0 || self.hidden_size == 0 || output_size == 0 {
            return Err(PalaestraError::invalid_parameter(
                "layer sizes",
                "must all be greater than 0",
            ));
        }

        let c = &self.config;
        if c.learning_rate <= 0.0 {
            return Err(PalaestraError::invalid_parameter(
                "learning_rate",
                "must be positive",
            ));
        }
        if !(c.gamma > 0.0 && c.gamma < 1.0) {
            return Err(PalaestraError::invalid_parameter(
                "gamma",
                "must be in (0, 1)",
            ));
        }
        if !(c.epsilon_decay > 0.0 && c.epsilon_decay < 1.0) {
            return Err(PalaestraError::invalid_parameter(
                "epsilon_decay",
                "must be in (0, 1)",
            ));
        }
        if !(c.epsilon >= c.epsilon_min && c.epsilon <= 1.0) {
            return Err(PalaestraError::invalid_parameter(
                "epsilon",
                "must be in [epsilon_min, 1]",
            ));
        }
        if c.batch_size == 0 || c.memory_capacity == 0 || c.update_target_freq == 0 {
            return Err(PalaestraError::invalid_parameter(
                "batch_size/memory_capacity/update_target_freq",
                "must all be greater than 0",
            ));
        }
        if c.gradient_clip <= 0.0 {
            return Err(PalaestraError::invalid_parameter(
                "gradient_clip",
                "must be positive",
            ));
        }

        Ok(match self.seed {
            Some(seed) => DqnAgent::seeded(input_size, self.hidden_size, output_size, self.config, seed),
            None => DqnAgent::new(input_size, self.hidden_size, output_size, self.config),
        })
    }
}

impl Default for DqnAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
