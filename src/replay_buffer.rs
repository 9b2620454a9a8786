use ndarray::Array1;
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::VecDeque;

/// One interaction step recorded by the driver.
///
/// Transitions are immutable once stored; the buffer owns them until they
/// are evicted.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: Array1<f64>,
    pub action: usize,
    pub reward: f64,
    pub next_state: Array1<f64>,
    pub done: bool,
}

/// Fixed-capacity cyclic store of transitions with uniform random sampling.
///
/// Once the buffer is full, pushing evicts the oldest entry. Sampling draws
/// entries independently and uniformly **with replacement**, so any sample
/// size is valid as long as the buffer is non-empty. The "enough memory to
/// train" gate is an agent-level concern, not enforced here.
#[derive(Clone, Debug)]
pub struct ReplayBuffer {
    buffer: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        ReplayBuffer {
            buffer: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest entry at capacity.
    pub fn push(&mut self, transition: Transition) {
        if self.buffer.len() == self.capacity {
            self.buffer.pop_front();
        }
        self.buffer.push_back(transition);
    }

    /// Draw `n` transitions independently and uniformly, with replacement.
    ///
    /// Returns an empty vector when the buffer is empty.
    pub fn sample(&self, n: usize, rng: &mut StdRng) -> Vec<&Transition> {
        if self.buffer.is_empty() {
            return Vec::new();
        }
        (0..n)
            .map(|_| &self.buffer[rng.gen_range(0..self.buffer.len())])
            .collect()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the retained transitions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.buffer.iter()
    }

    /// Drop all stored transitions, keeping the capacity.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
