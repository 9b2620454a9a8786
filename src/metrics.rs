//! Episode score tracking for dashboards and progress reporting.

use std::collections::VecDeque;

/// Rolling record of per-episode scores.
///
/// Keeps the most recent `history_size` scores for averaging and charting;
/// the best score is tracked across the whole run regardless of history
/// eviction.
#[derive(Debug, Clone)]
pub struct ScoreTracker {
    scores: VecDeque<f64>,
    history_size: usize,
    episodes: usize,
    best: Option<f64>,
}

impl ScoreTracker {
    pub fn new(history_size: usize) -> Self {
        ScoreTracker {
            scores: VecDeque::with_capacity(history_size),
            history_size,
            episodes: 0,
            best: None,
        }
    }

    pub fn record(&mut self, score: f64) {
        if self.scores.len() >= self.history_size {
            self.scores.pop_front();
        }
        self.scores.push_back(score);
        self.episodes += 1;
        self.best = Some(match self.best {
            Some(best) => best.max(score),
            None => score,
        });
    }

    /// Total episodes recorded, including those evicted from history.
    pub fn episodes(&self) -> usize {
        self.episodes
    }

    /// Best score over the whole run.
    pub fn best(&self) -> Option<f64> {
        self.best
    }

    pub fn scores(&self) -> impl Iterator<Item = f64> + '_ {
        self.scores.iter().copied()
    }

    /// Mean of the retained history.
    pub fn average(&self) -> f64 {
        if self.scores.is_empty() {
            return 0.0;
        }
        self.scores.iter().sum::<f64>() / self.scores.len() as f64
    }

    /// Mean of the last `n` retained scores.
    pub fn recent_average(&self, n: usize) -> f64 {
        if self.scores.is_empty() || n == 0 {
            return 0.0;
        }
        let take = n.min(self.scores.len());
        self.scores.iter().rev().take(take).sum::<f64>() / take as f64
    }

    /// Retained scores rescaled to `[0, 1]` for charting.
    ///
    /// A flat history has zero range; it is normalized against a range of 1
    /// instead of dividing by zero.
    pub fn normalized(&self) -> Vec<f64> {
        if self.scores.is_empty() {
            return Vec::new();
        }
        let max = self.scores.iter().fold(f64::NEG_INFINITY, |m, &v| m.max(v));
        let min = self.scores.iter().fold(f64::INFINITY, |m, &v| m.min(v));
        let range = if max - min > 0.0 { max - min } else { 1.0 };
        self.scores.iter().map(|&s| (s - min) / range).collect()
    }
}
