use ndarray::{array, Array1};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::env::{Environment, Step};
use crate::error::{PalaestraError, Result};

/// Pole-balancing cart.
///
/// A pole is hinged to a cart sliding on a frictionless track; the two
/// actions push the cart left or right. The episode ends when the pole
/// tips past 12 degrees or the cart leaves the track. Reward is 1.0 per
/// step, including the terminating step; stepping past termination yields
/// 0.0.
#[derive(Debug, Clone)]
pub struct CartPole {
    x: f64,
    x_dot: f64,
    theta: f64,
    theta_dot: f64,
    steps_beyond_done: Option<usize>,
    dist: Uniform<f64>,
    rng: StdRng,
}

impl CartPole {
    const GRAVITY: f64 = 9.8;
    const MASS_CART: f64 = 1.0;
    const MASS_POLE: f64 = 0.1;
    const TOTAL_MASS: f64 = Self::MASS_CART + Self::MASS_POLE;
    /// Half the pole length.
    const LENGTH: f64 = 0.5;
    const POLE_MASS_LENGTH: f64 = Self::MASS_POLE * Self::LENGTH;
    const FORCE_MAG: f64 = 10.0;
    /// Seconds between state updates (Euler integration step).
    const TAU: f64 = 0.02;
    const THETA_THRESHOLD_RADIANS: f64 = 12.0 * 2.0 * std::f64::consts::PI / 360.0;
    const X_THRESHOLD: f64 = 2.4;

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut env = CartPole {
            x: 0.0,
            x_dot: 0.0,
            theta: 0.0,
            theta_dot: 0.0,
            steps_beyond_done: None,
            dist: Uniform::new(-0.05, 0.05),
            rng,
        };
        env.reset();
        env
    }

    fn observation(&self) -> Array1<f64> {
        array![self.x, self.x_dot, self.theta, self.theta_dot]
    }

    fn failed(&self) -> bool {
        self.x < -Self::X_THRESHOLD
            || self.x > Self::X_THRESHOLD
            || self.theta < -Self::THETA_THRESHOLD_RADIANS
            || self.theta > Self::THETA_THRESHOLD_RADIANS
    }
}

impl Default for CartPole {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for CartPole {
    fn reset(&mut self) -> Array1<f64> {
        self.x = self.dist.sample(&mut self.rng);
        self.x_dot = 0.0;
        self.theta = self.dist.sample(&mut self.rng);
        self.theta_dot = 0.0;
        self.steps_beyond_done = None;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= self.num_actions() {
            return Err(PalaestraError::InvalidAction {
                action,
                num_actions: self.num_actions(),
            });
        }

        let force = if action == 1 { Self::FORCE_MAG } else { -Self::FORCE_MAG };
        let cos_theta = self.theta.cos();
        let sin_theta = self.theta.sin();

        let temp = (force + Self::POLE_MASS_LENGTH * self.theta_dot * self.theta_dot * sin_theta)
            / Self::TOTAL_MASS;
        let theta_acc = (Self::GRAVITY * sin_theta - cos_theta * temp)
            / (Self::LENGTH
                * (4.0 / 3.0 - Self::MASS_POLE * cos_theta * cos_theta / Self::TOTAL_MASS));
        let x_acc = temp - Self::POLE_MASS_LENGTH * theta_acc * cos_theta / Self::TOTAL_MASS;

        self.x += Self::TAU * self.x_dot;
        self.x_dot += Self::TAU * x_acc;
        self.theta += Self::TAU * self.theta_dot;
        self.theta_dot += Self::TAU * theta_acc;

        if !self.failed() {
            self.steps_beyond_done = None;
            return Ok(Step::new(self.observation(), 1.0, false));
        }
        match self.steps_beyond_done {
            None => {
                self.steps_beyond_done = Some(0);
                Ok(Step::new(self.observation(), 1.0, true))
            }
            Some(n) => {
                self.steps_beyond_done = Some(n + 1);
                Ok(Step::new(self.observation(), 0.0, true))
            }
        }
    }

    fn observation_len(&self) -> usize {
        4
    }

    fn num_actions(&self) -> usize {
        2
    }
}
