use ndarray::{array, Array1};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::env::{Environment, Step};
use crate::error::{PalaestraError, Result};

/// Lunar lander.
///
/// A ship falls under gravity toward a landing pad; the four actions are
/// no-op, left engine (torque right), main engine (thrust along the ship's
/// axis), and right engine (torque left). Engine burns cost fuel and a
/// small reward penalty. Touching the pad with both legs ends the episode,
/// classified by touchdown speed and tilt as a perfect landing (+100), a
/// rough one (+50), or a crash (-100); leaving the play area or hitting the
/// ground legs-first-nowhere-near-the-pad is also a crash. Each surviving
/// step pays +0.1 plus a small bonus for staying above the pad.
#[derive(Debug, Clone)]
pub struct LunarLander {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    angle: f64,
    angular_velocity: f64,
    fuel: f64,
    left_leg_contact: bool,
    right_leg_contact: bool,
    drift_dist: Uniform<f64>,
    spin_dist: Uniform<f64>,
    rng: StdRng,
}

impl LunarLander {
    const WIDTH: f64 = 400.0;
    const HEIGHT: f64 = 300.0;
    const GRAVITY: f64 = 0.15;

    const PAD_Y: f64 = Self::HEIGHT - 30.0;
    const PAD_LEFT: f64 = Self::WIDTH / 2.0 - 40.0;
    const PAD_RIGHT: f64 = Self::WIDTH / 2.0 + 40.0;

    const SHIP_HEIGHT: f64 = 30.0;
    const LEG_SPREAD: f64 = 10.0;

    const INITIAL_FUEL: f64 = 100.0;
    const MAIN_THRUST: f64 = 0.3;
    const SIDE_TORQUE: f64 = 0.05;
    const ANGULAR_DAMPING: f64 = 0.95;
    const BURN_PENALTY: f64 = 0.03;

    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        let mut env = LunarLander {
            x: 0.0,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
            angle: 0.0,
            angular_velocity: 0.0,
            fuel: Self::INITIAL_FUEL,
            left_leg_contact: false,
            right_leg_contact: false,
            drift_dist: Uniform::new(-1.0, 1.0),
            spin_dist: Uniform::new(-0.05, 0.05),
            rng,
        };
        env.reset();
        env
    }

    pub fn fuel(&self) -> f64 {
        self.fuel
    }

    /// Observation: normalized position and velocity, angle over pi,
    /// angular velocity, and the two leg-contact flags.
    fn observation(&self) -> Array1<f64> {
        array![
            (self.x - Self::WIDTH / 2.0) / Self::WIDTH,
            (self.y - Self::HEIGHT / 2.0) / Self::HEIGHT,
            self.vx / 10.0,
            self.vy / 10.0,
            self.angle / std::f64::consts::PI,
            self.angular_velocity,
            if self.left_leg_contact { 1.0 } else { 0.0 },
            if self.right_leg_contact { 1.0 } else { 0.0 },
        ]
    }

    fn on_pad(leg_x: f64, leg_y: f64) -> bool {
        leg_y >= Self::PAD_Y && leg_x >= Self::PAD_LEFT && leg_x <= Self::PAD_RIGHT
    }
}

impl Default for LunarLander {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment for LunarLander {
    fn reset(&mut self) -> Array1<f64> {
        self.x = Self::WIDTH / 2.0;
        self.y = 50.0;
        self.vx = self.drift_dist.sample(&mut self.rng);
        self.vy = 0.0;
        self.angle = 0.0;
        self.angular_velocity = self.spin_dist.sample(&mut self.rng);
        self.fuel = Self::INITIAL_FUEL;
        self.left_leg_contact = false;
        self.right_leg_contact = false;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= self.num_actions() {
            return Err(PalaestraError::InvalidAction {
                action,
                num_actions: self.num_actions(),
            });
        }

        let mut reward = 0.0;

        if self.fuel > 0.0 {
            match action {
                1 => {
                    self.angular_velocity += Self::SIDE_TORQUE;
                    self.fuel -= 0.3;
                    reward -= Self::BURN_PENALTY;
                }
                2 => {
                    self.vx += self.angle.sin() * Self::MAIN_THRUST;
                    self.vy -= self.angle.cos() * Self::MAIN_THRUST;
                    self.fuel -= 0.5;
                    reward -= Self::BURN_PENALTY;
                }
                3 => {
                    self.angular_velocity -= Self::SIDE_TORQUE;
                    self.fuel -= 0.3;
                    reward -= Self::BURN_PENALTY;
                }
                _ => {}
            }
        }

        self.vy += Self::GRAVITY;
        self.x += self.vx;
        self.y += self.vy;
        self.angle += self.angular_velocity;
        self.angular_velocity *= Self::ANGULAR_DAMPING;

        let leg_y = self.y + Self::SHIP_HEIGHT / 2.0;
        let left_leg_x = self.x - self.angle.cos() * Self::LEG_SPREAD;
        let right_leg_x = self.x + self.angle.cos() * Self::LEG_SPREAD;
        self.left_leg_contact = Self::on_pad(left_leg_x, leg_y);
        self.right_leg_contact = Self::on_pad(right_leg_x, leg_y);

        let mut done = false;
        let mut info = Vec::new();

        if self.left_leg_contact && self.right_leg_contact {
            let speed = self.vx.abs() + self.vy.abs();
            let tilt = self.angle.abs();
            if speed < 1.5 && tilt < 0.3 {
                reward += 100.0;
                info.push(("success", "true"));
                info.push(("landing", "perfect"));
            } else if speed < 3.0 && tilt < 0.5 {
                reward += 50.0;
                info.push(("success", "true"));
                info.push(("landing", "rough"));
            } else {
                reward -= 100.0;
                info.push(("success", "false"));
                info.push(("landing", "crash"));
            }
            done = true;
        }

        if self.x < 0.0 || self.x > Self::WIDTH || self.y < 0.0 {
            reward -= 100.0;
            done = true;
            info.push(("success", "false"));
            info.push(("reason", "out_of_bounds"));
        } else if self.y >= Self::HEIGHT - 10.0 && !self.left_leg_contact && !self.right_leg_contact
        {
            reward -= 100.0;
            done = true;
            info.push(("success", "false"));
            info.push(("reason", "crash"));
        }

        if !done {
            reward += 0.1;
            let dist_to_center = (self.x - Self::WIDTH / 2.0).abs();
            reward += (1.0 - dist_to_center / Self::WIDTH) * 0.05;
        }

        let mut step = Step::new(self.observation(), reward, done);
        for (key, value) in info {
            step = step.with_info(key, value);
        }
        Ok(step)
    }

    fn observation_len(&self) -> usize {
        8
    }

    fn num_actions(&self) -> usize {
        4
    }
}
