use ndarray::{array, Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;

use crate::env::{Environment, Step};
use crate::error::{PalaestraError, Result};

const ACTIONS: [(i64, i64); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)]; // up, right, down, left

/// Grid maze with random interior walls.
///
/// The agent starts in the top-left playable cell and must reach the
/// bottom-right playable cell. Moving costs -0.01 per step, bumping a wall
/// or the border costs -1.0 (the agent stays put), and the goal pays +10.0
/// and ends the episode. The observation is the agent's `[x, y]` cell.
///
/// Wall layout is drawn once at construction (regenerated until a path from
/// start to goal exists) and stays fixed across resets.
#[derive(Debug, Clone)]
pub struct Maze {
    size: usize,
    /// `walls[[y, x]]` is true for blocked cells.
    walls: Array2<bool>,
    start: (usize, usize),
    goal: (usize, usize),
    agent: (usize, usize),
}

impl Maze {
    const WALL_DENSITY: f64 = 0.2;
    const GENERATION_ATTEMPTS: usize = 32;

    /// Maze with the default wall density and an entropy-seeded layout.
    pub fn new(size: usize) -> Self {
        Self::generate(size, Self::WALL_DENSITY, StdRng::from_entropy())
    }

    /// Maze with the default wall density and a reproducible layout.
    pub fn seeded(size: usize, seed: u64) -> Self {
        Self::generate(size, Self::WALL_DENSITY, StdRng::seed_from_u64(seed))
    }

    /// Maze without interior walls (only the border).
    pub fn open(size: usize) -> Self {
        Self::generate(size, 0.0, StdRng::seed_from_u64(0))
    }

    fn generate(size: usize, wall_density: f64, mut rng: StdRng) -> Self {
        assert!(size >= 4, "maze needs room for interior cells");
        let start = (1, 1);
        let goal = (size - 2, size - 2);

        let mut maze = Maze {
            size,
            walls: Array2::from_elem((size, size), false),
            start,
            goal,
            agent: start,
        };
        for _ in 0..Self::GENERATION_ATTEMPTS {
            maze.walls = Self::draw_walls(size, wall_density, start, goal, &mut rng);
            if maze.shortest_path_len().is_some() {
                return maze;
            }
        }
        // A solvable layout never came up; fall back to an open grid.
        maze.walls = Self::draw_walls(size, 0.0, start, goal, &mut rng);
        maze
    }

    fn draw_walls(
        size: usize,
        wall_density: f64,
        start: (usize, usize),
        goal: (usize, usize),
        rng: &mut StdRng,
    ) -> Array2<bool> {
        let mut walls = Array2::from_elem((size, size), false);
        for y in 0..size {
            for x in 0..size {
                if x == 0 || x == size - 1 || y == 0 || y == size - 1 {
                    walls[[y, x]] = true;
                } else if rng.gen::<f64>() < wall_density {
                    walls[[y, x]] = true;
                }
            }
        }
        walls[[start.1, start.0]] = false;
        walls[[goal.1, goal.0]] = false;
        walls
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start(&self) -> (usize, usize) {
        self.start
    }

    pub fn goal(&self) -> (usize, usize) {
        self.goal
    }

    pub fn is_wall(&self, x: usize, y: usize) -> bool {
        self.walls[[y, x]]
    }

    fn observation(&self) -> Array1<f64> {
        array![self.agent.0 as f64, self.agent.1 as f64]
    }

    /// Length of the shortest start-to-goal path (in steps), if one exists.
    pub fn shortest_path_len(&self) -> Option<usize> {
        let mut visited = Array2::from_elem((self.size, self.size), false);
        let mut queue = VecDeque::new();
        queue.push_back((self.start, 0));
        visited[[self.start.1, self.start.0]] = true;

        while let Some(((x, y), dist)) = queue.pop_front() {
            if (x, y) == self.goal {
                return Some(dist);
            }
            for (dx, dy) in ACTIONS {
                let nx = x as i64 + dx;
                let ny = y as i64 + dy;
                if nx < 0 || ny < 0 || nx >= self.size as i64 || ny >= self.size as i64 {
                    continue;
                }
                let (nx, ny) = (nx as usize, ny as usize);
                if !visited[[ny, nx]] && !self.walls[[ny, nx]] {
                    visited[[ny, nx]] = true;
                    queue.push_back(((nx, ny), dist + 1));
                }
            }
        }
        None
    }
}

impl Environment for Maze {
    fn reset(&mut self) -> Array1<f64> {
        self.agent = self.start;
        self.observation()
    }

    fn step(&mut self, action: usize) -> Result<Step> {
        if action >= self.num_actions() {
            return Err(PalaestraError::InvalidAction {
                action,
                num_actions: self.num_actions(),
            });
        }

        let (dx, dy) = ACTIONS[action];
        let new_x = self.agent.0 as i64 + dx;
        let new_y = self.agent.1 as i64 + dy;

        let blocked = new_x < 0
            || new_y < 0
            || new_x >= self.size as i64
            || new_y >= self.size as i64
            || self.walls[[new_y as usize, new_x as usize]];
        if blocked {
            return Ok(Step::new(self.observation(), -1.0, false).with_info("hit_wall", "true"));
        }

        self.agent = (new_x as usize, new_y as usize);
        if self.agent == self.goal {
            return Ok(Step::new(self.observation(), 10.0, true).with_info("success", "true"));
        }
        Ok(Step::new(self.observation(), -0.01, false))
    }

    fn observation_len(&self) -> usize {
        2
    }

    fn num_actions(&self) -> usize {
        4
    }
}
