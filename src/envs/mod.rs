//! Built-in environment simulators: dynamics only, no rendering.
//!
//! Each environment owns a seedable RNG; two instances constructed with the
//! same seed produce identical episodes under identical action sequences.

mod cart_pole;
mod lunar_lander;
mod maze;

pub use cart_pole::CartPole;
pub use lunar_lander::LunarLander;
pub use maze::Maze;
