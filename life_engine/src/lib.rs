// lib.rs - Toroidal Game of Life engine

mod concurrent;
mod error;
mod grid;
pub mod patterns;


pub use error::LifeError;
pub use grid::{Grid, FILL_RATIO};
pub use patterns::Pattern;
