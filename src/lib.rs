//! Puzzle logic for the n-Queens game.
//!
//! The player drops queens on an `n × n` board; every tile a queen attacks is
//! dotted out and can no longer be used. The board is solved once it holds
//! `n` queens, and the game ends as soon as no empty tile is left.

pub mod game;
pub mod grid;
pub mod hash;
pub mod settings;
pub mod timer;

pub use game::{ClickOutcome, Game, GameOverReport};
pub use grid::{Grid, GridError, TileState};
pub use settings::Settings;
