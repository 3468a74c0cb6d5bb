//! Move generation for each piece kind

mod generator;
mod rules;

pub use generator::{count_moves, legal_moves, legal_moves_with, moves_for_side, PieceMoves};
pub use rules::{Rules, SoldierAdvance};
