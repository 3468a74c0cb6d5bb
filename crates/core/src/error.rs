//! Error types for xiangqi-core

use thiserror::Error;

use crate::board::{Coordinate, Side};

#[derive(Error, Debug)]
pub enum Error {
    #[error("no piece at {0}")]
    EmptySquare(Coordinate),

    #[error("square {0} is already occupied")]
    Occupied(Coordinate),

    #[error("{0} already has a general on the board")]
    DuplicateGeneral(Side),

    #[error("coordinate ({x}, {y}) is outside the board")]
    OutOfBounds { x: i64, y: i64 },

    #[error("FEN parsing error: {0}")]
    Fen(String),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
