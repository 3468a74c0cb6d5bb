//! Board State for Xiangqi

mod fen;
mod layout;
mod state;
mod types;

pub use fen::INITIAL_PLACEMENT;
pub use state::Board;
pub use types::*;
