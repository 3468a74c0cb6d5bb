//! Game Session: selection, turns and the end of the game

mod game;
mod relay;

pub use game::*;
pub use relay::{MoveRelay, NullRelay};
