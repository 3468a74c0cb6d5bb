//! Xiangqi Core Library

pub mod board;
pub mod error;
pub mod movegen;
pub mod protocol;
pub mod session;

pub use board::{Board, Coordinate, Piece, PieceKind, Side};
pub use error::{Error, Result};
pub use movegen::{legal_moves, legal_moves_with, Rules, SoldierAdvance};
pub use protocol::{GameStateView, MoveMessage, RelayMessage};
pub use session::{GameSession, MoveOutcome, MoveRelay, NullRelay};

/// Basic position information
#[derive(Debug)]
pub struct PositionInfo {
    pub piece_count: u32,
    pub legal_move_count: u32,
    pub side_to_move: Side,
    pub is_game_over: bool,
}

/// Summarizes the position of a session from the side to move's view
pub fn analyze_position(session: &GameSession) -> PositionInfo {
    let board = session.board();
    let side_to_move = session.current_turn();
    let legal_move_count = movegen::count_moves(board, side_to_move, session.rules()) as u32;

    PositionInfo {
        piece_count: board.len() as u32,
        legal_move_count,
        side_to_move,
        is_game_over: session.is_game_over(),
    }
}

/// Creates the standard starting position
pub fn starting_position() -> GameSession {
    GameSession::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_starting_position() {
        let info = analyze_position(&starting_position());
        assert_eq!(info.piece_count, 32);
        assert_eq!(info.side_to_move, Side::Red);
        assert_eq!(info.legal_move_count, 44);
        assert!(!info.is_game_over);
    }
}
