//! Board State: the pieces on the board and occupancy queries

use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::*;
use crate::error::{Error, Result};

/// The set of pieces on the board.
///
/// Pieces keep their insertion order so that callers iterating the board get
/// a stable order. Equality ignores that order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Piece>", into = "Vec<Piece>")]
pub struct Board {
    pub(super) pieces: Vec<Piece>,
}

impl TryFrom<Vec<Piece>> for Board {
    type Error = Error;

    fn try_from(pieces: Vec<Piece>) -> Result<Self> {
        Board::from_pieces(pieces)
    }
}

impl From<Board> for Vec<Piece> {
    fn from(board: Board) -> Self {
        board.pieces
    }
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a board, rejecting doubled squares and a second general per side
    pub fn from_pieces<I>(pieces: I) -> Result<Self>
    where
        I: IntoIterator<Item = Piece>,
    {
        let mut board = Self::empty();
        for piece in pieces {
            board.place(piece)?;
        }
        Ok(board)
    }

    /// Adds a piece to an empty square
    pub fn place(&mut self, piece: Piece) -> Result<()> {
        if self.is_occupied(piece.position) {
            return Err(Error::Occupied(piece.position));
        }
        if piece.kind == PieceKind::General && self.general(piece.side).is_some() {
            return Err(Error::DuplicateGeneral(piece.side));
        }
        self.pieces.push(piece);
        Ok(())
    }

    pub fn piece_at(&self, at: Coordinate) -> Option<&Piece> {
        self.pieces.iter().find(|p| p.position == at)
    }

    pub fn is_occupied(&self, at: Coordinate) -> bool {
        self.piece_at(at).is_some()
    }

    /// Takes the piece at `at` off the board
    pub fn remove(&mut self, at: Coordinate) -> Option<Piece> {
        let idx = self.index_of(at)?;
        Some(self.pieces.remove(idx))
    }

    /// Moves the piece at `from` to `to`, capturing whatever stands on `to`.
    ///
    /// No legality check happens here. Returns the captured piece, if any.
    /// The board is left untouched when `from` is empty.
    pub fn apply(&mut self, from: Coordinate, to: Coordinate) -> Result<Option<Piece>> {
        if self.index_of(from).is_none() {
            return Err(Error::EmptySquare(from));
        }
        if from == to {
            return Ok(None);
        }

        let captured = self.remove(to);
        // index shifts if the captured piece came before the mover
        let idx = self.index_of(from).ok_or(Error::EmptySquare(from))?;
        self.pieces[idx].position = to;
        Ok(captured)
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(move |p| p.side == side)
    }

    pub fn general(&self, side: Side) -> Option<&Piece> {
        self.pieces_of(side).find(|p| p.kind == PieceKind::General)
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    fn index_of(&self, at: Coordinate) -> Option<usize> {
        self.pieces.iter().position(|p| p.position == at)
    }

    fn sorted(&self) -> Vec<Piece> {
        let mut pieces = self.pieces.clone();
        pieces.sort_by_key(|p| p.position);
        pieces
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.sorted() == other.sorted()
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..BOARD_HEIGHT {
            write!(f, "{} ", y)?;
            for x in 0..BOARD_WIDTH {
                let cell = Coordinate::new(x, y)
                    .and_then(|at| self.piece_at(at))
                    .map(|p| p.fen_letter())
                    .unwrap_or('.');
                write!(f, " {}", cell)?;
            }
            writeln!(f)?;
            if y == 4 {
                writeln!(f, "   ~~~~~~~~~~~~~~~~~")?;
            }
        }
        write!(f, "   0 1 2 3 4 5 6 7 8")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: u8, y: u8) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    #[test]
    fn test_place_rejects_occupied_square() {
        let mut board = Board::empty();
        board
            .place(Piece::new(PieceKind::Horse, Side::Red, c(1, 9)))
            .unwrap();
        let err = board
            .place(Piece::new(PieceKind::Chariot, Side::Black, c(1, 9)))
            .unwrap_err();
        assert!(matches!(err, Error::Occupied(at) if at == c(1, 9)));
    }

    #[test]
    fn test_place_rejects_second_general() {
        let err = Board::from_pieces([
            Piece::new(PieceKind::General, Side::Black, c(4, 0)),
            Piece::new(PieceKind::General, Side::Black, c(4, 1)),
        ])
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateGeneral(Side::Black)));
    }

    #[test]
    fn test_apply_captures_and_relocates() {
        let mut board = Board::from_pieces([
            Piece::new(PieceKind::Soldier, Side::Black, c(0, 3)),
            Piece::new(PieceKind::Chariot, Side::Red, c(0, 9)),
        ])
        .unwrap();

        let captured = board.apply(c(0, 9), c(0, 3)).unwrap();
        assert_eq!(captured.map(|p| p.kind), Some(PieceKind::Soldier));
        assert_eq!(board.len(), 1);
        assert_eq!(board.piece_at(c(0, 3)).map(|p| p.kind), Some(PieceKind::Chariot));
        assert!(board.piece_at(c(0, 9)).is_none());
    }

    #[test]
    fn test_apply_from_empty_square_is_error_and_no_op() {
        let mut board =
            Board::from_pieces([Piece::new(PieceKind::Cannon, Side::Red, c(1, 7))]).unwrap();
        let before = board.clone();

        let err = board.apply(c(5, 5), c(1, 7)).unwrap_err();
        assert!(matches!(err, Error::EmptySquare(_)));
        assert_eq!(board, before);
    }

    #[test]
    fn test_apply_then_inverse_restores_board() {
        let mut board = Board::initial_layout();
        let before = board.clone();

        // mechanical move, no legality check
        let from = c(1, 7);
        let to = c(1, 0);
        let captured = board.apply(from, to).unwrap();
        assert!(captured.is_some());
        assert_ne!(board, before);

        board.apply(to, from).unwrap();
        if let Some(piece) = captured {
            board.place(piece).unwrap();
        }
        assert_eq!(board, before);
    }

    #[test]
    fn test_equality_ignores_order() {
        let a = Piece::new(PieceKind::Advisor, Side::Red, c(3, 9));
        let b = Piece::new(PieceKind::Advisor, Side::Red, c(5, 9));
        assert_eq!(
            Board::from_pieces([a, b]).unwrap(),
            Board::from_pieces([b, a]).unwrap()
        );
    }

    #[test]
    fn test_display_marks_river() {
        let text = Board::initial_layout().to_string();
        assert!(text.starts_with("0  r n b a k a b n r"));
        assert!(text.contains("~~~"));
    }
}
