//! The canonical starting layout

use super::state::Board;
use super::types::*;

/// Back rank, left to right from `x = 0`
const BACK_RANK: [PieceKind; 9] = [
    PieceKind::Chariot,
    PieceKind::Horse,
    PieceKind::Elephant,
    PieceKind::Advisor,
    PieceKind::General,
    PieceKind::Advisor,
    PieceKind::Elephant,
    PieceKind::Horse,
    PieceKind::Chariot,
];

const CANNON_FILES: [u8; 2] = [1, 7];
const SOLDIER_FILES: [u8; 5] = [0, 2, 4, 6, 8];

/// Rows of (back rank, cannons, soldiers) for a side
fn home_rows(side: Side) -> (u8, u8, u8) {
    match side {
        Side::Red => (9, 7, 6),
        Side::Black => (0, 2, 3),
    }
}

impl Board {
    /// The 32-piece opening position, Red pieces first
    pub fn initial_layout() -> Board {
        let mut pieces = Vec::with_capacity(32);

        for side in [Side::Red, Side::Black] {
            let (back, cannons, soldiers) = home_rows(side);

            for (x, kind) in (0u8..).zip(BACK_RANK) {
                pieces.extend(Coordinate::new(x, back).map(|at| Piece::new(kind, side, at)));
            }
            for x in CANNON_FILES {
                pieces.extend(
                    Coordinate::new(x, cannons).map(|at| Piece::new(PieceKind::Cannon, side, at)),
                );
            }
            for x in SOLDIER_FILES {
                pieces.extend(
                    Coordinate::new(x, soldiers).map(|at| Piece::new(PieceKind::Soldier, side, at)),
                );
            }
        }

        Board { pieces }
    }
}
