//! Pseudo-legal destination squares per piece kind.
//!
//! A destination is reachable under the kind's movement rule and does not
//! hold a piece of the mover's side. Whether the move exposes the mover's
//! own general is not considered.

use serde::Serialize;

use super::rules::{Rules, SoldierAdvance};
use crate::board::{Board, Coordinate, Piece, PieceKind, Side};

const ORTHOGONAL: [(i8, i8); 4] = [(0, -1), (0, 1), (1, 0), (-1, 0)];
const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

/// (jump offset, leg offset); the leg is the orthogonal neighbour on the long axis
const HORSE_JUMPS: [((i8, i8), (i8, i8)); 8] = [
    ((1, 2), (0, 1)),
    ((-1, 2), (0, 1)),
    ((1, -2), (0, -1)),
    ((-1, -2), (0, -1)),
    ((2, 1), (1, 0)),
    ((2, -1), (1, 0)),
    ((-2, 1), (-1, 0)),
    ((-2, -1), (-1, 0)),
];

/// A piece together with where it may go
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieceMoves {
    pub piece: Piece,
    pub targets: Vec<Coordinate>,
}

/// Destinations of `piece` on `board` under the default rules
pub fn legal_moves(piece: &Piece, board: &Board) -> Vec<Coordinate> {
    legal_moves_with(piece, board, &Rules::default())
}

/// Destinations of `piece` on `board` under `rules`
pub fn legal_moves_with(piece: &Piece, board: &Board, rules: &Rules) -> Vec<Coordinate> {
    let mut moves = Vec::with_capacity(17);
    let from = piece.position;
    let side = piece.side;

    match piece.kind {
        PieceKind::General => general_moves(board, from, side, &mut moves),
        PieceKind::Advisor => advisor_moves(board, from, side, &mut moves),
        PieceKind::Elephant => elephant_moves(board, from, side, rules, &mut moves),
        PieceKind::Horse => horse_moves(board, from, side, &mut moves),
        PieceKind::Chariot => chariot_moves(board, from, side, &mut moves),
        PieceKind::Cannon => cannon_moves(board, from, side, &mut moves),
        PieceKind::Soldier => soldier_moves(board, from, side, rules, &mut moves),
    }

    moves
}

/// Every piece of `side` that has at least one destination
pub fn moves_for_side(board: &Board, side: Side, rules: &Rules) -> Vec<PieceMoves> {
    board
        .pieces_of(side)
        .filter_map(|piece| {
            let targets = legal_moves_with(piece, board, rules);
            if targets.is_empty() {
                None
            } else {
                Some(PieceMoves {
                    piece: *piece,
                    targets,
                })
            }
        })
        .collect()
}

/// Total number of (piece, destination) pairs for `side`
pub fn count_moves(board: &Board, side: Side, rules: &Rules) -> usize {
    board
        .pieces_of(side)
        .map(|piece| legal_moves_with(piece, board, rules).len())
        .sum()
}

fn can_land(board: &Board, to: Coordinate, side: Side) -> bool {
    board.piece_at(to).map_or(true, |target| target.side != side)
}

fn general_moves(board: &Board, from: Coordinate, side: Side, moves: &mut Vec<Coordinate>) {
    for (dx, dy) in ORTHOGONAL {
        if let Some(to) = from.offset(dx, dy) {
            if to.in_palace(side) && can_land(board, to, side) {
                moves.push(to);
            }
        }
    }
}

fn advisor_moves(board: &Board, from: Coordinate, side: Side, moves: &mut Vec<Coordinate>) {
    for (dx, dy) in DIAGONAL {
        if let Some(to) = from.offset(dx, dy) {
            if to.in_palace(side) && can_land(board, to, side) {
                moves.push(to);
            }
        }
    }
}

fn elephant_moves(
    board: &Board,
    from: Coordinate,
    side: Side,
    rules: &Rules,
    moves: &mut Vec<Coordinate>,
) {
    for (dx, dy) in DIAGONAL {
        let Some(to) = from.offset(dx * 2, dy * 2) else {
            continue;
        };
        if !to.on_own_half(side) || !can_land(board, to, side) {
            continue;
        }
        if rules.elephant_eye {
            let eye_blocked = from.offset(dx, dy).map_or(true, |eye| board.is_occupied(eye));
            if eye_blocked {
                continue;
            }
        }
        moves.push(to);
    }
}

fn horse_moves(board: &Board, from: Coordinate, side: Side, moves: &mut Vec<Coordinate>) {
    for ((dx, dy), (lx, ly)) in HORSE_JUMPS {
        let Some(to) = from.offset(dx, dy) else {
            continue;
        };
        // the leg lies between origin and target, so it is on the board too
        let leg_blocked = from.offset(lx, ly).map_or(true, |leg| board.is_occupied(leg));
        if !leg_blocked && can_land(board, to, side) {
            moves.push(to);
        }
    }
}

fn chariot_moves(board: &Board, from: Coordinate, side: Side, moves: &mut Vec<Coordinate>) {
    for (dx, dy) in ORTHOGONAL {
        let mut current = from;
        while let Some(to) = current.offset(dx, dy) {
            match board.piece_at(to) {
                None => moves.push(to),
                Some(target) => {
                    if target.side != side {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

fn cannon_moves(board: &Board, from: Coordinate, side: Side, moves: &mut Vec<Coordinate>) {
    for (dx, dy) in ORTHOGONAL {
        let mut current = from;
        let mut screened = false;

        while let Some(to) = current.offset(dx, dy) {
            match (board.piece_at(to), screened) {
                (None, false) => moves.push(to),
                (None, true) => {}
                (Some(_), false) => screened = true,
                (Some(target), true) => {
                    if target.side != side {
                        moves.push(to);
                    }
                    break;
                }
            }
            current = to;
        }
    }
}

fn soldier_moves(
    board: &Board,
    from: Coordinate,
    side: Side,
    rules: &Rules,
    moves: &mut Vec<Coordinate>,
) {
    if let Some(ahead) = from.offset(0, side.forward()) {
        let open = match rules.soldier_advance {
            SoldierAdvance::BlockedByOwn => can_land(board, ahead, side),
            SoldierAdvance::BlockedByAny => !board.is_occupied(ahead),
        };
        if open {
            moves.push(ahead);
        }
    }

    if from.has_crossed_river(side) {
        for dx in [-1, 1] {
            if let Some(to) = from.offset(dx, 0) {
                if !board.is_occupied(to) {
                    moves.push(to);
                }
            }
        }
    }
}
