//! FEN piece placement for boards.
//!
//! Ranks are written from Black's back rank (`y = 0`) down to Red's
//! (`y = 9`), separated by `/`. Digits count empty points, letters are
//! `k a b n r c p` with Red in uppercase.

use super::state::Board;
use super::types::*;
use crate::error::{Error, Result};

pub const INITIAL_PLACEMENT: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR";

impl Board {
    pub fn from_fen(placement: &str) -> Result<Board> {
        let ranks: Vec<&str> = placement.trim().split('/').collect();
        if ranks.len() != BOARD_HEIGHT as usize {
            return Err(Error::Fen(format!(
                "expected {} ranks, found {}",
                BOARD_HEIGHT,
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (y, rank) in (0u8..).zip(ranks) {
            let mut x: u8 = 0;
            for ch in rank.chars() {
                if let Some(run) = ch.to_digit(10) {
                    x = x.saturating_add(run as u8);
                    continue;
                }
                let kind = PieceKind::from_fen_letter(ch)
                    .ok_or_else(|| Error::Fen(format!("unknown piece letter '{}'", ch)))?;
                let side = if ch.is_ascii_uppercase() { Side::Red } else { Side::Black };
                let at = Coordinate::new(x, y)
                    .ok_or_else(|| Error::Fen(format!("rank {} is too long", y)))?;
                board.place(Piece::new(kind, side, at))?;
                x += 1;
            }
            if x != BOARD_WIDTH {
                return Err(Error::Fen(format!(
                    "rank {} covers {} files instead of {}",
                    y, x, BOARD_WIDTH
                )));
            }
        }

        Ok(board)
    }

    pub fn to_fen(&self) -> String {
        let mut ranks = Vec::with_capacity(BOARD_HEIGHT as usize);

        for y in 0..BOARD_HEIGHT {
            let mut rank = String::new();
            let mut empty = 0;
            for x in 0..BOARD_WIDTH {
                match Coordinate::new(x, y).and_then(|at| self.piece_at(at)) {
                    Some(piece) => {
                        if empty > 0 {
                            rank.push_str(&empty.to_string());
                            empty = 0;
                        }
                        rank.push(piece.fen_letter());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                rank.push_str(&empty.to_string());
            }
            ranks.push(rank);
        }

        ranks.join("/")
    }
}
