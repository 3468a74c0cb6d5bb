//! Coordinates, sides and piece kinds

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Error;

/// Number of columns (files), `x` in `0..9`
pub const BOARD_WIDTH: u8 = 9;
/// Number of rows (ranks), `y` in `0..10`
pub const BOARD_HEIGHT: u8 = 10;

/// A point on the 9x10 board.
///
/// `y = 0` is Black's back rank and `y = 9` is Red's. A value of this type is
/// always inside the board; every constructor checks bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    x: u8,
    y: u8,
}

/// Unchecked wire form of a coordinate
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinate {
    x: i64,
    y: i64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::from_signed(raw.x, raw.y).ok_or(Error::OutOfBounds { x: raw.x, y: raw.y })
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            x: c.x as i64,
            y: c.y as i64,
        }
    }
}

impl Coordinate {
    pub fn new(x: u8, y: u8) -> Option<Self> {
        if x < BOARD_WIDTH && y < BOARD_HEIGHT {
            Some(Self { x, y })
        } else {
            None
        }
    }

    /// Like [`Coordinate::new`] but accepts any integer pair
    pub fn from_signed(x: i64, y: i64) -> Option<Self> {
        if (0..BOARD_WIDTH as i64).contains(&x) && (0..BOARD_HEIGHT as i64).contains(&y) {
            Some(Self {
                x: x as u8,
                y: y as u8,
            })
        } else {
            None
        }
    }

    pub fn x(self) -> u8 {
        self.x
    }

    pub fn y(self) -> u8 {
        self.y
    }

    /// Shifts the coordinate, returning `None` when the result leaves the board
    pub fn offset(self, dx: i8, dy: i8) -> Option<Self> {
        Self::from_signed(self.x as i64 + dx as i64, self.y as i64 + dy as i64)
    }

    /// All 90 points, row by row from Black's back rank
    pub fn all() -> impl Iterator<Item = Coordinate> {
        (0..BOARD_HEIGHT).flat_map(|y| (0..BOARD_WIDTH).map(move |x| Coordinate { x, y }))
    }

    /// Inside the 3x3 palace of `side`
    pub fn in_palace(self, side: Side) -> bool {
        let rows = match side {
            Side::Red => 7..=9,
            Side::Black => 0..=2,
        };
        (3..=5).contains(&self.x) && rows.contains(&self.y)
    }

    /// On `side`'s half of the board, the river not crossed
    pub fn on_own_half(self, side: Side) -> bool {
        match side {
            Side::Red => self.y >= 5,
            Side::Black => self.y <= 4,
        }
    }

    /// Across the river from `side`'s starting half
    pub fn has_crossed_river(self, side: Side) -> bool {
        !self.on_own_half(side)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Red,
    Black,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Red => Side::Black,
            Side::Black => Side::Red,
        }
    }

    /// Row delta of a soldier's advance
    pub fn forward(self) -> i8 {
        match self {
            Side::Red => -1,
            Side::Black => 1,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Side::Red => "Red",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceKind {
    General,
    Advisor,
    Elephant,
    Horse,
    Chariot,
    Cannon,
    Soldier,
}

impl PieceKind {
    pub const ALL: [PieceKind; 7] = [
        PieceKind::General,
        PieceKind::Advisor,
        PieceKind::Elephant,
        PieceKind::Horse,
        PieceKind::Chariot,
        PieceKind::Cannon,
        PieceKind::Soldier,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            PieceKind::General => "General",
            PieceKind::Advisor => "Advisor",
            PieceKind::Elephant => "Elephant",
            PieceKind::Horse => "Horse",
            PieceKind::Chariot => "Chariot",
            PieceKind::Cannon => "Cannon",
            PieceKind::Soldier => "Soldier",
        }
    }

    /// Lowercase FEN letter
    pub fn fen_letter(&self) -> char {
        match self {
            PieceKind::General => 'k',
            PieceKind::Advisor => 'a',
            PieceKind::Elephant => 'b',
            PieceKind::Horse => 'n',
            PieceKind::Chariot => 'r',
            PieceKind::Cannon => 'c',
            PieceKind::Soldier => 'p',
        }
    }

    pub fn from_fen_letter(letter: char) -> Option<PieceKind> {
        match letter.to_ascii_lowercase() {
            'k' => Some(PieceKind::General),
            'a' => Some(PieceKind::Advisor),
            'b' | 'e' => Some(PieceKind::Elephant),
            'n' | 'h' => Some(PieceKind::Horse),
            'r' => Some(PieceKind::Chariot),
            'c' => Some(PieceKind::Cannon),
            'p' => Some(PieceKind::Soldier),
            _ => None,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A piece standing on the board.
///
/// Serializes as `{"type": ..., "color": ..., "position": {"x": .., "y": ..}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    #[serde(rename = "type")]
    pub kind: PieceKind,
    #[serde(rename = "color")]
    pub side: Side,
    pub position: Coordinate,
}

impl Piece {
    pub fn new(kind: PieceKind, side: Side, position: Coordinate) -> Self {
        Self {
            kind,
            side,
            position,
        }
    }

    /// FEN letter, uppercase for Red
    pub fn fen_letter(&self) -> char {
        let letter = self.kind.fen_letter();
        match self.side {
            Side::Red => letter.to_ascii_uppercase(),
            Side::Black => letter,
        }
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.side, self.kind, self.position)
    }
}
