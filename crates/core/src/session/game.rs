//! Turn handling on top of the board and the move generator

use serde::Serialize;
use tracing::{debug, info, warn};

use super::relay::{MoveRelay, NullRelay};
use crate::board::{Board, Coordinate, Piece, PieceKind, Side};
use crate::error::{Error, Result};
use crate::movegen::{legal_moves_with, Rules};
use crate::protocol::{GameStateView, MoveMessage, RelayMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No piece selected
    Idle,
    /// A piece is selected and its targets are known
    Selecting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectOutcome {
    Selected,
    Ignored(IgnoreReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    EmptySquare,
    OpponentPiece,
    AlreadySelecting,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No piece was selected
    NoSelection,
    /// The piece to move could not be selected
    InvalidSelection,
    /// The square is not among the selected piece's targets
    IllegalDestination,
    GameOver,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::NoSelection => "no piece selected",
            RejectReason::InvalidSelection => "no piece of the side to move on that square",
            RejectReason::IllegalDestination => "illegal destination",
            RejectReason::GameOver => "the game is over",
        }
    }
}

/// A move that happened on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveRecord {
    pub from: Coordinate,
    pub to: Coordinate,
    /// The mover as it stood on `from`
    pub piece: Piece,
    pub captured: Option<Piece>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    Moved(MoveRecord),
    /// The move captured a general
    GameOver(MoveRecord),
    Rejected(RejectReason),
}

impl MoveOutcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected(_))
    }

    pub fn record(&self) -> Option<&MoveRecord> {
        match self {
            MoveOutcome::Moved(record) | MoveOutcome::GameOver(record) => Some(record),
            MoveOutcome::Rejected(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameOver {
    pub winner: Side,
    pub message: String,
}

impl GameOver {
    fn general_captured(captured_side: Side) -> Self {
        let winner = captured_side.opponent();
        GameOver {
            winner,
            message: format!(
                "{} wins! {}'s general has been captured.",
                winner, captured_side
            ),
        }
    }
}

/// One game between Red and Black.
///
/// Holds the board, the side to move, the current selection with its
/// precomputed targets, and the terminal state once a general falls.
pub struct GameSession {
    board: Board,
    rules: Rules,
    selected: Option<Coordinate>,
    legal_targets: Vec<Coordinate>,
    current_turn: Side,
    game_over: Option<GameOver>,
    history: Vec<MoveRecord>,
    relay: Box<dyn MoveRelay + Send>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// A fresh game from the starting layout, Red to move
    pub fn new() -> Self {
        Self::from_board(Board::initial_layout(), Side::Red)
    }

    pub fn from_board(board: Board, current_turn: Side) -> Self {
        Self {
            board,
            rules: Rules::default(),
            selected: None,
            legal_targets: Vec::new(),
            current_turn,
            game_over: None,
            history: Vec::new(),
            relay: Box::new(NullRelay),
        }
    }

    /// Parses a FEN placement optionally followed by the side to move
    /// (`w` or `r` for Red, `b` for Black)
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut fields = fen.split_whitespace();
        let placement = fields
            .next()
            .ok_or_else(|| Error::Fen("empty FEN".to_string()))?;
        let board = Board::from_fen(placement)?;

        let current_turn = match fields.next() {
            None | Some("w") | Some("r") => Side::Red,
            Some("b") => Side::Black,
            Some(other) => return Err(Error::Fen(format!("unknown side to move '{}'", other))),
        };

        Ok(Self::from_board(board, current_turn))
    }

    pub fn with_rules(mut self, rules: Rules) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_relay<R>(mut self, relay: R) -> Self
    where
        R: MoveRelay + Send + 'static,
    {
        self.relay = Box::new(relay);
        self
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn current_turn(&self) -> Side {
        self.current_turn
    }

    pub fn selected(&self) -> Option<Coordinate> {
        self.selected
    }

    /// Targets of the selected piece; empty while idle
    pub fn legal_targets(&self) -> &[Coordinate] {
        &self.legal_targets
    }

    pub fn state(&self) -> SessionState {
        if self.selected.is_some() {
            SessionState::Selecting
        } else {
            SessionState::Idle
        }
    }

    pub fn game_over(&self) -> Option<&GameOver> {
        self.game_over.as_ref()
    }

    pub fn game_over_message(&self) -> Option<&str> {
        self.game_over.as_ref().map(|g| g.message.as_str())
    }

    pub fn winner(&self) -> Option<Side> {
        self.game_over.as_ref().map(|g| g.winner)
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over.is_some()
    }

    pub fn history(&self) -> &[MoveRecord] {
        &self.history
    }

    /// Destinations of whatever piece stands on `at`, regardless of turn
    pub fn moves_from(&self, at: Coordinate) -> Vec<Coordinate> {
        self.board
            .piece_at(at)
            .map(|piece| legal_moves_with(piece, &self.board, &self.rules))
            .unwrap_or_default()
    }

    /// Picks up a piece of the side to move and computes its targets
    pub fn select_square(&mut self, at: Coordinate) -> SelectOutcome {
        if self.is_game_over() {
            return SelectOutcome::Ignored(IgnoreReason::GameOver);
        }
        if self.selected.is_some() {
            return SelectOutcome::Ignored(IgnoreReason::AlreadySelecting);
        }

        let piece = match self.board.piece_at(at) {
            None => return SelectOutcome::Ignored(IgnoreReason::EmptySquare),
            Some(piece) if piece.side != self.current_turn => {
                return SelectOutcome::Ignored(IgnoreReason::OpponentPiece)
            }
            Some(piece) => *piece,
        };

        self.legal_targets = legal_moves_with(&piece, &self.board, &self.rules);
        self.selected = Some(at);
        debug!(piece = %piece, targets = self.legal_targets.len(), "piece selected");
        SelectOutcome::Selected
    }

    /// Moves the selected piece to `to` if that is one of its targets.
    ///
    /// The selection is cleared whether or not the move is accepted.
    pub fn attempt_move(&mut self, to: Coordinate) -> MoveOutcome {
        let Some(from) = self.selected else {
            return MoveOutcome::Rejected(RejectReason::NoSelection);
        };
        let permitted = self.legal_targets.contains(&to);
        self.clear_selection();

        if self.is_game_over() {
            return MoveOutcome::Rejected(RejectReason::GameOver);
        }
        if !permitted {
            debug!(%from, %to, "destination rejected");
            return MoveOutcome::Rejected(RejectReason::IllegalDestination);
        }

        let Some(piece) = self.board.piece_at(from).copied() else {
            return MoveOutcome::Rejected(RejectReason::NoSelection);
        };
        let captured = match self.board.apply(from, to) {
            Ok(captured) => captured,
            Err(_) => return MoveOutcome::Rejected(RejectReason::NoSelection),
        };

        let record = MoveRecord {
            from,
            to,
            piece,
            captured,
        };
        self.relay.send(&RelayMessage::Move(MoveMessage { from, to, piece }));

        if self.finish_move(record) {
            MoveOutcome::GameOver(record)
        } else {
            MoveOutcome::Moved(record)
        }
    }

    /// Select on an idle click, move on a click while selecting
    pub fn click(&mut self, at: Coordinate) -> Option<MoveOutcome> {
        match self.state() {
            SessionState::Idle => {
                self.select_square(at);
                None
            }
            SessionState::Selecting => Some(self.attempt_move(at)),
        }
    }

    /// Selects `from` and moves it to `to` in one step
    pub fn play(&mut self, from: Coordinate, to: Coordinate) -> MoveOutcome {
        self.clear_selection();
        match self.select_square(from) {
            SelectOutcome::Selected => self.attempt_move(to),
            SelectOutcome::Ignored(IgnoreReason::GameOver) => {
                MoveOutcome::Rejected(RejectReason::GameOver)
            }
            SelectOutcome::Ignored(_) => MoveOutcome::Rejected(RejectReason::InvalidSelection),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.legal_targets.clear();
    }

    /// Back to the starting layout with Red to move
    pub fn reset(&mut self) {
        self.board = Board::initial_layout();
        self.clear_selection();
        self.game_over = None;
        self.history.clear();
        self.current_turn = Side::Red;
        info!("game reset");
    }

    /// Resets once the game-over message has been seen. Returns whether a
    /// reset happened.
    pub fn acknowledge_game_over(&mut self) -> bool {
        if self.is_game_over() {
            self.reset();
            true
        } else {
            false
        }
    }

    /// Mirrors a move announced by a relay peer.
    ///
    /// The move is not checked against the rules. Returns `false` and leaves
    /// the session untouched when there is nothing on `from`.
    pub fn apply_remote(&mut self, message: &MoveMessage) -> bool {
        let Some(piece) = self.board.piece_at(message.from).copied() else {
            warn!(from = %message.from, "remote move from an empty square ignored");
            return false;
        };
        if message.from == message.to {
            return false;
        }
        if piece.kind != message.piece.kind || piece.side != message.piece.side {
            debug!(local = %piece, remote = %message.piece, "remote move names a different piece");
        }

        let captured = match self.board.apply(message.from, message.to) {
            Ok(captured) => captured,
            Err(_) => return false,
        };
        self.clear_selection();
        self.finish_move(MoveRecord {
            from: message.from,
            to: message.to,
            piece,
            captured,
        });
        true
    }

    pub fn snapshot(&self) -> GameStateView {
        GameStateView {
            pieces: self.board.pieces().to_vec(),
            current_turn: self.current_turn,
            game_over: self.is_game_over(),
            winner: self.winner(),
            message: self.game_over_message().map(str::to_string),
            move_count: self.history.len(),
            fen: format!(
                "{} {}",
                self.board.to_fen(),
                match self.current_turn {
                    Side::Red => "w",
                    Side::Black => "b",
                }
            ),
        }
    }

    /// Records the move, then ends the game or passes the turn. Returns
    /// whether this move ended the game.
    fn finish_move(&mut self, record: MoveRecord) -> bool {
        self.history.push(record);
        debug!(from = %record.from, to = %record.to, piece = %record.piece, "move applied");

        if self.is_game_over() {
            return false;
        }

        match record.captured {
            Some(captured) if captured.kind == PieceKind::General => {
                let over = GameOver::general_captured(captured.side);
                info!(winner = %over.winner, "general captured");
                self.game_over = Some(over);
                true
            }
            _ => {
                self.current_turn = record.piece.side.opponent();
                false
            }
        }
    }
}
