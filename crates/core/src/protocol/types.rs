//! Relay messages and game state views

use serde::{Deserialize, Serialize};

use crate::board::{Coordinate, Piece, Side};
use crate::error::Result;

/// A message travelling through the relay.
///
/// Encoded with a `"type"` tag, e.g.
/// `{"type": "MOVE", "from": {..}, "to": {..}, "piece": {..}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RelayMessage {
    #[serde(rename = "MOVE")]
    Move(MoveMessage),
}

impl RelayMessage {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<MoveMessage> for RelayMessage {
    fn from(message: MoveMessage) -> Self {
        RelayMessage::Move(message)
    }
}

/// One relocated piece. `piece` is the mover as it stood on `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMessage {
    pub from: Coordinate,
    pub to: Coordinate,
    pub piece: Piece,
}

/// Snapshot of a game for API clients
#[derive(Debug, Clone, Serialize)]
pub struct GameStateView {
    pub pieces: Vec<Piece>,
    pub current_turn: Side,
    pub game_over: bool,
    pub winner: Option<Side>,
    pub message: Option<String>,
    pub move_count: usize,
    pub fen: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::PieceKind;
    use crate::error::Error;

    const SAMPLE: &str = r#"{
        "type": "MOVE",
        "from": {"x": 1, "y": 7},
        "to": {"x": 4, "y": 7},
        "piece": {"type": "cannon", "color": "red", "position": {"x": 1, "y": 7}}
    }"#;

    #[test]
    fn test_parse_move_message() {
        let RelayMessage::Move(msg) = RelayMessage::from_json(SAMPLE).unwrap();
        assert_eq!(msg.from, Coordinate::new(1, 7).unwrap());
        assert_eq!(msg.to, Coordinate::new(4, 7).unwrap());
        assert_eq!(msg.piece.kind, PieceKind::Cannon);
        assert_eq!(msg.piece.side, Side::Red);
    }

    #[test]
    fn test_serialized_tag() {
        let msg = RelayMessage::from_json(SAMPLE).unwrap();
        let value: serde_json::Value = serde_json::from_str(&msg.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "MOVE");
        assert_eq!(value["to"]["x"], 4);
        assert_eq!(value["piece"]["color"], "red");
    }

    #[test]
    fn test_rejects_unknown_type_and_bad_coordinates() {
        let unknown = SAMPLE.replace("\"MOVE\"", "\"CHAT\"");
        assert!(matches!(RelayMessage::from_json(&unknown), Err(Error::Json(_))));

        let off_board = SAMPLE.replace(r#""to": {"x": 4, "y": 7}"#, r#""to": {"x": 4, "y": 12}"#);
        assert!(RelayMessage::from_json(&off_board).is_err());
    }
}
