//! Game rooms: one session plus the broadcast channel its sockets share

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::warn;

use xiangqi_core::{GameSession, GameStateView, MoveRelay, RelayMessage, Rules, Side};

/// A serialized relay message and the socket it came from
#[derive(Debug, Clone)]
pub struct RelayEvent {
    /// `None` for moves made through the HTTP API
    pub origin: Option<u64>,
    pub payload: String,
}

/// Pushes moves accepted by the room's session onto the room channel
pub struct ChannelRelay {
    sender: broadcast::Sender<RelayEvent>,
}

impl MoveRelay for ChannelRelay {
    fn send(&self, message: &RelayMessage) {
        match message.to_json() {
            Ok(payload) => {
                // no subscribers is fine
                let _ = self.sender.send(RelayEvent {
                    origin: None,
                    payload,
                });
            }
            Err(e) => warn!("failed to encode relay message: {}", e),
        }
    }
}

pub struct GameRoom {
    pub session: GameSession,
    pub events: broadcast::Sender<RelayEvent>,
    pub created_at: DateTime<Utc>,
    /// Opened by a socket rather than `POST /games`
    pub on_demand: bool,
}

/// Game state plus room timing, as served over HTTP
#[derive(Debug, Clone, Serialize)]
pub struct RoomStateView {
    #[serde(flatten)]
    pub game: GameStateView,
    pub created_at: String,
    pub elapsed_secs: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub game_id: String,
    pub created_at: String,
    pub move_count: usize,
    pub current_turn: Side,
    pub game_over: bool,
}

impl GameRoom {
    pub fn new(rules: Rules, capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity.max(1));
        let session = GameSession::new().with_rules(rules).with_relay(ChannelRelay {
            sender: events.clone(),
        });

        Self {
            session,
            events,
            created_at: Utc::now(),
            on_demand: false,
        }
    }

    /// A room created on demand by a relay socket
    pub fn on_demand(rules: Rules, capacity: usize) -> Self {
        Self {
            on_demand: true,
            ..Self::new(rules, capacity)
        }
    }

    /// An on-demand room nobody is connected to and nothing was played in
    pub fn is_abandoned(&self) -> bool {
        self.on_demand && self.events.receiver_count() == 0 && self.session.history().is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RelayEvent> {
        self.events.subscribe()
    }

    /// Forwards a peer's frame to every other socket in the room
    pub fn broadcast(&self, origin: u64, payload: String) {
        let _ = self.events.send(RelayEvent {
            origin: Some(origin),
            payload,
        });
    }

    fn created_at_text(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    pub fn state_view(&self) -> RoomStateView {
        RoomStateView {
            game: self.session.snapshot(),
            created_at: self.created_at_text(),
            elapsed_secs: (Utc::now() - self.created_at).num_seconds().max(0),
        }
    }

    pub fn summary(&self, game_id: &str) -> GameSummary {
        GameSummary {
            game_id: game_id.to_string(),
            created_at: self.created_at_text(),
            move_count: self.session.history().len(),
            current_turn: self.session.current_turn(),
            game_over: self.session.is_game_over(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xiangqi_core::Coordinate;

    fn c(x: u8, y: u8) -> Coordinate {
        Coordinate::new(x, y).unwrap()
    }

    #[test]
    fn test_accepted_move_reaches_subscribers() {
        let mut room = GameRoom::new(Rules::default(), 8);
        let mut rx = room.subscribe();

        assert!(room.session.play(c(1, 7), c(4, 7)).is_accepted());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.origin, None);
        let RelayMessage::Move(msg) = RelayMessage::from_json(&event.payload).unwrap();
        assert_eq!(msg.from, c(1, 7));
        assert_eq!(msg.to, c(4, 7));
    }

    #[test]
    fn test_rejected_move_is_not_relayed() {
        let mut room = GameRoom::new(Rules::default(), 8);
        let mut rx = room.subscribe();

        assert!(!room.session.play(c(0, 9), c(0, 3)).is_accepted());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_state_view_carries_timing() {
        let mut room = GameRoom::new(Rules::default(), 8);
        room.created_at = Utc::now() - chrono::Duration::seconds(90);
        room.session.play(c(1, 7), c(4, 7));

        let view = room.state_view();
        assert!(view.elapsed_secs >= 90);
        assert_eq!(view.game.move_count, 1);

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["move_count"], 1);
        assert_eq!(json["current_turn"], "black");
        assert!(json["elapsed_secs"].as_i64().unwrap() >= 90);
        assert!(json["created_at"].is_string());
    }

    #[test]
    fn test_only_idle_on_demand_rooms_are_abandoned() {
        let created = GameRoom::new(Rules::default(), 8);
        assert!(!created.is_abandoned());

        let mut joined = GameRoom::on_demand(Rules::default(), 8);
        assert!(joined.is_abandoned());
        let rx = joined.subscribe();
        assert!(!joined.is_abandoned());
        drop(rx);
        assert!(joined.is_abandoned());

        joined.session.play(c(1, 7), c(4, 7));
        assert!(!joined.is_abandoned());
    }

    #[test]
    fn test_summary() {
        let mut room = GameRoom::new(Rules::default(), 8);
        room.session.play(c(1, 7), c(4, 7));

        let summary = room.summary("abc12345");
        assert_eq!(summary.game_id, "abc12345");
        assert_eq!(summary.move_count, 1);
        assert_eq!(summary.current_turn, Side::Black);
        assert!(!summary.game_over);
    }
}
