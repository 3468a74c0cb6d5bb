use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::broadcast;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use xiangqi_core::Rules;

mod config;
mod room;
mod routes;

use config::Config;
use room::{GameRoom, RelayEvent};

pub struct AppState {
    rooms: Mutex<HashMap<String, GameRoom>>,
    pub rules: Rules,
    pub relay_capacity: usize,
    next_connection: AtomicU64,
}

impl AppState {
    pub fn new(rules: Rules, relay_capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            rules,
            relay_capacity,
            next_connection: AtomicU64::new(1),
        }
    }

    /// Locks the room table, recovering it if a handler panicked while holding it
    pub fn rooms(&self) -> MutexGuard<'_, HashMap<String, GameRoom>> {
        self.rooms.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn new_room(&self) -> GameRoom {
        GameRoom::new(self.rules, self.relay_capacity)
    }

    /// Subscribes to a room, opening it on demand
    pub fn join_room(&self, game_id: &str) -> broadcast::Receiver<RelayEvent> {
        let mut rooms = self.rooms();
        rooms
            .entry(game_id.to_string())
            .or_insert_with(|| GameRoom::on_demand(self.rules, self.relay_capacity))
            .subscribe()
    }

    /// Drops an on-demand room once its last socket has gone and nothing was
    /// played in it. Returns whether the room was removed.
    pub fn leave_room(&self, game_id: &str) -> bool {
        let mut rooms = self.rooms();
        let abandoned = rooms.get(game_id).map_or(false, GameRoom::is_abandoned);
        if abandoned {
            rooms.remove(game_id);
            debug!(%game_id, "abandoned room closed");
        }
        abandoned
    }

    pub fn next_connection_id(&self) -> u64 {
        self.next_connection.fetch_add(1, Ordering::Relaxed)
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/health", get(routes::health))
        .route("/games", get(routes::list_games).post(routes::create_game))
        .route("/games/:game_id/state", get(routes::game_state))
        .route("/games/:game_id/moves", get(routes::legal_moves))
        .route("/games/:game_id/move", post(routes::make_move))
        .route("/games/:game_id/reset", post(routes::reset_game))
        .route("/ws/:game_id", get(routes::relay::relay_socket))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = Arc::new(AppState::new(config.rules(), config.relay_capacity));
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("failed to bind {}: {}", config.bind, e);
            std::process::exit(1);
        }
    };

    info!(
        bind = %config.bind,
        soldier_advance = config.rules().soldier_advance.as_str(),
        elephant_eye = config.elephant_eye,
        "server running"
    );

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("server error: {}", e);
    }
}
