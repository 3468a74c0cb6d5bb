use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use xiangqi_core::{Coordinate, MoveOutcome, Piece, Side};

use crate::room::{GameSummary, RoomStateView};
use crate::AppState;

pub mod relay;

const GAME_ID_LEN: usize = 8;

pub enum ApiError {
    GameNotFound(String),
    BadRequest(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::GameNotFound(id) => (StatusCode::NOT_FOUND, format!("game {} not found", id)),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

#[derive(Serialize)]
pub struct CreatedGame {
    pub game_id: String,
}

#[derive(Deserialize)]
pub struct SquareQuery {
    pub x: i64,
    pub y: i64,
}

#[derive(Serialize)]
pub struct MovesResponse {
    pub piece: Option<Piece>,
    pub targets: Vec<Coordinate>,
}

#[derive(Deserialize)]
pub struct MoveRequest {
    pub from: Coordinate,
    pub to: Coordinate,
}

#[derive(Serialize)]
pub struct MoveResponse {
    pub valid: bool,
    pub message: String,
    pub game_over: bool,
    pub winner: Option<Side>,
}

fn new_game_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GAME_ID_LEN)
        .map(char::from)
        .collect()
}

pub async fn index() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Xiangqi Game API" }))
}

pub async fn health() -> &'static str {
    "OK"
}

pub async fn list_games(State(state): State<Arc<AppState>>) -> Json<Vec<GameSummary>> {
    let rooms = state.rooms();
    let mut games: Vec<GameSummary> = rooms.iter().map(|(id, room)| room.summary(id)).collect();
    games.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.game_id.cmp(&b.game_id)));
    Json(games)
}

pub async fn create_game(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut rooms = state.rooms();
    let mut game_id = new_game_id();
    while rooms.contains_key(&game_id) {
        game_id = new_game_id();
    }
    rooms.insert(game_id.clone(), state.new_room());
    info!(%game_id, "game created");

    (StatusCode::CREATED, Json(CreatedGame { game_id }))
}

pub async fn game_state(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<RoomStateView>, ApiError> {
    let rooms = state.rooms();
    let room = rooms.get(&game_id).ok_or(ApiError::GameNotFound(game_id.clone()))?;
    Ok(Json(room.state_view()))
}

pub async fn legal_moves(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Query(query): Query<SquareQuery>,
) -> Result<Json<MovesResponse>, ApiError> {
    let at = Coordinate::from_signed(query.x, query.y).ok_or_else(|| {
        ApiError::BadRequest(format!("({}, {}) is outside the board", query.x, query.y))
    })?;

    let rooms = state.rooms();
    let room = rooms.get(&game_id).ok_or(ApiError::GameNotFound(game_id.clone()))?;

    Ok(Json(MovesResponse {
        piece: room.session.board().piece_at(at).copied(),
        targets: room.session.moves_from(at),
    }))
}

pub async fn make_move(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    Json(req): Json<MoveRequest>,
) -> Result<Json<MoveResponse>, ApiError> {
    let mut rooms = state.rooms();
    let room = rooms
        .get_mut(&game_id)
        .ok_or(ApiError::GameNotFound(game_id.clone()))?;

    let outcome = room.session.play(req.from, req.to);
    if let Some(record) = outcome.record() {
        info!(%game_id, piece = %record.piece, to = %record.to, "move played");
    }
    let message = match &outcome {
        MoveOutcome::Moved(record) => format!("{} moved to {}", record.piece, record.to),
        MoveOutcome::GameOver(_) => room
            .session
            .game_over_message()
            .unwrap_or_default()
            .to_string(),
        MoveOutcome::Rejected(reason) => {
            debug!(%game_id, from = %req.from, to = %req.to, reason = reason.as_str(), "move rejected");
            reason.as_str().to_string()
        }
    };

    Ok(Json(MoveResponse {
        valid: outcome.is_accepted(),
        message,
        game_over: room.session.is_game_over(),
        winner: room.session.winner(),
    }))
}

pub async fn reset_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<Json<RoomStateView>, ApiError> {
    let mut rooms = state.rooms();
    let room = rooms
        .get_mut(&game_id)
        .ok_or(ApiError::GameNotFound(game_id.clone()))?;
    room.session.reset();
    Ok(Json(room.state_view()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        Router,
    };
    use tower::ServiceExt;
    use xiangqi_core::Rules;

    fn app() -> (Arc<AppState>, Router) {
        let state = Arc::new(AppState::new(Rules::default(), 16));
        (state.clone(), crate::router(state))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn create(app: &Router) -> String {
        let (status, body) = send(app, post("/games", serde_json::json!({}))).await;
        assert_eq!(status, StatusCode::CREATED);
        body["game_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_index_and_health() {
        let (_, app) = app();
        let (status, body) = send(&app, get("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Xiangqi Game API");

        let response = app.clone().oneshot(get("/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_create_and_list_games() {
        let (state, app) = app();
        let game_id = create(&app).await;
        assert_eq!(game_id.len(), GAME_ID_LEN);
        assert!(state.rooms().contains_key(&game_id));

        let (status, body) = send(&app, get("/games")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["game_id"], game_id.as_str());
        assert_eq!(body[0]["current_turn"], "red");
    }

    #[tokio::test]
    async fn test_unknown_game_is_404() {
        let (_, app) = app();
        let (status, body) = send(&app, get("/games/nope/state")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_state_of_new_game() {
        let (_, app) = app();
        let game_id = create(&app).await;

        let (status, body) = send(&app, get(&format!("/games/{}/state", game_id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["pieces"].as_array().unwrap().len(), 32);
        assert_eq!(body["current_turn"], "red");
        assert_eq!(body["game_over"], false);
        assert!(body["elapsed_secs"].as_i64().unwrap() >= 0);
        assert!(body["created_at"].is_string());
    }

    #[tokio::test]
    async fn test_moves_query() {
        let (_, app) = app();
        let game_id = create(&app).await;

        let (status, body) = send(&app, get(&format!("/games/{}/moves?x=0&y=9", game_id))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["piece"]["type"], "chariot");
        assert_eq!(body["targets"].as_array().unwrap().len(), 2);

        let (status, _) = send(&app, get(&format!("/games/{}/moves?x=9&y=0", game_id))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_move_flow() {
        let (_, app) = app();
        let game_id = create(&app).await;
        let uri = format!("/games/{}/move", game_id);

        let illegal = serde_json::json!({"from": {"x": 0, "y": 9}, "to": {"x": 0, "y": 3}});
        let (status, body) = send(&app, post(&uri, illegal)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["valid"], false);

        let legal = serde_json::json!({"from": {"x": 1, "y": 7}, "to": {"x": 4, "y": 7}});
        let (_, body) = send(&app, post(&uri, legal)).await;
        assert_eq!(body["valid"], true);
        assert_eq!(body["game_over"], false);

        let (_, body) = send(&app, get(&format!("/games/{}/state", game_id))).await;
        assert_eq!(body["current_turn"], "black");
        assert_eq!(body["move_count"], 1);

        let (_, body) = send(&app, post(&format!("/games/{}/reset", game_id), serde_json::json!({}))).await;
        assert_eq!(body["current_turn"], "red");
        assert_eq!(body["move_count"], 0);
    }

    #[tokio::test]
    async fn test_http_move_is_broadcast() {
        let (state, app) = app();
        let game_id = create(&app).await;
        let mut rx = state.rooms()[&game_id].subscribe();

        let legal = serde_json::json!({"from": {"x": 7, "y": 7}, "to": {"x": 4, "y": 7}});
        send(&app, post(&format!("/games/{}/move", game_id), legal)).await;

        let event = rx.try_recv().unwrap();
        assert_eq!(event.origin, None);
        assert!(event.payload.contains("\"MOVE\""));
    }
}
