use crate::errors::IntoErrorResponse;
use crate::session::{GameStateResponse, SessionError, SessionId, SessionManager, TableConfig};
use holdem_engine::Action;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Creation payload. Every field is optional; omissions fall back to
/// the default table (1/2 blinds, 200 stacks, one calling bot).
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub seed: Option<u64>,
    pub small_blind: Option<u32>,
    pub big_blind: Option<u32>,
    pub starting_stack: Option<u32>,
    pub bots: Option<usize>,
    pub policy: Option<String>,
}

impl CreateSessionRequest {
    fn into_config(self) -> TableConfig {
        let mut config = TableConfig::default();
        if let Some(seed) = self.seed {
            config.seed = Some(seed);
        }
        if let Some(small_blind) = self.small_blind {
            config.small_blind = small_blind;
        }
        if let Some(big_blind) = self.big_blind {
            config.big_blind = big_blind;
        }
        if let Some(starting_stack) = self.starting_stack {
            config.starting_stack = starting_stack;
        }
        if let Some(bots) = self.bots {
            config.bots = bots;
        }
        if let Some(policy) = self.policy {
            config.policy = policy;
        }
        config
    }
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: SessionId,
    pub config: TableConfig,
    pub state: GameStateResponse,
}

/// Action payload. `seat` defaults to the human seat.
#[derive(Debug, Deserialize)]
pub struct ActionRequest {
    pub action: Action,
    pub seat: Option<usize>,
}

/// POST `/api/sessions` — creates a session and returns its id,
/// effective config, and the undealt initial state (201).
pub async fn create_session(
    sessions: Arc<SessionManager>,
    request: CreateSessionRequest,
) -> Response {
    let config = request.into_config();
    let result = sessions.create_session(config.clone()).and_then(|id| {
        let state = sessions.state(&id)?;
        Ok(SessionResponse {
            session_id: id,
            config,
            state,
        })
    });
    match result {
        Ok(response) => success_response(StatusCode::CREATED, response),
        Err(err) => session_error(err),
    }
}

/// GET `/api/sessions/{id}/state` — current round snapshot.
pub async fn get_state(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.state(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// POST `/api/sessions/{id}/new-game` — discards the current round and
/// readies a fresh one.
pub async fn new_game(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.new_game(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// POST `/api/sessions/{id}/start-game` — deals the round, posts the
/// blinds, and plays any leading bot turns.
pub async fn start_game(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.start_game(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// POST `/api/sessions/{id}/action` — applies one player action, then
/// bot turns, and returns the resulting state. Invalid actions come
/// back as 400 with the round untouched.
pub async fn submit_action(
    sessions: Arc<SessionManager>,
    session_id: SessionId,
    request: ActionRequest,
) -> Response {
    match sessions.submit_action(&session_id, request.seat, request.action) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

/// POST `/api/sessions/{id}/advance-turn` — plays pending bot turns
/// without a human action.
pub async fn advance_turn(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.advance_turn(&session_id) {
        Ok(state) => success_response(StatusCode::OK, state),
        Err(err) => session_error(err),
    }
}

#[derive(Debug, Serialize)]
struct BotTurnResponse {
    acted: bool,
    #[serde(flatten)]
    state: GameStateResponse,
}

/// POST `/api/sessions/{id}/bot-turn` — plays at most one bot turn and
/// reports whether a bot acted.
pub async fn bot_turn(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.bot_turn(&session_id) {
        Ok((state, acted)) => success_response(StatusCode::OK, BotTurnResponse { acted, state }),
        Err(err) => session_error(err),
    }
}

/// DELETE `/api/sessions/{id}` — removes the session (204).
pub async fn delete_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.delete_session(&session_id) {
        Ok(()) => reply::with_status(reply::reply(), StatusCode::NO_CONTENT).into_response(),
        Err(err) => session_error(err),
    }
}

fn success_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    reply::with_status(reply::json(&body), status).into_response()
}

fn session_error(err: SessionError) -> Response {
    err.into_http_response()
}
