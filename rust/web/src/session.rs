use holdem_bot::{create_policy, BotPolicy};
use holdem_engine::{
    Action, ActionError, Card, EngineError, Phase, Round, RoundConfig, RoundLogger, SeatKind,
};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock, TryLockError};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

pub type SessionId = String;

const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Table parameters for a session, supplied at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableConfig {
    pub seed: Option<u64>,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stack: u32,
    pub bots: usize,
    /// Bot strategy name, resolved through the policy factory.
    pub policy: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            seed: None,
            small_blind: 1,
            big_blind: 2,
            starting_stack: 200,
            bots: 1,
            policy: "caller".to_string(),
        }
    }
}

impl TableConfig {
    fn round_config(&self) -> RoundConfig {
        RoundConfig {
            seed: self.seed,
            small_blind: self.small_blind,
            big_blind: self.big_blind,
            starting_stack: self.starting_stack,
            bots: self.bots,
        }
    }
}

/// Owns all live sessions behind a read-write lock, enforces the
/// inactivity TTL, and appends resolved rounds to the optional
/// history log.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<GameSession>>>,
    history: Option<Mutex<RoundLogger>>,
    session_ttl: Duration,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history: None,
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history: None,
            session_ttl: ttl,
        }
    }

    pub fn with_history(history: RoundLogger) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            history: Some(Mutex::new(history)),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn create_session(&self, mut config: TableConfig) -> Result<SessionId, SessionError> {
        // the stored config must match the table that gets seated
        config.bots = config.bots.max(1);
        config.round_config().validate()?;
        let id = Uuid::new_v4().to_string();

        tracing::info!(
            session_id = %id,
            bots = config.bots,
            policy = %config.policy,
            "creating game session"
        );

        let session = Arc::new(GameSession::new(id.clone(), config));
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard.insert(id.clone(), Arc::clone(&session));
        Ok(id)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<GameSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Looks up a session, expiring it if the TTL has lapsed and
    /// refreshing its activity timestamp otherwise.
    fn checked(&self, id: &SessionId) -> Result<Arc<GameSession>, SessionError> {
        let session = self.get_session(id)?;
        if session.is_expired(self.session_ttl) {
            self.remove_session(id)?;
            return Err(SessionError::Expired(id.clone()));
        }
        session.touch();
        Ok(session)
    }

    pub fn state(&self, id: &SessionId) -> Result<GameStateResponse, SessionError> {
        let session = self.checked(id)?;
        session.snapshot()
    }

    /// Replaces the session's round with a fresh, undealt one.
    pub fn new_game(&self, id: &SessionId) -> Result<GameStateResponse, SessionError> {
        let session = self.checked(id)?;
        session.reset()?;
        tracing::debug!(session_id = %id, "round reset");
        session.snapshot()
    }

    /// Deals the round and plays any leading bot turns.
    pub fn start_game(&self, id: &SessionId) -> Result<GameStateResponse, SessionError> {
        let session = self.checked(id)?;
        session.start()?;
        tracing::debug!(session_id = %id, "round started");
        self.log_if_resolved(id, &session)?;
        session.snapshot()
    }

    /// Applies one action for the given seat (the human seat when
    /// omitted), then plays bot turns until the human holds the turn
    /// again or the round resolves.
    pub fn submit_action(
        &self,
        id: &SessionId,
        seat: Option<usize>,
        action: Action,
    ) -> Result<GameStateResponse, SessionError> {
        let session = self.checked(id)?;
        tracing::debug!(session_id = %id, ?seat, ?action, "processing action");
        session.apply(seat, action)?;
        self.log_if_resolved(id, &session)?;
        session.snapshot()
    }

    /// Plays bot turns without a human action, for when the human is
    /// not due to act.
    pub fn advance_turn(&self, id: &SessionId) -> Result<GameStateResponse, SessionError> {
        let session = self.checked(id)?;
        session.advance()?;
        self.log_if_resolved(id, &session)?;
        session.snapshot()
    }

    /// Plays at most one bot turn. Returns the new state plus whether
    /// a bot actually acted.
    pub fn bot_turn(&self, id: &SessionId) -> Result<(GameStateResponse, bool), SessionError> {
        let session = self.checked(id)?;
        let acted = session.bot_step()?;
        self.log_if_resolved(id, &session)?;
        Ok((session.snapshot()?, acted))
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(id)? {
            Some(_) => {
                tracing::info!(session_id = %id, "session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.clone())),
        }
    }

    pub fn cleanup_expired_sessions(&self) {
        let mut guard = match self.sessions.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.retain(|id, session| {
            if session.is_expired(self.session_ttl) {
                tracing::info!(session_id = %id, "session expired");
                false
            } else {
                true
            }
        });
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn remove_session(&self, id: &SessionId) -> Result<Option<Arc<GameSession>>, SessionError> {
        match self.sessions.write() {
            Ok(mut guard) => Ok(guard.remove(id)),
            Err(_) => Err(SessionError::StoragePoisoned),
        }
    }

    /// Appends the round to the history log the first time it shows
    /// up resolved.
    fn log_if_resolved(
        &self,
        id: &SessionId,
        session: &GameSession,
    ) -> Result<(), SessionError> {
        let Some(history) = &self.history else {
            return Ok(());
        };
        if !session.take_unlogged_resolution()? {
            return Ok(());
        }
        let mut logger = history
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let round_id = logger.next_id();
        let record = session.round_record(round_id)?;
        if let Err(err) = logger.write(&record) {
            tracing::error!(session_id = %id, error = %err, "failed to write round history");
        }
        Ok(())
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("session_ttl", &self.session_ttl)
            .field("history", &self.history.is_some())
            .finish_non_exhaustive()
    }
}

/// One player's table: the engine round, the bot policy driving the
/// non-human seats, and activity tracking for expiry.
pub struct GameSession {
    id: SessionId,
    config: TableConfig,
    round: Mutex<Round>,
    policy: Box<dyn BotPolicy>,
    created_at: Instant,
    last_active: Mutex<Instant>,
    logged: Mutex<bool>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("id", &self.id)
            .field("config", &self.config)
            .field("created_at", &self.created_at)
            .field("policy", &self.policy.name())
            .finish()
    }
}

impl GameSession {
    fn new(id: SessionId, config: TableConfig) -> Self {
        let round = Round::new(config.round_config());
        let policy = create_policy(&config.policy);
        let now = Instant::now();
        Self {
            id,
            config,
            round: Mutex::new(round),
            policy,
            created_at: now,
            last_active: Mutex::new(now),
            logged: Mutex::new(false),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Exclusive round access for mutating operations. A request that
    /// finds the round locked is rejected as busy rather than queued:
    /// one in-flight mutation per session.
    fn round_mut(&self) -> Result<MutexGuard<'_, Round>, SessionError> {
        match self.round.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => Err(SessionError::Busy(self.id.clone())),
            Err(TryLockError::Poisoned(_)) => Err(SessionError::StoragePoisoned),
        }
    }

    fn reset(&self) -> Result<(), SessionError> {
        let mut round = self.round_mut()?;
        *round = Round::new(self.config.round_config());
        let mut logged = self
            .logged
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        *logged = false;
        Ok(())
    }

    fn start(&self) -> Result<(), SessionError> {
        let mut round = self.round_mut()?;
        round.start()?;
        self.run_bots(&mut round)
    }

    fn apply(&self, seat: Option<usize>, action: Action) -> Result<(), SessionError> {
        let mut round = self.round_mut()?;
        let seat = match seat {
            Some(idx) if idx < round.seats().len() => idx,
            Some(idx) => {
                return Err(ActionError::UnknownSeat(idx.to_string()).into());
            }
            None => round
                .human_seat()
                .ok_or_else(|| ActionError::UnknownSeat("player".to_string()))?,
        };
        round.apply(seat, action)?;
        self.run_bots(&mut round)
    }

    fn advance(&self) -> Result<(), SessionError> {
        let mut round = self.round_mut()?;
        self.run_bots(&mut round)
    }

    fn bot_step(&self) -> Result<bool, SessionError> {
        let mut round = self.round_mut()?;
        let policy = &self.policy;
        Ok(round.bot_step(|r, s| policy.decide(r, s))?)
    }

    fn run_bots(&self, round: &mut Round) -> Result<(), SessionError> {
        let policy = &self.policy;
        round.advance_bots(|r, s| policy.decide(r, s))?;
        Ok(())
    }

    /// True exactly once per resolved round, flipping the logged flag.
    fn take_unlogged_resolution(&self) -> Result<bool, SessionError> {
        let round = self
            .round
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        if round.outcome().is_none() {
            return Ok(false);
        }
        drop(round);
        let mut logged = self
            .logged
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        if *logged {
            return Ok(false);
        }
        *logged = true;
        Ok(true)
    }

    fn round_record(
        &self,
        round_id: String,
    ) -> Result<holdem_engine::RoundRecord, SessionError> {
        let round = self
            .round
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        Ok(round.record(round_id))
    }

    /// Builds the client-facing view of the round. Bot hole cards stay
    /// face down until a contested showdown reveals the contenders.
    pub fn snapshot(&self) -> Result<GameStateResponse, SessionError> {
        let round = self
            .round
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;

        let showdown_reveal = round.phase() == Phase::Showdown
            && round
                .outcome()
                .map_or(false, |o| o.winning_hand.is_some());

        let seats = round
            .seats()
            .iter()
            .enumerate()
            .map(|(idx, seat)| {
                let visible = !seat.is_bot() || (showdown_reveal && seat.in_contention());
                let cards = seat
                    .hole()
                    .iter()
                    .map(|&card| {
                        if visible {
                            CardFace::Up(card)
                        } else {
                            CardFace::Down
                        }
                    })
                    .collect();
                SeatView {
                    index: idx,
                    name: seat.name().to_string(),
                    kind: seat.kind(),
                    stack: seat.stack(),
                    round_bet: seat.round_bet(),
                    folded: seat.folded(),
                    all_in: seat.all_in(),
                    cards,
                }
            })
            .collect();

        let (sb_seat, bb_seat) = round.blinds();
        let to_call = round.current_turn().map(|seat| round.to_call(seat));
        let winners = round.outcome().map(|o| {
            o.winners
                .iter()
                .map(|&i| round.seats()[i].name().to_string())
                .collect()
        });
        let winning_hand = round.outcome().and_then(|o| {
            o.winning_hand.as_ref().map(|w| WinningHandView {
                category: w.category.label().to_string(),
                cards: w.cards.clone(),
            })
        });

        Ok(GameStateResponse {
            session_id: self.id.clone(),
            phase: round.phase(),
            pot: round.pot(),
            community_cards: round.community().to_vec(),
            seats,
            current_turn: round.current_turn(),
            to_call,
            min_bet: round.min_bet(),
            blinds: BlindsInfo {
                small_blind: self.config.small_blind,
                big_blind: self.config.big_blind,
                small_blind_seat: sb_seat,
                big_blind_seat: bb_seat,
            },
            deck_remaining: round.deck_remaining(),
            deck_card: (round.deck_remaining() > 0).then_some(CardFace::Down),
            winners,
            winning_hand,
            message: round.message().map(str::to_string),
        })
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }
}

#[cfg(test)]
impl GameSession {
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }
}

/// A hole card as the client sees it: the real card for the viewer's
/// own seat, a face-down placeholder otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Up(Card),
    Down,
}

impl Serialize for CardFace {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            CardFace::Up(card) => card.serialize(serializer),
            CardFace::Down => {
                let mut state = serializer.serialize_struct("Card", 2)?;
                state.serialize_field("value", "back")?;
                state.serialize_field("suit", "card_back")?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeatView {
    pub index: usize,
    pub name: String,
    pub kind: SeatKind,
    pub stack: u32,
    pub round_bet: u32,
    pub folded: bool,
    pub all_in: bool,
    pub cards: Vec<CardFace>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BlindsInfo {
    pub small_blind: u32,
    pub big_blind: u32,
    pub small_blind_seat: usize,
    pub big_blind_seat: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct WinningHandView {
    pub category: String,
    pub cards: Vec<Card>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct GameStateResponse {
    pub session_id: SessionId,
    pub phase: Phase,
    pub pot: u32,
    pub community_cards: Vec<Card>,
    pub seats: Vec<SeatView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_turn: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_call: Option<u32>,
    pub min_bet: u32,
    pub blinds: BlindsInfo,
    pub deck_remaining: usize,
    /// Face-down placeholder shown while undealt cards remain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deck_card: Option<CardFace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winners: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_hand: Option<WinningHandView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Session busy: {0}")]
    Busy(SessionId),
    #[error(transparent)]
    InvalidAction(#[from] ActionError),
    #[error("Invalid table configuration: {0}")]
    InvalidConfig(EngineError),
    #[error("Game engine error: {0}")]
    Engine(EngineError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl From<EngineError> for SessionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::InvalidAction(inner) => SessionError::InvalidAction(inner),
            config @ EngineError::StakesOverflow { .. } => SessionError::InvalidConfig(config),
            other => SessionError::Engine(other),
        }
    }
}

impl crate::errors::IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Expired(_) => StatusCode::GONE,
            SessionError::Busy(_) => StatusCode::CONFLICT,
            SessionError::InvalidAction(_) => StatusCode::BAD_REQUEST,
            SessionError::InvalidConfig(_) => StatusCode::BAD_REQUEST,
            SessionError::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Expired(_) => "session_expired",
            SessionError::Busy(_) => "session_busy",
            SessionError::InvalidAction(_) => "invalid_action",
            SessionError::InvalidConfig(_) => "invalid_config",
            SessionError::Engine(_) => "engine_error",
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({
                "session_id": id
            })),
            SessionError::Expired(id) => Some(serde_json::json!({
                "session_id": id,
                "reason": "Session expired due to inactivity"
            })),
            SessionError::Busy(id) => Some(serde_json::json!({
                "session_id": id,
                "reason": "Another request is mutating this session"
            })),
            _ => None,
        }
    }

    fn severity(&self) -> crate::errors::ErrorSeverity {
        use crate::errors::ErrorSeverity;
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::Engine(_) => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}
