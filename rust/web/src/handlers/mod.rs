pub mod game;
pub mod health;

pub use game::{
    advance_turn, bot_turn, create_session, delete_session, get_state, new_game, start_game,
    submit_action, ActionRequest, CreateSessionRequest, SessionResponse,
};
