//! Texas hold'em round engine.
//!
//! The engine owns one round at a time: a seeded deck, the seats, the
//! community board, and the betting state machine that moves a round
//! from the deal through showdown. It performs no I/O beyond the
//! optional JSONL round history and knows nothing about transports or
//! bot strategies; callers submit [`seat::Action`]s and drive bot
//! seats through [`round::Round::advance_bots`] with a policy closure.

pub mod cards;
pub mod deck;
pub mod errors;
pub mod hand;
pub mod history;
pub mod round;
pub mod rules;
pub mod seat;

pub use cards::{Card, Rank, Suit};
pub use deck::Deck;
pub use errors::{ActionError, EngineError};
pub use hand::{Category, HandStrength};
pub use history::{RoundLogger, RoundRecord};
pub use round::{Outcome, Phase, Round, RoundConfig, WinningHand, BOT_TURN_CAP};
pub use seat::{Action, Seat, SeatKind};
