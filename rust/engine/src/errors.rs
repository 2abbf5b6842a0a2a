use thiserror::Error;

/// Recoverable betting-rule violations. The round is left untouched;
/// the caller may resubmit a corrected action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    #[error("no betting round is active")]
    NoBettingRound,
    #[error("round has already started")]
    AlreadyStarted,
    #[error("seat {actual} acted out of turn (expected seat {expected})")]
    OutOfTurn { expected: usize, actual: usize },
    #[error("seat has already folded")]
    SeatFolded,
    #[error("cannot check facing a bet of {to_call}")]
    CheckFacingBet { to_call: u32 },
    #[error("amount {amount} is below the minimum stake of {minimum}")]
    BelowMinimum { amount: u32, minimum: u32 },
    #[error("amount {amount} exceeds the remaining stack of {stack}")]
    ExceedsStack { amount: u32, stack: u32 },
    #[error("total contribution {total} does not exceed the current bet of {highest}")]
    MustExceedHighest { total: u32, highest: u32 },
    #[error("unknown seat: {0}")]
    UnknownSeat(String),
}

/// Round-level failures. `InvalidAction` and `StakesOverflow` are
/// recoverable with corrected input; the other variants signal an
/// engine defect and the round must be abandoned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("invalid action: {0}")]
    InvalidAction(#[from] ActionError),
    #[error("deck exhausted: requested {requested} with {remaining} remaining")]
    EmptyDeck { requested: usize, remaining: usize },
    #[error("bot auto-play exceeded {cap} turns without reaching a human seat or showdown")]
    BotLoopExceeded { cap: usize },
    #[error("{seats} stacks of {stack} chips overflow the pot counter")]
    StakesOverflow { stack: u32, seats: usize },
}

impl EngineError {
    /// Fatal errors terminate the round; only a new game recovers.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            EngineError::InvalidAction(_) | EngineError::StakesOverflow { .. }
        )
    }
}
