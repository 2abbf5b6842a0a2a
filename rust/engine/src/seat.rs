use serde::{Deserialize, Serialize};

use crate::cards::Card;

/// Who controls a seat.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatKind {
    Human,
    Bot,
}

/// A betting action submitted for a seat. Amounts accompany bet and
/// raise only; every other kind ignores them.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Fold,
    Check,
    Call,
    Bet(u32),
    Raise(u32),
}

/// A participant slot in the round: identity, chip stack, current
/// contributions, hole cards, and fold/all-in state.
#[derive(Debug, Clone)]
pub struct Seat {
    name: String,
    kind: SeatKind,
    stack: u32,
    round_bet: u32,
    street_bet: u32,
    hole: Vec<Card>,
    folded: bool,
    all_in: bool,
    acted: bool,
}

impl Seat {
    pub fn new(name: impl Into<String>, kind: SeatKind, stack: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            stack,
            round_bet: 0,
            street_bet: 0,
            hole: Vec::with_capacity(2),
            folded: false,
            all_in: false,
            acted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn kind(&self) -> SeatKind {
        self.kind
    }
    pub fn is_bot(&self) -> bool {
        self.kind == SeatKind::Bot
    }
    pub fn stack(&self) -> u32 {
        self.stack
    }
    /// Chips contributed over the whole round; never decreases while
    /// the round is live.
    pub fn round_bet(&self) -> u32 {
        self.round_bet
    }
    /// Chips contributed during the current betting street.
    pub fn street_bet(&self) -> u32 {
        self.street_bet
    }
    pub fn hole(&self) -> &[Card] {
        &self.hole
    }
    pub fn folded(&self) -> bool {
        self.folded
    }
    pub fn all_in(&self) -> bool {
        self.all_in
    }
    pub fn has_acted(&self) -> bool {
        self.acted
    }

    /// Seat can still take betting actions this street.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.all_in
    }

    /// Seat still competes for the pot.
    pub fn in_contention(&self) -> bool {
        !self.folded
    }

    pub(crate) fn give_cards(&mut self, cards: Vec<Card>) {
        debug_assert!(self.hole.len() + cards.len() <= 2);
        self.hole.extend(cards);
    }

    /// Moves up to `amount` chips toward the pot; a short stack goes
    /// all-in for less. Returns the chips actually committed.
    pub(crate) fn commit(&mut self, amount: u32) -> u32 {
        let paid = amount.min(self.stack);
        self.stack -= paid;
        self.round_bet += paid;
        self.street_bet += paid;
        if self.stack == 0 {
            self.all_in = true;
        }
        paid
    }

    pub(crate) fn fold(&mut self) {
        self.folded = true;
    }

    pub(crate) fn mark_acted(&mut self) {
        self.acted = true;
    }

    pub(crate) fn clear_acted(&mut self) {
        self.acted = false;
    }

    /// Resets per-street tracking when a new betting round opens. The
    /// cumulative round contribution is untouched.
    pub(crate) fn begin_street(&mut self) {
        self.street_bet = 0;
        self.acted = false;
    }

    /// Resets everything a fresh deal replaces.
    pub(crate) fn reset_for_round(&mut self) {
        self.hole.clear();
        self.round_bet = 0;
        self.street_bet = 0;
        self.folded = false;
        self.all_in = false;
        self.acted = false;
    }

    pub(crate) fn award(&mut self, chips: u32) {
        self.stack = self.stack.saturating_add(chips);
    }
}
