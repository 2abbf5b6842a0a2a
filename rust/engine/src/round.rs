use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::{ActionError, EngineError};
use crate::hand::{self, Category};
use crate::history::{ActionRecord, RoundRecord};
use crate::rules::{validate_action, ValidatedAction};
use crate::seat::{Action, Seat, SeatKind};

/// Hard cap on consecutive bot turns handled inside one request.
/// Exceeding it means a mis-configured policy is spinning; the round
/// is aborted rather than retried.
pub const BOT_TURN_CAP: usize = 10;

/// Stage of the round. Gates how many community cards are revealed
/// and whether a betting round is active.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    NotStarted,
    PreFlop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Phase {
    /// Community cards visible during this phase.
    pub fn community_len(&self) -> usize {
        match self {
            Phase::NotStarted | Phase::PreFlop => 0,
            Phase::Flop => 3,
            Phase::Turn => 4,
            Phase::River | Phase::Showdown => 5,
        }
    }

    pub fn is_betting(&self) -> bool {
        matches!(
            self,
            Phase::PreFlop | Phase::Flop | Phase::Turn | Phase::River
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundConfig {
    /// Deck seed; `None` draws one from OS entropy per round.
    pub seed: Option<u64>,
    pub small_blind: u32,
    pub big_blind: u32,
    pub starting_stack: u32,
    /// Bot seats joining the single human seat.
    pub bots: usize,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            seed: None,
            small_blind: 1,
            big_blind: 2,
            starting_stack: 200,
            bots: 1,
        }
    }
}

impl RoundConfig {
    /// Seats the table will hold: one human plus at least one bot.
    pub fn seats(&self) -> usize {
        1 + self.bots.max(1)
    }

    /// Rejects tables whose combined chips cannot be counted in the
    /// pot. Once the total fits `u32`, every pot and contribution
    /// addition stays in range for the life of the round.
    pub fn validate(&self) -> Result<(), EngineError> {
        let seats = self.seats();
        if self.starting_stack as u64 * seats as u64 > u32::MAX as u64 {
            return Err(EngineError::StakesOverflow {
                stack: self.starting_stack,
                seats,
            });
        }
        Ok(())
    }
}

/// The best five cards at showdown and their category, reported to
/// the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WinningHand {
    pub category: Category,
    pub cards: Vec<Card>,
}

/// Result of a resolved round. `winning_hand` is `None` for an
/// uncontested fold-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub winners: Vec<usize>,
    pub winning_hand: Option<WinningHand>,
    pub pot: u32,
}

/// A single poker round: deck, seats, community cards, pot, and the
/// betting state machine. Created in `NotStarted`, driven exclusively
/// through [`Round::start`], [`Round::apply`], and the bot-turn
/// helpers; every mutation either completes or leaves the round
/// untouched.
#[derive(Debug)]
pub struct Round {
    config: RoundConfig,
    seed: Option<u64>,
    deck: Deck,
    seats: Vec<Seat>,
    community: Vec<Card>,
    pot: u32,
    phase: Phase,
    current: Option<usize>,
    button: usize,
    small_blind: usize,
    big_blind: usize,
    highest: u32,
    actions: Vec<ActionRecord>,
    outcome: Option<Outcome>,
    message: Option<String>,
}

impl Round {
    pub fn new(mut config: RoundConfig) -> Self {
        // a table needs an opponent: zero bots reads as one
        config.bots = config.bots.max(1);
        let mut seats = Vec::with_capacity(1 + config.bots);
        seats.push(Seat::new("player", SeatKind::Human, config.starting_stack));
        for i in 1..=config.bots {
            seats.push(Seat::new(
                format!("bot-{i}"),
                SeatKind::Bot,
                config.starting_stack,
            ));
        }
        Self {
            config,
            seed: None,
            deck: Deck::new(),
            seats,
            community: Vec::with_capacity(5),
            pot: 0,
            phase: Phase::NotStarted,
            current: None,
            button: 0,
            small_blind: 0,
            big_blind: 0,
            highest: 0,
            actions: Vec::new(),
            outcome: None,
            message: None,
        }
    }

    /// Shuffles with a fresh seed, deals two hole cards per seat,
    /// posts the blinds, and opens the pre-flop betting round.
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.phase != Phase::NotStarted {
            return Err(ActionError::AlreadyStarted.into());
        }
        self.config.validate()?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.seed = Some(seed);
        self.deck.shuffle(seed);
        for seat in &mut self.seats {
            seat.reset_for_round();
        }
        for i in 0..self.seats.len() {
            let cards = self.deck.draw(2)?;
            self.seats[i].give_cards(cards);
        }

        // Heads-up, the button posts the small blind; otherwise the
        // blinds sit directly after it.
        let n = self.seats.len();
        if n == 2 {
            self.small_blind = self.button;
            self.big_blind = (self.button + 1) % n;
        } else {
            self.small_blind = (self.button + 1) % n;
            self.big_blind = (self.button + 2) % n;
        }
        self.post_blind(self.small_blind, self.config.small_blind);
        self.post_blind(self.big_blind, self.config.big_blind);
        self.highest = self
            .seats
            .iter()
            .map(Seat::street_bet)
            .max()
            .unwrap_or(0);

        self.phase = Phase::PreFlop;
        self.message = Some("blinds posted".to_string());
        if self.betting_possible() {
            let first = if n == 2 {
                self.small_blind
            } else {
                (self.big_blind + 1) % n
            };
            self.current = self.first_actor_at(first);
        } else {
            self.advance_phase()?;
        }
        Ok(())
    }

    /// Validates and applies one action for `actor`. Any violation
    /// returns [`EngineError::InvalidAction`] with the round
    /// unmodified; success updates the pot, may advance the phase,
    /// and rotates the turn pointer.
    pub fn apply(&mut self, actor: usize, action: Action) -> Result<(), EngineError> {
        if !self.phase.is_betting() {
            return Err(ActionError::NoBettingRound.into());
        }
        let current = self.current.ok_or(ActionError::NoBettingRound)?;
        if current != actor {
            return Err(ActionError::OutOfTurn {
                expected: current,
                actual: actor,
            }
            .into());
        }
        let to_call = self.to_call(actor);
        let validated = validate_action(
            &self.seats[actor],
            to_call,
            self.config.big_blind,
            self.highest,
            action,
        )?;

        // Nothing below can fail: the action applies atomically.
        match validated {
            ValidatedAction::Fold => self.seats[actor].fold(),
            ValidatedAction::Check => self.seats[actor].mark_acted(),
            ValidatedAction::Call { amount } => {
                let paid = self.seats[actor].commit(amount);
                self.pot += paid;
                self.seats[actor].mark_acted();
            }
            ValidatedAction::Bet { amount } | ValidatedAction::Raise { amount } => {
                let paid = self.seats[actor].commit(amount);
                self.pot += paid;
                self.highest = self.seats[actor].street_bet();
                // every other live seat must answer the new price
                for (i, seat) in self.seats.iter_mut().enumerate() {
                    if i != actor {
                        seat.clear_acted();
                    }
                }
                self.seats[actor].mark_acted();
            }
        }
        self.actions.push(ActionRecord {
            seat: self.seats[actor].name().to_string(),
            phase: self.phase,
            action,
            forced: false,
        });

        let contenders: Vec<usize> = (0..self.seats.len())
            .filter(|&i| self.seats[i].in_contention())
            .collect();
        if contenders.len() == 1 {
            self.finish_uncontested(contenders[0]);
            return Ok(());
        }

        if self.betting_complete() {
            self.advance_phase()?;
        } else {
            self.current = self.first_actor_at((actor + 1) % self.seats.len());
        }
        Ok(())
    }

    /// Plays bot seats forward until a human holds the turn or the
    /// round resolves. Bounded by [`BOT_TURN_CAP`]; hitting the cap is
    /// a policy defect and aborts the round.
    pub fn advance_bots<F>(&mut self, mut decide: F) -> Result<(), EngineError>
    where
        F: FnMut(&Round, usize) -> Action,
    {
        let mut steps = 0;
        while self.current_bot().is_some() {
            if steps == BOT_TURN_CAP {
                return Err(EngineError::BotLoopExceeded { cap: BOT_TURN_CAP });
            }
            self.bot_step(&mut decide)?;
            steps += 1;
        }
        Ok(())
    }

    /// Runs a single bot turn if a bot holds the pointer. Returns
    /// whether a bot acted.
    pub fn bot_step<F>(&mut self, mut decide: F) -> Result<bool, EngineError>
    where
        F: FnMut(&Round, usize) -> Action,
    {
        match self.current_bot() {
            Some(idx) => {
                let action = decide(self, idx);
                self.apply(idx, action)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn pot(&self) -> u32 {
        self.pot
    }
    pub fn community(&self) -> &[Card] {
        &self.community
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }
    pub fn current_turn(&self) -> Option<usize> {
        self.current
    }
    pub fn button(&self) -> usize {
        self.button
    }
    /// (small blind seat, big blind seat); meaningless before start.
    pub fn blinds(&self) -> (usize, usize) {
        (self.small_blind, self.big_blind)
    }
    pub fn min_bet(&self) -> u32 {
        self.config.big_blind
    }
    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
    pub fn config(&self) -> &RoundConfig {
        &self.config
    }
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }
    pub fn deck_remaining(&self) -> usize {
        self.deck.remaining()
    }
    /// Cards not yet dealt, exposed for conservation checks.
    pub fn undealt(&self) -> &[Card] {
        self.deck.undealt()
    }

    /// Chips `seat` owes to match the highest street contribution.
    pub fn to_call(&self, seat: usize) -> u32 {
        self.highest.saturating_sub(self.seats[seat].street_bet())
    }

    pub fn seat_index(&self, name: &str) -> Option<usize> {
        self.seats.iter().position(|s| s.name() == name)
    }

    /// First human seat; the engine supports exactly one.
    pub fn human_seat(&self) -> Option<usize> {
        self.seats.iter().position(|s| !s.is_bot())
    }

    /// History record for the finished (or abandoned) round.
    pub fn record(&self, round_id: String) -> RoundRecord {
        let winners = match &self.outcome {
            Some(outcome) => outcome
                .winners
                .iter()
                .map(|&i| self.seats[i].name().to_string())
                .collect(),
            None => Vec::new(),
        };
        let winning_hand = self
            .outcome
            .as_ref()
            .and_then(|o| o.winning_hand.as_ref())
            .map(|w| w.category.label().to_string());
        RoundRecord {
            round_id,
            seed: self.seed,
            actions: self.actions.clone(),
            community: self.community.clone(),
            winners,
            winning_hand,
            pot: self.pot,
            ts: None,
        }
    }

    fn current_bot(&self) -> Option<usize> {
        self.current.filter(|&i| self.seats[i].is_bot())
    }

    fn post_blind(&mut self, seat: usize, amount: u32) {
        // forced contribution: bypasses validation, all-in for less
        let paid = self.seats[seat].commit(amount);
        self.pot += paid;
        self.actions.push(ActionRecord {
            seat: self.seats[seat].name().to_string(),
            phase: Phase::PreFlop,
            action: Action::Bet(paid),
            forced: true,
        });
    }

    /// First seat able to act, scanning forward from `start`
    /// inclusive. Folded and all-in seats are skipped.
    fn first_actor_at(&self, start: usize) -> Option<usize> {
        let n = self.seats.len();
        (0..n)
            .map(|offset| (start + offset) % n)
            .find(|&i| self.seats[i].can_act())
    }

    /// A betting round still makes sense: either two seats can trade
    /// actions, or a lone actor faces an outstanding bet.
    fn betting_possible(&self) -> bool {
        let mut actors = (0..self.seats.len()).filter(|&i| self.seats[i].can_act());
        match (actors.next(), actors.next()) {
            (None, _) => false,
            (Some(_), Some(_)) => true,
            (Some(lone), None) => self.seats[lone].street_bet() < self.highest,
        }
    }

    /// The street is settled: every seat still able to act has acted
    /// and matched the highest contribution.
    fn betting_complete(&self) -> bool {
        self.seats
            .iter()
            .filter(|s| s.can_act())
            .all(|s| s.has_acted() && s.street_bet() == self.highest)
    }

    /// Deals the next street's community delta and opens its betting
    /// round; runs the board out when no further betting is possible,
    /// resolving showdown after the river.
    fn advance_phase(&mut self) -> Result<(), EngineError> {
        loop {
            let (next, deal) = match self.phase {
                Phase::PreFlop => (Phase::Flop, 3),
                Phase::Flop => (Phase::Turn, 1),
                Phase::Turn => (Phase::River, 1),
                Phase::River => {
                    self.resolve_showdown();
                    return Ok(());
                }
                Phase::NotStarted | Phase::Showdown => unreachable!("no betting round"),
            };
            let mut cards = self.deck.draw(deal)?;
            self.community.append(&mut cards);
            self.phase = next;
            self.highest = 0;
            for seat in &mut self.seats {
                seat.begin_street();
            }
            self.message = Some(
                match next {
                    Phase::Flop => "flop dealt",
                    Phase::Turn => "turn dealt",
                    _ => "river dealt",
                }
                .to_string(),
            );
            if self.betting_possible() {
                self.current = self.first_actor_at((self.button + 1) % self.seats.len());
                return Ok(());
            }
            self.current = None;
        }
    }

    fn finish_uncontested(&mut self, winner: usize) {
        let pot = self.pot;
        self.seats[winner].award(pot);
        self.phase = Phase::Showdown;
        self.current = None;
        self.message = Some(format!("{} wins uncontested", self.seats[winner].name()));
        self.outcome = Some(Outcome {
            winners: vec![winner],
            winning_hand: None,
            pot,
        });
    }

    /// Compares all non-folded seats, splits the pot evenly among the
    /// maximal hands, and assigns the odd remainder chip to the
    /// winning seat nearest the button.
    fn resolve_showdown(&mut self) {
        self.phase = Phase::Showdown;
        self.current = None;

        let mut ranked = Vec::new();
        for (i, seat) in self.seats.iter().enumerate() {
            if !seat.in_contention() {
                continue;
            }
            let mut cards = seat.hole().to_vec();
            cards.extend_from_slice(&self.community);
            ranked.push((i, hand::evaluate(&cards)));
        }
        let best = ranked
            .iter()
            .map(|(_, s)| s.clone())
            .max()
            .expect("at least one contender at showdown");
        let winners: Vec<usize> = ranked
            .iter()
            .filter(|(_, s)| *s == best)
            .map(|&(i, _)| i)
            .collect();

        let pot = self.pot;
        let share = pot / winners.len() as u32;
        let remainder = pot % winners.len() as u32;
        // odd chip goes to the winner first in seating order from the button
        let n = self.seats.len();
        let remainder_seat = (0..n)
            .map(|offset| (self.button + offset) % n)
            .find(|i| winners.contains(i))
            .expect("winner exists");
        for &w in &winners {
            let extra = if w == remainder_seat { remainder } else { 0 };
            self.seats[w].award(share + extra);
        }

        let mut cards = self.seats[winners[0]].hole().to_vec();
        cards.extend_from_slice(&self.community);
        let (five, strength) = hand::best_five(&cards);
        self.message = Some(if winners.len() == 1 {
            format!(
                "showdown: {} wins with {}",
                self.seats[winners[0]].name(),
                strength.category.label()
            )
        } else {
            let names: Vec<&str> = winners.iter().map(|&i| self.seats[i].name()).collect();
            format!("showdown: split pot between {}", names.join(" and "))
        });
        self.outcome = Some(Outcome {
            winners,
            winning_hand: Some(WinningHand {
                category: strength.category,
                cards: five,
            }),
            pot,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    fn card(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    /// Builds a round frozen just before showdown resolution so tie
    /// handling can be exercised with known cards.
    fn rigged_showdown(hole_a: [Card; 2], hole_b: [Card; 2], community: [Card; 5]) -> Round {
        let mut round = Round::new(RoundConfig {
            seed: Some(7),
            ..RoundConfig::default()
        });
        round.seats[0].give_cards(hole_a.to_vec());
        round.seats[1].give_cards(hole_b.to_vec());
        round.seats[0].commit(10);
        round.seats[1].commit(10);
        round.community = community.to_vec();
        round.pot = 20;
        round.phase = Phase::River;
        round
    }

    #[test]
    fn equal_hands_split_the_pot_evenly() {
        // both seats play the board's broadway straight; hole cards
        // are dead kickers of different suits
        let community = [
            card(Rank::Ten, Suit::Clubs),
            card(Rank::Jack, Suit::Diamonds),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::King, Suit::Spades),
            card(Rank::Ace, Suit::Clubs),
        ];
        let mut round = rigged_showdown(
            [card(Rank::Two, Suit::Hearts), card(Rank::Three, Suit::Clubs)],
            [
                card(Rank::Two, Suit::Spades),
                card(Rank::Three, Suit::Diamonds),
            ],
            community,
        );
        let stacks_before: Vec<u32> = round.seats.iter().map(Seat::stack).collect();
        round.resolve_showdown();

        let outcome = round.outcome().expect("resolved");
        assert_eq!(outcome.winners, vec![0, 1]);
        assert_eq!(round.seats[0].stack(), stacks_before[0] + 10);
        assert_eq!(round.seats[1].stack(), stacks_before[1] + 10);
        let hand = outcome.winning_hand.as_ref().expect("showdown hand");
        assert_eq!(hand.category, Category::Straight);
    }

    #[test]
    fn equal_flushes_split_evenly() {
        // the board flush beats both seats' low hearts, so both play
        // the identical five cards
        let community = [
            card(Rank::Ace, Suit::Hearts),
            card(Rank::King, Suit::Hearts),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::Jack, Suit::Hearts),
            card(Rank::Nine, Suit::Hearts),
        ];
        let mut round = rigged_showdown(
            [
                card(Rank::Two, Suit::Hearts),
                card(Rank::Three, Suit::Clubs),
            ],
            [
                card(Rank::Four, Suit::Hearts),
                card(Rank::Five, Suit::Clubs),
            ],
            community,
        );
        let stacks_before: Vec<u32> = round.seats.iter().map(Seat::stack).collect();
        round.resolve_showdown();

        let outcome = round.outcome().expect("resolved");
        assert_eq!(outcome.winners, vec![0, 1]);
        let hand = outcome.winning_hand.as_ref().expect("showdown hand");
        assert_eq!(hand.category, Category::Flush);
        assert_eq!(round.seats[0].stack(), stacks_before[0] + 10);
        assert_eq!(round.seats[1].stack(), stacks_before[1] + 10);
    }

    #[test]
    fn odd_chip_goes_to_the_winner_nearest_the_button() {
        let community = [
            card(Rank::Ten, Suit::Clubs),
            card(Rank::Jack, Suit::Diamonds),
            card(Rank::Queen, Suit::Hearts),
            card(Rank::King, Suit::Spades),
            card(Rank::Ace, Suit::Clubs),
        ];
        let mut round = rigged_showdown(
            [card(Rank::Two, Suit::Hearts), card(Rank::Three, Suit::Clubs)],
            [
                card(Rank::Two, Suit::Spades),
                card(Rank::Three, Suit::Diamonds),
            ],
            community,
        );
        round.pot = 21;
        let stacks_before: Vec<u32> = round.seats.iter().map(Seat::stack).collect();
        round.resolve_showdown();

        // button is seat 0, so it collects the indivisible chip
        assert_eq!(round.seats[0].stack(), stacks_before[0] + 11);
        assert_eq!(round.seats[1].stack(), stacks_before[1] + 10);
    }
}
