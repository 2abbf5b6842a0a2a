use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

use crate::cards::{full_deck, Card};
use crate::errors::EngineError;

/// Shuffled draw pile. Rebuilt and reshuffled when a round starts and
/// never replenished while the round is live.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    position: usize,
}

impl Deck {
    /// Fresh deck in reference order; call [`Deck::shuffle`] before
    /// dealing for play.
    pub fn new() -> Self {
        Self {
            cards: full_deck(),
            position: 0,
        }
    }

    /// Rebuilds the full 52-card universe and applies a uniformly
    /// random permutation. Each round supplies a fresh seed.
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        self.cards = full_deck();
        self.cards.shuffle(&mut rng);
        self.position = 0;
    }

    /// Removes and returns the next `n` cards. A round draws at most
    /// 5 + 2 cards per seat, so exhaustion signals an engine defect
    /// rather than normal play.
    pub fn draw(&mut self, n: usize) -> Result<Vec<Card>, EngineError> {
        let remaining = self.remaining();
        if remaining < n {
            return Err(EngineError::EmptyDeck {
                requested: n,
                remaining,
            });
        }
        let drawn = self.cards[self.position..self.position + n].to_vec();
        self.position += n;
        Ok(drawn)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len() - self.position
    }

    /// Cards not yet dealt, exposed for conservation checks.
    pub fn undealt(&self) -> &[Card] {
        &self.cards[self.position..]
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}
