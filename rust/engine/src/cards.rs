use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// One of the four suits in a standard 52-card deck.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Suit {
    Hearts,
    Diamonds,
    Clubs,
    Spades,
}

/// Card rank from Two through Ace. The discriminant backs hand
/// comparison; Ace is high (14) except when it completes a wheel
/// straight, which the evaluator handles separately.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub enum Rank {
    Two = 2,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

/// A single playing card. Exactly 52 distinct values exist; the deck,
/// hole cards, and community cards all share this type.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

/// The 52-card universe in a fixed reference order.
pub fn full_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    for &suit in &ALL_SUITS {
        for &rank in &ALL_RANKS {
            cards.push(Card { rank, suit });
        }
    }
    cards
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("not a card component: {0}")]
pub struct ParseCardError(String);

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Suit::Hearts => "hearts",
            Suit::Diamonds => "diamonds",
            Suit::Clubs => "clubs",
            Suit::Spades => "spades",
        };
        f.write_str(name)
    }
}

impl FromStr for Suit {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hearts" => Ok(Suit::Hearts),
            "diamonds" => Ok(Suit::Diamonds),
            "clubs" => Ok(Suit::Clubs),
            "spades" => Ok(Suit::Spades),
            other => Err(ParseCardError(other.to_string())),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
            Rank::Ace => "A",
        };
        f.write_str(name)
    }
}

impl FromStr for Rank {
    type Err = ParseCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2" => Ok(Rank::Two),
            "3" => Ok(Rank::Three),
            "4" => Ok(Rank::Four),
            "5" => Ok(Rank::Five),
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            other => Err(ParseCardError(other.to_string())),
        }
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.rank, self.suit)
    }
}

// Wire format: `{"value": "A", "suit": "hearts"}`, the shape the
// presentation layer keys card images off.
#[derive(Serialize, Deserialize)]
struct CardRepr {
    value: String,
    suit: String,
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        CardRepr {
            value: self.rank.to_string(),
            suit: self.suit.to_string(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = CardRepr::deserialize(deserializer)?;
        let rank = repr.value.parse().map_err(D::Error::custom)?;
        let suit = repr.suit.parse().map_err(D::Error::custom)?;
        Ok(Card { rank, suit })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_deck_has_52_unique_cards() {
        let deck = full_deck();
        assert_eq!(deck.len(), 52);
        let unique: std::collections::HashSet<_> = deck.iter().collect();
        assert_eq!(unique.len(), 52);
    }

    #[test]
    fn card_serializes_to_value_and_suit() {
        let card = Card {
            rank: Rank::Ten,
            suit: Suit::Spades,
        };
        let json = serde_json::to_value(card).expect("serialize");
        assert_eq!(json["value"], "10");
        assert_eq!(json["suit"], "spades");
    }

    #[test]
    fn card_roundtrips_through_json() {
        for card in full_deck() {
            let json = serde_json::to_string(&card).expect("serialize");
            let back: Card = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(card, back);
        }
    }

    #[test]
    fn face_down_placeholder_is_not_a_card() {
        let err = serde_json::from_str::<Card>(r#"{"value":"back","suit":"card_back"}"#);
        assert!(err.is_err());
    }
}
