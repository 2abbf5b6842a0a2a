use std::collections::HashSet;

use holdem_engine::{Deck, EngineError};

#[test]
fn fresh_deck_holds_fifty_two_unique_cards() {
    let mut deck = Deck::new();
    deck.shuffle(1);
    let cards = deck.draw(52).expect("full deck");
    let unique: HashSet<_> = cards.iter().collect();
    assert_eq!(unique.len(), 52);
}

#[test]
fn same_seed_produces_the_same_order() {
    let mut a = Deck::new();
    let mut b = Deck::new();
    a.shuffle(42);
    b.shuffle(42);
    assert_eq!(a.draw(52).expect("a"), b.draw(52).expect("b"));
}

#[test]
fn different_seeds_produce_different_orders() {
    let mut a = Deck::new();
    let mut b = Deck::new();
    a.shuffle(1);
    b.shuffle(2);
    assert_ne!(a.draw(10).expect("a"), b.draw(10).expect("b"));
}

#[test]
fn reshuffle_restores_the_full_deck() {
    let mut deck = Deck::new();
    deck.shuffle(1);
    deck.draw(20).expect("draw");
    assert_eq!(deck.remaining(), 32);
    deck.shuffle(2);
    assert_eq!(deck.remaining(), 52);
}

#[test]
fn overdraw_is_an_empty_deck_error() {
    let mut deck = Deck::new();
    deck.shuffle(1);
    deck.draw(50).expect("draw");

    let err = deck.draw(3).expect_err("only two cards left");
    assert!(matches!(
        err,
        EngineError::EmptyDeck {
            requested: 3,
            remaining: 2
        }
    ));
    assert!(err.is_fatal());
}
