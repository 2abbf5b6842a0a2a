use serde::{Deserialize, Serialize};

use crate::cards::{Card, Rank, Suit};

/// Poker hand category, weakest to strongest. Ordering is the
/// showdown ordering.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    HighCard,
    Pair,
    TwoPair,
    ThreeOfAKind,
    Straight,
    Flush,
    FullHouse,
    FourOfAKind,
    StraightFlush,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::HighCard => "high card",
            Category::Pair => "pair",
            Category::TwoPair => "two pair",
            Category::ThreeOfAKind => "three of a kind",
            Category::Straight => "straight",
            Category::Flush => "flush",
            Category::FullHouse => "full house",
            Category::FourOfAKind => "four of a kind",
            Category::StraightFlush => "straight flush",
        }
    }
}

/// Total-ordered strength of a best-five hand. Kickers are rank values
/// ordered high to low; equal category and kickers means a split pot.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub struct HandStrength {
    pub category: Category,
    pub kickers: [u8; 5],
}

/// Ranks the best 5-card combination inside a 5-to-7 card candidate
/// set (hole cards plus revealed community cards).
pub fn evaluate(cards: &[Card]) -> HandStrength {
    debug_assert!((5..=7).contains(&cards.len()));

    let mut rank_counts = [0u8; 15]; // indices 2..=14 used
    let mut rank_mask = 0u16;
    let mut suit_masks = [0u16; 4];
    let mut suit_counts = [0u8; 4];
    for &c in cards {
        let r = c.rank as u8;
        let s = suit_index(c.suit);
        rank_counts[r as usize] += 1;
        rank_mask |= 1 << r;
        suit_masks[s] |= 1 << r;
        suit_counts[s] += 1;
    }

    let flush_suit = (0..4).find(|&s| suit_counts[s] >= 5);

    if let Some(s) = flush_suit {
        if let Some(high) = straight_high(suit_masks[s]) {
            return strength(Category::StraightFlush, &[high]);
        }
    }

    if let Some((quad, kicker)) = find_quads(&rank_counts) {
        return strength(Category::FourOfAKind, &[quad, kicker]);
    }

    if let Some((trips, pair)) = find_full_house(&rank_counts) {
        return strength(Category::FullHouse, &[trips, pair]);
    }

    if let Some(s) = flush_suit {
        let ranks = ranks_desc(suit_masks[s]);
        return strength(Category::Flush, &ranks[..5]);
    }

    if let Some(high) = straight_high(rank_mask) {
        return strength(Category::Straight, &[high]);
    }

    let (trips, pairs, singles) = group_by_count(&rank_counts);
    if let Some(&t) = trips.first() {
        let mut kickers = vec![t];
        kickers.extend(merge_desc(&pairs, &singles).into_iter().take(2));
        return strength(Category::ThreeOfAKind, &kickers);
    }
    if pairs.len() >= 2 {
        let mut kickers = vec![pairs[0], pairs[1]];
        // remaining pair ranks compete with singles for the odd kicker
        let rest = merge_desc(&pairs[2..], &singles);
        kickers.extend(rest.into_iter().take(1));
        return strength(Category::TwoPair, &kickers);
    }
    if let Some(&p) = pairs.first() {
        let mut kickers = vec![p];
        kickers.extend(singles.iter().copied().take(3));
        return strength(Category::Pair, &kickers);
    }

    strength(Category::HighCard, &singles[..5.min(singles.len())])
}

/// Selects the winning 5-card combination for reporting alongside the
/// strength that `evaluate` would assign it.
pub fn best_five(cards: &[Card]) -> (Vec<Card>, HandStrength) {
    let n = cards.len();
    debug_assert!((5..=7).contains(&n));
    if n == 5 {
        return (cards.to_vec(), evaluate(cards));
    }

    let mut best: Option<(Vec<Card>, HandStrength)> = None;
    for mask in 0u32..(1 << n) {
        if mask.count_ones() != 5 {
            continue;
        }
        let five: Vec<Card> = (0..n)
            .filter(|i| mask & (1 << i) != 0)
            .map(|i| cards[i])
            .collect();
        let s = evaluate(&five);
        if best.as_ref().map_or(true, |(_, b)| s > *b) {
            best = Some((five, s));
        }
    }
    best.expect("at least one 5-card subset")
}

fn strength(category: Category, kickers: &[u8]) -> HandStrength {
    let mut k = [0u8; 5];
    k[..kickers.len()].copy_from_slice(kickers);
    HandStrength {
        category,
        kickers: k,
    }
}

fn suit_index(s: Suit) -> usize {
    match s {
        Suit::Hearts => 0,
        Suit::Diamonds => 1,
        Suit::Clubs => 2,
        Suit::Spades => 3,
    }
}

/// Highest straight top card in a rank bitmask, treating the Ace as
/// both high and low. The wheel (A-2-3-4-5) reports 5, ranking it
/// below 2-3-4-5-6.
fn straight_high(mask: u16) -> Option<u8> {
    let mut m = mask;
    if m & (1 << Rank::Ace as u8) != 0 {
        m |= 1 << 1;
    }
    for high in (5..=14u8).rev() {
        let window = 0b1_1111u16 << (high - 4);
        if m & window == window {
            return Some(high);
        }
    }
    None
}

fn ranks_desc(mask: u16) -> Vec<u8> {
    (2..=14u8).rev().filter(|&r| mask & (1 << r) != 0).collect()
}

fn find_quads(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let quad = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 4)?;
    let kicker = (2..=14u8)
        .rev()
        .find(|&r| r != quad && rank_counts[r as usize] > 0)
        .unwrap_or(0);
    Some((quad, kicker))
}

fn find_full_house(rank_counts: &[u8; 15]) -> Option<(u8, u8)> {
    let mut trips = (2..=14u8).rev().filter(|&r| rank_counts[r as usize] == 3);
    let top = trips.next()?;
    // a second set of trips fills the pair slot
    if let Some(second) = trips.next() {
        return Some((top, second));
    }
    let pair = (2..=14u8).rev().find(|&r| rank_counts[r as usize] == 2)?;
    Some((top, pair))
}

/// Rank values holding exactly three, two, and one card, each list
/// ordered high to low.
fn group_by_count(rank_counts: &[u8; 15]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut trips = Vec::new();
    let mut pairs = Vec::new();
    let mut singles = Vec::new();
    for r in (2..=14u8).rev() {
        match rank_counts[r as usize] {
            3 => trips.push(r),
            2 => pairs.push(r),
            1 => singles.push(r),
            _ => {}
        }
    }
    (trips, pairs, singles)
}

fn merge_desc(a: &[u8], b: &[u8]) -> Vec<u8> {
    let mut out: Vec<u8> = a.iter().chain(b.iter()).copied().collect();
    out.sort_unstable_by(|x, y| y.cmp(x));
    out
}
