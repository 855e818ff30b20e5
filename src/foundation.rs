//! The four per-suit foundation piles.

use serde::Serialize;

use crate::card::{Card, NUM_RANKS, NUM_SUITS, Rank, Suit};
use crate::rules::is_next_foundation_rank;

/// One pile per suit, indexed by `Suit::index()`.
///
/// Each pile only ever holds A, 2, ..., n of its own suit, so the number of
/// cards it holds is also its top rank number.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Foundations {
    piles: [Vec<Card>; NUM_SUITS as usize],
}

impl Foundations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `card` onto its suit's pile if it is the next rank.
    ///
    /// Returns `false` and changes nothing otherwise, so callers can probe
    /// speculatively and only remove the card from its source on `true`.
    pub fn try_accept(&mut self, card: Card) -> bool {
        let pile = &mut self.piles[card.suit().index()];
        let top = pile.last().map(|c| c.rank());
        if is_next_foundation_rank(top, card.rank()) {
            pile.push(card);
            true
        } else {
            false
        }
    }

    /// Check without mutating.
    pub fn accepts(&self, card: Card) -> bool {
        is_next_foundation_rank(self.top_rank(card.suit()), card.rank())
    }

    pub fn top_rank(&self, suit: Suit) -> Option<Rank> {
        self.piles[suit.index()].last().map(|c| c.rank())
    }

    /// Cards held for `suit`, Ace first.
    pub fn pile(&self, suit: Suit) -> &[Card] {
        &self.piles[suit.index()]
    }

    pub fn len(&self, suit: Suit) -> usize {
        self.piles[suit.index()].len()
    }

    pub fn total_cards(&self) -> usize {
        self.piles.iter().map(Vec::len).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.piles.iter().all(|p| p.len() == NUM_RANKS as usize)
    }

    /// Rebuild from counts per suit (in `Suit::ALL` order).
    pub(crate) fn from_counts(counts: [u8; NUM_SUITS as usize]) -> Self {
        let mut f = Self::new();
        for (suit, &count) in Suit::ALL.iter().zip(counts.iter()) {
            let n = usize::from(count).min(NUM_RANKS as usize);
            f.piles[suit.index()] = Rank::ALL[..n].iter().map(|&r| Card::new(*suit, r)).collect();
        }
        f
    }
}
