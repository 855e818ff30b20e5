//! Fixed deals with known greedy outcomes.
//!
//! Both decks are built from card arithmetic alone, not by running the
//! simulation and keeping whatever happened:
//!   * `canonical_solved_deck` deals every suit in order so that the
//!     foundations can take a card on every single step.
//!   * `canonical_ace_first_deck` is a shuffled deal with an Ace alone on
//!     the first pile.
//!   * `canonical_unplayable_deck` leaves no move of any kind on the deal,
//!     and none appears while cycling the stock.

use crate::card::{Card, Rank, Suit};
use crate::deck::{DECK_LEN, Deck};
use crate::rules::is_descending_alternating;
use crate::tableau::{NUM_PILES, TABLEAU_CARDS};

/// Deck index of the first card dealt to each tableau pile.
fn pile_start(pile: usize) -> usize {
    pile * (pile + 1) / 2
}

/// Deck indices of the face-up tops after the deal: 0, 2, 5, 9, 14, 20, 27.
pub fn dealt_top_indices() -> [usize; NUM_PILES] {
    std::array::from_fn(|pile| pile_start(pile) + pile)
}

/// A deck the greedy player wins without ever drawing.
///
/// Each pile holds a consecutive slice of the standard order with its
/// smallest card on top, and the stock holds the rest in order. Whatever is
/// the lowest card still out is always the next card its foundation needs.
pub fn canonical_solved_deck() -> Deck {
    let mut cards = *Deck::standard().cards();
    for pile in 0..NUM_PILES {
        cards[pile_start(pile)..=pile_start(pile) + pile].reverse();
    }
    deck_from(cards)
}

/// A shuffled deck with the Ace of Spades swapped to the front, so the
/// first pile is dealt as that single face-up Ace.
pub fn canonical_ace_first_deck() -> Deck {
    let mut cards = *Deck::shuffled(0).cards();
    let ace = Card::new(Suit::Spades, Rank::Ace);
    if let Some(pos) = cards.iter().position(|&c| c == ace) {
        cards.swap(0, pos);
    }
    deck_from(cards)
}

/// Dealt tops: low black cards with nothing that fits on them.
const UNPLAYABLE_TOPS: [(Suit, Rank); NUM_PILES] = [
    (Suit::Clubs, Rank::Two),
    (Suit::Spades, Rank::Two),
    (Suit::Clubs, Rank::Three),
    (Suit::Spades, Rank::Three),
    (Suit::Clubs, Rank::Four),
    (Suit::Spades, Rank::Four),
    (Suit::Clubs, Rank::Five),
];

/// Face-down under the tops: every Ace and every red card that could go
/// onto one of the tops.
const UNPLAYABLE_BURIED: [(usize, Suit, Rank); 10] = [
    (1, Suit::Diamonds, Rank::Ace),
    (3, Suit::Hearts, Rank::Ace),
    (4, Suit::Clubs, Rank::Ace),
    (6, Suit::Spades, Rank::Ace),
    (7, Suit::Diamonds, Rank::Two),
    (8, Suit::Hearts, Rank::Two),
    (10, Suit::Diamonds, Rank::Three),
    (11, Suit::Hearts, Rank::Three),
    (12, Suit::Diamonds, Rank::Four),
    (13, Suit::Hearts, Rank::Four),
];

/// A deck with no move on the deal and none reachable by drawing.
///
/// The greedy player cycles the 24 stock cards once and stops.
pub fn canonical_unplayable_deck() -> Deck {
    let mut slots: [Option<Card>; DECK_LEN] = [None; DECK_LEN];
    for (idx, (suit, rank)) in dealt_top_indices().into_iter().zip(UNPLAYABLE_TOPS) {
        slots[idx] = Some(Card::new(suit, rank));
    }
    for (idx, suit, rank) in UNPLAYABLE_BURIED {
        slots[idx] = Some(Card::new(suit, rank));
    }

    let placed: Vec<Card> = slots.iter().flatten().copied().collect();
    let mut rest = Card::all().filter(|card| !placed.contains(card));
    for slot in slots.iter_mut().filter(|slot| slot.is_none()) {
        *slot = rest.next();
    }

    deck_from(slots.map(|slot| slot.unwrap_or(Card::new(Suit::Diamonds, Rank::Ace))))
}

/// Nothing on the deal or in the stock can move, however often it cycles.
///
/// No visible Ace, no pair of tops that build on each other, and no stock
/// card that builds on a top. No pile starts empty, so Kings never matter.
pub fn is_unplayable_by_local_conditions(deck: &Deck) -> bool {
    let cards = deck.cards();
    let tops = dealt_top_indices().map(|idx| cards[idx]);
    let stock = &cards[TABLEAU_CARDS..];

    if tops.iter().chain(stock).any(|c| c.rank() == Rank::Ace) {
        return false;
    }
    for &a in &tops {
        if tops.iter().any(|&b| is_descending_alternating(a, b)) {
            return false;
        }
        if stock.iter().any(|&s| is_descending_alternating(a, s)) {
            return false;
        }
    }
    true
}

fn deck_from(cards: [Card; DECK_LEN]) -> Deck {
    // Both constructions place each card exactly once.
    match Deck::new(cards) {
        Ok(deck) => deck,
        Err(e) => unreachable!("canonical deck is not a permutation: {e}"),
    }
}
