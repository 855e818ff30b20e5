//! Game-level state: tableau, foundations and stock.
//!
//! `GameState` is the single mutable aggregate the move engine and the
//! simulation loop work on. It is created once per run, either by dealing a
//! validated `Deck` or from an explicit `Layout`, and it is owned by exactly
//! one caller for its whole life.
//!
//! Observers never see the live state; they get a `Snapshot`, an owned copy
//! that can be compared, logged or serialized to JSON.

use serde::Serialize;

use crate::card::{CARDS_PER_DECK, Card, NUM_RANKS, NUM_SUITS, Suit};
use crate::deck::{Deck, check_permutation};
use crate::error::{DeckError, Result};
use crate::foundation::Foundations;
use crate::rules::is_descending_alternating;
use crate::stock::Stock;
use crate::tableau::{NUM_PILES, Pile, PileSnapshot, Tableau};

/// Complete description of a game position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameState {
    pub tableau: Tableau,
    pub foundations: Foundations,
    pub stock: Stock,
}

/// An explicit position, for starting somewhere other than a fresh deal.
///
/// Piles are bottom-to-top with a face-down count; the stock lists the
/// exposed card first; foundations are given as a card count per suit in
/// `Suit::ALL` order (they can only ever hold A..n).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Layout {
    pub piles: [(Vec<Card>, usize); NUM_PILES],
    pub stock: Vec<Card>,
    pub foundations: [u8; NUM_SUITS as usize],
}

impl GameState {
    /// Deal `deck` into a fresh game: 28 cards to the tableau, the other 24
    /// to the stock with the first of them exposed.
    pub fn new(deck: &Deck) -> Self {
        let (tableau, rest) = Tableau::deal(deck.cards());
        GameState {
            tableau,
            foundations: Foundations::new(),
            stock: Stock::new(rest),
        }
    }

    /// Build a position from raw cards.
    ///
    /// Every card must appear once, no foundation may hold more than a
    /// suit, and each pile's face-up cards must form a valid build.
    pub fn from_layout(layout: Layout) -> Result<Self> {
        for (suit, &count) in Suit::ALL.iter().zip(&layout.foundations) {
            if count > NUM_RANKS {
                return Err(DeckError::FoundationOverfull { suit: *suit, count }.into());
            }
        }
        let foundations = Foundations::from_counts(layout.foundations);

        let mut all: Vec<Card> = Vec::with_capacity(CARDS_PER_DECK as usize);
        for suit in Suit::ALL {
            all.extend_from_slice(foundations.pile(suit));
        }
        for (cards, _) in &layout.piles {
            all.extend_from_slice(cards);
        }
        all.extend_from_slice(&layout.stock);
        check_permutation(&all)?;

        let mut tableau = Tableau::new_empty();
        for (i, (slot, (cards, face_down))) in tableau.piles.iter_mut().zip(layout.piles).enumerate() {
            let len = cards.len();
            let pile = Pile::with_face_down(cards, face_down)
                .ok_or(DeckError::FaceDownOverflow { pile: i, face_down, len })?;
            if let Some(pair) = pile
                .face_up_run()
                .windows(2)
                .find(|pair| !is_descending_alternating(pair[0], pair[1]))
            {
                return Err(DeckError::BrokenRun {
                    pile: i,
                    higher: pair[0],
                    lower: pair[1],
                }
                .into());
            }
            *slot = pile;
        }

        Ok(GameState {
            tableau,
            foundations,
            stock: Stock::new(&layout.stock),
        })
    }

    /// All foundations full, tableau and stock empty.
    pub fn is_complete(&self) -> bool {
        self.stock.is_empty() && self.tableau.is_empty() && self.foundations.is_complete()
    }

    /// Cards across every pile. Always 52 for a consistent state.
    pub fn card_count(&self) -> usize {
        self.tableau.total_cards() + self.foundations.total_cards() + self.stock.len()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            stock: self.stock.iter().collect(),
            tableau: self.tableau.snapshot(),
            foundations: Suit::ALL
                .iter()
                .map(|&s| self.foundations.pile(s).to_vec())
                .collect(),
        }
    }
}

/// Read-only copy of a position for reporting.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Exposed card first.
    pub stock: Vec<Card>,
    pub tableau: Vec<PileSnapshot>,
    /// One entry per suit in `Suit::ALL` order, Ace first.
    pub foundations: Vec<Vec<Card>>,
}

impl Snapshot {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Every card in the snapshot, in no particular order.
    pub fn all_cards(&self) -> impl Iterator<Item = Card> + '_ {
        self.stock
            .iter()
            .chain(self.tableau.iter().flat_map(|p| p.cards.iter()))
            .chain(self.foundations.iter().flatten())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Rank;
    use crate::error::Error;
    use crate::tableau::TABLEAU_CARDS;

    #[test]
    fn new_game_deals_everything() {
        let deck = Deck::shuffled(11);
        let game = GameState::new(&deck);

        assert_eq!(game.card_count(), 52);
        assert_eq!(game.tableau.total_cards(), TABLEAU_CARDS);
        assert_eq!(game.stock.len(), 52 - TABLEAU_CARDS);
        assert_eq!(game.stock.exposed(), Some(deck.cards()[TABLEAU_CARDS]));
        assert_eq!(game.foundations.total_cards(), 0);
        assert!(!game.is_complete());
    }

    #[test]
    fn snapshot_holds_every_card_once() {
        let game = GameState::new(&Deck::shuffled(3));
        let snap = game.snapshot();
        let cards: Vec<Card> = snap.all_cards().collect();
        assert_eq!(cards.len(), 52);
        assert!(check_permutation(&cards).is_ok());
        assert_eq!(snap.tableau.len(), NUM_PILES);
        assert_eq!(snap.foundations.len(), 4);
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let game = GameState::new(&Deck::standard());
        let json = game.snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["stock"][0], "3C");
        assert_eq!(value["tableau"][0]["cards"][0], "AD");
        assert_eq!(value["tableau"][6]["num_face_down"], 6);
    }

    #[test]
    fn layout_round_trips_a_won_game() {
        let game = GameState::from_layout(Layout {
            foundations: [13; 4],
            ..Layout::default()
        })
        .unwrap();
        assert!(game.is_complete());
        assert_eq!(game.card_count(), 52);
    }

    #[test]
    fn layout_rejects_missing_and_duplicate_cards() {
        let missing = GameState::from_layout(Layout {
            foundations: [13, 13, 13, 12],
            ..Layout::default()
        });
        assert_eq!(
            missing,
            Err(Error::MalformedDeck(DeckError::Missing(Card::new(Suit::Spades, Rank::King))))
        );

        let mut layout = Layout {
            foundations: [13, 13, 13, 12],
            ..Layout::default()
        };
        layout.stock = vec![Card::new(Suit::Spades, Rank::King), Card::new(Suit::Spades, Rank::Ace)];
        assert_eq!(
            GameState::from_layout(layout),
            Err(Error::MalformedDeck(DeckError::Duplicate(Card::new(Suit::Spades, Rank::Ace))))
        );
    }

    #[test]
    fn layout_rejects_overfull_foundation() {
        let result = GameState::from_layout(Layout {
            foundations: [13, 14, 13, 12],
            ..Layout::default()
        });
        let err = DeckError::FoundationOverfull { suit: Suit::Hearts, count: 14 };
        assert_eq!(err.to_string(), "Hearts foundation cannot hold 14 cards");
        assert_eq!(result, Err(Error::MalformedDeck(err)));
    }

    fn c(s: &str) -> Card {
        s.parse().unwrap()
    }

    /// Foundations hold everything but Diamonds 9..K, which go to pile 1.
    fn diamonds_layout(pile: Vec<Card>, face_down: usize) -> Layout {
        let mut layout = Layout {
            foundations: [8, 13, 13, 13],
            ..Layout::default()
        };
        layout.piles[0] = (pile, face_down);
        layout
    }

    #[test]
    fn layout_rejects_too_many_face_down_cards() {
        let pile: Vec<Card> = ["9D", "TD", "JD", "QD", "KD"].map(c).to_vec();
        let result = GameState::from_layout(diamonds_layout(pile.clone(), 6));
        assert_eq!(
            result,
            Err(Error::MalformedDeck(DeckError::FaceDownOverflow { pile: 0, face_down: 6, len: 5 }))
        );
        assert!(GameState::from_layout(diamonds_layout(pile, 5)).is_ok());
    }

    #[test]
    fn layout_rejects_broken_face_up_run() {
        // Same colour, so TD cannot sit on JD face-up.
        let pile: Vec<Card> = ["9D", "KD", "QD", "JD", "TD"].map(c).to_vec();
        let result = GameState::from_layout(diamonds_layout(pile.clone(), 3));
        assert_eq!(
            result,
            Err(Error::MalformedDeck(DeckError::BrokenRun { pile: 0, higher: c("JD"), lower: c("TD") }))
        );
        // Hidden cards are not checked.
        assert!(GameState::from_layout(diamonds_layout(pile, 4)).is_ok());
    }
}
