//! Validated 52-card decks and the ways to obtain one.
//!
//! The simulation never shuffles: it is handed a `Deck` in dealing order.
//! This module gives callers three ways to produce one:
//!   * the standard suit-ordered deck,
//!   * a deterministic ChaCha8 shuffle from a 64-bit seed,
//!   * parsing text, either card tokens (`"AH 10C QS ..."`) or a bracketed
//!     index list (`"[51, 32, 3, ...]"`, each entry a `Card::index()`).

use core::fmt;
use core::str::FromStr;

use rand::SeedableRng;
use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::card::{CARDS_PER_DECK, Card, Rank, Suit};
use crate::error::DeckError;

/// Local convenience: our deck length as `usize`.
pub const DECK_LEN: usize = CARDS_PER_DECK as usize;

const FILLER: Card = Card::new(Suit::Diamonds, Rank::Ace);

/// An ordered permutation of all 52 cards, in dealing order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Deck([Card; DECK_LEN]);

impl Deck {
    /// Validate `cards` as exactly one of each card.
    pub fn new<I: IntoIterator<Item = Card>>(cards: I) -> Result<Self, DeckError> {
        let cards: Vec<Card> = cards.into_iter().collect();
        if cards.len() != DECK_LEN {
            return Err(DeckError::WrongCount {
                expected: DECK_LEN,
                found: cards.len(),
            });
        }
        check_permutation(&cards)?;

        let mut deck = [FILLER; DECK_LEN];
        deck.copy_from_slice(&cards);
        Ok(Deck(deck))
    }

    /// Standard deck: suits in `Suit::ALL` order, Ace..King within a suit.
    pub fn standard() -> Self {
        let mut deck = [FILLER; DECK_LEN];
        for (slot, card) in deck.iter_mut().zip(Card::all()) {
            *slot = card;
        }
        Deck(deck)
    }

    /// Standard deck shuffled with a ChaCha8 stream seeded from `seed`.
    ///
    /// Same seed, same deck, on every platform.
    pub fn shuffled(seed: u64) -> Self {
        let mut deck = Self::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        deck.0.shuffle(&mut rng);
        deck
    }

    pub fn cards(&self) -> &[Card; DECK_LEN] {
        &self.0
    }

    /// Parse a bracketed index list such as `"[51, 32, 3, ...]"`.
    pub fn from_index_list(s: &str) -> Result<Self, DeckError> {
        let open = s.find('[').ok_or(DeckError::MalformedList("missing '['"))?;
        let close = s.rfind(']').ok_or(DeckError::MalformedList("missing ']'"))?;
        if close <= open {
            return Err(DeckError::MalformedList("']' before '['"));
        }

        let cards = s[open + 1..close]
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| {
                t.parse::<u32>()
                    .map_err(|_| DeckError::BadToken(t.to_string()))
                    .and_then(Card::from_index)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Deck::new(cards)
    }

    /// Parse card tokens separated by whitespace and/or commas.
    pub fn from_card_tokens(s: &str) -> Result<Self, DeckError> {
        let cards = s
            .split(|ch: char| ch.is_whitespace() || ch == ',')
            .filter(|t| !t.is_empty())
            .map(str::parse::<Card>)
            .collect::<Result<Vec<_>, _>>()?;
        Deck::new(cards)
    }

    /// Parse every deck in `text`, one per non-blank line.
    ///
    /// Anything after a `#` is a comment. Errors carry the 1-based line.
    pub fn parse_many(text: &str) -> Result<Vec<Deck>, (usize, DeckError)> {
        let mut out = Vec::new();
        for (lineno, line) in text.lines().enumerate() {
            let body = line.split('#').next().unwrap_or("").trim();
            if body.is_empty() {
                continue;
            }
            out.push(body.parse().map_err(|e| (lineno + 1, e))?);
        }
        Ok(out)
    }
}

/// Every card at most once; anything short of 52 reports the first gap.
pub(crate) fn check_permutation(cards: &[Card]) -> Result<(), DeckError> {
    let mut seen = [false; DECK_LEN];
    for &card in cards {
        let slot = &mut seen[card.index() as usize];
        if *slot {
            return Err(DeckError::Duplicate(card));
        }
        *slot = true;
    }
    if let Some(missing) = Card::all().find(|c| !seen[c.index() as usize]) {
        return Err(DeckError::Missing(missing));
    }
    Ok(())
}

impl FromStr for Deck {
    type Err = DeckError;

    /// Bracketed index lists and card-token lists are both accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.contains('[') {
            Deck::from_index_list(s)
        } else {
            Deck::from_card_tokens(s)
        }
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, card) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{card}")?;
        }
        Ok(())
    }
}

impl Serialize for Deck {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.as_slice().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cards = Vec::<Card>::deserialize(deserializer)?;
        Deck::new(cards).map_err(serde::de::Error::custom)
    }
}
