//! Card, Suit, Rank and Color types for a standard 52-card deck.
//!
//! - `Card` is a compact 1-byte representation (0..=51).
//! - `Suit` and `Rank` give human-readable structure on top of that.
//! - Rank order and the suit-to-color mapping are fixed `const` tables;
//!   nothing about them changes at runtime.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DeckError;

/// Number of suits in a standard deck.
pub const NUM_SUITS: u8 = 4;
/// Number of ranks in a standard deck.
pub const NUM_RANKS: u8 = 13;
/// Number of cards in a standard deck.
pub const CARDS_PER_DECK: u8 = NUM_SUITS * NUM_RANKS;

/// A playing card represented compactly as an index in 0..=51.
///
/// The mapping is:
/// ```text
/// index = suit as u8 * 13 + rank as u8
/// ```
/// where `rank` is 0=Ace, 1=Two, ..., 12=King.
///
/// Face state is not part of the card; the pile holding it tracks that.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Card(u8);

/// The four suits, in the order foundations are indexed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Diamonds = 0,
    Hearts = 1,
    Clubs = 2,
    Spades = 3,
}

/// The two card colors.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Color {
    Red,
    Black,
}

/// The thirteen ranks, Ace low.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Rank {
    Ace = 0,
    Two,
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
}

impl Card {
    #[inline]
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Card(suit as u8 * NUM_RANKS + rank as u8)
    }

    /// Create a card from a raw index, rejecting anything outside 0..=51.
    pub fn from_index(index: u32) -> Result<Self, DeckError> {
        if index < CARDS_PER_DECK as u32 {
            Ok(Card(index as u8))
        } else {
            Err(DeckError::IndexOutOfRange(index))
        }
    }

    /// Raw 0..=51 index of this card.
    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn suit(self) -> Suit {
        Suit::ALL[(self.0 / NUM_RANKS) as usize]
    }

    #[inline]
    pub const fn rank(self) -> Rank {
        Rank::ALL[(self.0 % NUM_RANKS) as usize]
    }

    #[inline]
    pub const fn color(self) -> Color {
        self.suit().color()
    }

    #[inline]
    pub fn is_king(self) -> bool {
        self.rank() == Rank::King
    }

    /// Short string like "AH", "7C", "TD", "KS".
    pub fn short_str(self) -> String {
        format!("{}{}", self.rank().short_char(), self.suit().short_char())
    }

    /// Iterate every card of a standard deck, suit-major then rank-minor.
    pub fn all() -> impl Iterator<Item = Card> {
        (0..CARDS_PER_DECK).map(Card)
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_str())
    }
}

/// Parses "AH", "7c", "10D", "TD", "qs".
impl FromStr for Card {
    type Err = DeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim();
        let bad = || DeckError::BadToken(token.to_string());

        let mut chars = token.chars();
        let suit_char = chars.next_back().ok_or_else(bad)?;
        let rank_part = chars.as_str();

        let suit = Suit::from_char(suit_char).ok_or_else(bad)?;
        let rank = match rank_part.to_ascii_uppercase().as_str() {
            "10" => Rank::Ten,
            r if r.len() == 1 => r.chars().next().and_then(Rank::from_char).ok_or_else(bad)?,
            _ => return Err(bad()),
        };
        Ok(Card::new(suit, rank))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Suit {
    /// All suits in foundation order.
    pub const ALL: [Suit; NUM_SUITS as usize] =
        [Suit::Diamonds, Suit::Hearts, Suit::Clubs, Suit::Spades];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub const fn color(self) -> Color {
        match self {
            Suit::Diamonds | Suit::Hearts => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }

    /// Single-character representation: 'D', 'H', 'C', or 'S'.
    #[inline]
    pub const fn short_char(self) -> char {
        match self {
            Suit::Diamonds => 'D',
            Suit::Hearts => 'H',
            Suit::Clubs => 'C',
            Suit::Spades => 'S',
        }
    }

    pub fn from_char(c: char) -> Option<Suit> {
        match c.to_ascii_uppercase() {
            'D' => Some(Suit::Diamonds),
            'H' => Some(Suit::Hearts),
            'C' => Some(Suit::Clubs),
            'S' => Some(Suit::Spades),
            _ => None,
        }
    }
}

impl Rank {
    /// All ranks in their fixed order (Ace..King).
    pub const ALL: [Rank; NUM_RANKS as usize] = [
        Rank::Ace,
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
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Rank number in 1..=13 (Ace=1, King=13).
    #[inline]
    pub const fn number(self) -> u8 {
        self as u8 + 1
    }

    /// The rank directly above this one, `None` for King.
    #[inline]
    pub const fn next(self) -> Option<Rank> {
        match self {
            Rank::King => None,
            r => Some(Rank::ALL[r as usize + 1]),
        }
    }

    /// The rank directly below this one, `None` for Ace.
    #[inline]
    pub const fn prev(self) -> Option<Rank> {
        match self {
            Rank::Ace => None,
            r => Some(Rank::ALL[r as usize - 1]),
        }
    }

    pub const fn short_char(self) -> char {
        match self {
            Rank::Ace => 'A',
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
        }
    }

    pub fn from_char(c: char) -> Option<Rank> {
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.short_char() == c.to_ascii_uppercase())
    }
}
