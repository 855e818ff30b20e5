//! Error types for deck construction and pile access.
//!
//! "No legal move" is never an error; everything here is either bad input
//! (a malformed deck or layout) or a broken pile invariant.

use thiserror::Error;

use crate::card::{Card, Suit};
use crate::moves::Move;

/// Why a deck or layout failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("deck must hold {expected} cards, found {found}")]
    WrongCount { expected: usize, found: usize },

    #[error("duplicate card {0}")]
    Duplicate(Card),

    #[error("missing card {0}")]
    Missing(Card),

    #[error("could not parse card token {0:?}")]
    BadToken(String),

    #[error("card index {0} out of range 0..=51")]
    IndexOutOfRange(u32),

    #[error("malformed deck list: {0}")]
    MalformedList(&'static str),

    #[error("{suit:?} foundation cannot hold {count} cards")]
    FoundationOverfull { suit: Suit, count: u8 },

    #[error("pile {}: {face_down} face-down cards but only {len} cards", .pile + 1)]
    FaceDownOverflow { pile: usize, face_down: usize, len: usize },

    #[error("pile {}: {lower} cannot sit on {higher}", .pile + 1)]
    BrokenRun { pile: usize, higher: Card, lower: Card },
}

/// Which kind of pile an empty-pile access hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PileKind {
    Tableau,
    Stock,
}

impl std::fmt::Display for PileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PileKind::Tableau => f.write_str("tableau pile"),
            PileKind::Stock => f.write_str("stock"),
        }
    }
}

/// A pop or flip was attempted on an empty pile.
///
/// The move engine checks sizes before it takes cards, so seeing this means
/// an internal invariant broke. The run halts rather than continuing with
/// inconsistent state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("attempted to take a card from an empty {0}")]
pub struct EmptyPile(pub PileKind);

/// Crate-level error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("malformed deck: {0}")]
    MalformedDeck(#[from] DeckError),

    #[error(transparent)]
    EmptyPile(#[from] EmptyPile),

    #[error("move not legal in this position: {0}")]
    IllegalMove(Move),

    #[error("invalid simulation config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
