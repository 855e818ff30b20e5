//! Greedy Klondike autoplay.
//!
//! A validated 52-card `Deck` is dealt into a seven-pile tableau and a
//! 24-card stock, and a fixed priority list of move rules is applied one
//! move per step until the game is won, gets stuck, cycles through the
//! stock without progress, or runs out of steps. There is no search: the
//! first legal move in priority order is always the one played.
//!
//! ```no_run
//! use klondike_autoplay::{Deck, SimulationConfig, simulate};
//!
//! let outcome = simulate(&Deck::shuffled(42), &SimulationConfig::default())?;
//! println!("{:?} after {} steps", outcome.terminal, outcome.steps);
//! # Ok::<(), klondike_autoplay::Error>(())
//! ```
//!
//! Logging goes through the `log` facade; install any logger to see moves
//! (`debug`), flips (`trace`) and results (`info`).

pub mod canonical_decks;
pub mod card;
pub mod deck;
pub mod error;
pub mod foundation;
pub mod game;
pub mod moves;
pub mod rules;
pub mod simulation;
pub mod stats;
pub mod stock;
pub mod tableau;

pub use card::{Card, Color, Rank, Suit};
pub use deck::Deck;
pub use error::{DeckError, EmptyPile, Error, Result};
pub use game::{GameState, Layout, Snapshot};
pub use moves::{KingSource, Move, MoveKind, RULE_PRIORITY, Rule};
pub use simulation::{
    CacheReset, SimState, Simulation, SimulationConfig, SimulationOutcome, simulate,
};
pub use stats::Stats;
