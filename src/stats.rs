//! Tallies over many simulated games.

use log::info;
use serde::Serialize;

use crate::deck::Deck;
use crate::error::Result;
use crate::simulation::{SimState, SimulationConfig, SimulationOutcome, simulate};

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub games_played: u64,
    pub games_won: u64,
    pub games_stuck: u64,
    pub games_cycled: u64,
    pub games_step_limited: u64,
    /// Sum of foundation cards at the end of every game.
    pub cards_home: u64,
    pub total_steps: u64,
}

impl Stats {
    pub fn record(&mut self, outcome: &SimulationOutcome) {
        self.games_played += 1;
        match outcome.terminal {
            SimState::WonComplete => self.games_won += 1,
            SimState::StuckNoMoves => self.games_stuck += 1,
            SimState::CycleDetected => self.games_cycled += 1,
            SimState::StepLimitReached => self.games_step_limited += 1,
            SimState::Running => {}
        }
        self.cards_home += outcome
            .final_state
            .foundations
            .iter()
            .map(|pile| pile.len() as u64)
            .sum::<u64>();
        self.total_steps += outcome.steps;
    }

    pub fn games_lost(&self) -> u64 {
        self.games_played - self.games_won
    }

    pub fn win_rate(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.games_won as f64 / self.games_played as f64
        }
    }

    pub fn mean_cards_home(&self) -> f64 {
        if self.games_played == 0 {
            0.0
        } else {
            self.cards_home as f64 / self.games_played as f64
        }
    }
}

/// Play every deck under the same config and tally the results.
pub fn play_all<'a, I>(decks: I, config: &SimulationConfig) -> Result<Stats>
where
    I: IntoIterator<Item = &'a Deck>,
{
    let mut stats = Stats::default();
    for deck in decks {
        let outcome = simulate(deck, config)?;
        stats.record(&outcome);
    }
    info!(
        "played {} games: {} won ({:.1}%)",
        stats.games_played,
        stats.games_won,
        stats.win_rate() * 100.0
    );
    Ok(stats)
}

/// Play the decks produced by seeds `seeds`.
pub fn play_seeds(seeds: std::ops::Range<u64>, config: &SimulationConfig) -> Result<Stats> {
    let decks: Vec<Deck> = seeds.map(Deck::shuffled).collect();
    play_all(&decks, config)
}
