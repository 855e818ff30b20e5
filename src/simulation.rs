//! The simulation loop: one greedy game from deal to a terminal state.
//!
//! Each step asks the move engine for a move. When there is none, the stock
//! cursor is advanced instead, and the exposed card is remembered in a cycle
//! cache. Seeing a cached card exposed again with still no move means every
//! drawable card has been tried, so the run stops there. A step ceiling
//! bounds everything else.

use log::{debug, info};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::card::Card;
use crate::deck::Deck;
use crate::error::{Error, Result};
use crate::game::{GameState, Snapshot};
use crate::moves::{Move, take_turn};

/// Where a run currently is. Everything but `Running` is terminal.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum SimState {
    Running,
    /// All 52 cards are on the foundations.
    WonComplete,
    /// No move and nothing left to draw.
    StuckNoMoves,
    /// No move and the exposed stock card was already drawn without effect.
    CycleDetected,
    /// The configured step ceiling was hit.
    StepLimitReached,
}

impl SimState {
    pub fn is_terminal(self) -> bool {
        self != SimState::Running
    }
}

/// When the cycle cache is emptied.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CacheReset {
    /// Only when the run starts. A card drawn once and drawn again later
    /// with no move ends the run, even if other moves happened between.
    #[default]
    PerRun,
    /// Also whenever the engine makes a move, so a cycle means one full
    /// pass through the stock without any progress.
    OnProgress,
}

/// Knobs for a single run.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Hard cap on loop iterations, moves and draws alike.
    pub max_steps: u64,
    pub cache_reset: CacheReset,
    /// Keep every applied move in the outcome.
    pub record_moves: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            max_steps: 10_000,
            cache_reset: CacheReset::PerRun,
            record_moves: true,
        }
    }
}

impl SimulationConfig {
    /// Parse a config from JSON. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: SimulationConfig =
            serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_steps == 0 {
            return Err(Error::Config("max_steps must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// What a finished run reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationOutcome {
    pub terminal: SimState,
    /// Loop iterations taken, moves and draws together.
    pub steps: u64,
    pub moves_applied: u64,
    pub draws: u64,
    /// Empty unless `record_moves` was set.
    pub moves: Vec<Move>,
    pub final_state: Snapshot,
}

impl SimulationOutcome {
    pub fn is_win(&self) -> bool {
        self.terminal == SimState::WonComplete
    }
}

/// A single run in progress. Owns its game state exclusively.
#[derive(Clone, Debug)]
pub struct Simulation {
    state: GameState,
    config: SimulationConfig,
    status: SimState,
    steps: u64,
    moves_applied: u64,
    draws: u64,
    cycle_cache: FxHashSet<Card>,
    moves: Vec<Move>,
}

impl Simulation {
    /// Deal `deck` and get ready to run. Fails on an invalid config.
    pub fn new(deck: &Deck, config: SimulationConfig) -> Result<Self> {
        Self::from_state(GameState::new(deck), config)
    }

    /// Start from an arbitrary position.
    pub fn from_state(state: GameState, config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Simulation {
            state,
            config,
            status: SimState::Running,
            steps: 0,
            moves_applied: 0,
            draws: 0,
            cycle_cache: FxHashSet::default(),
            moves: Vec::new(),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> SimState {
        self.status
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    /// Advance by one loop iteration and return the resulting status.
    ///
    /// Once terminal, further calls change nothing.
    pub fn step(&mut self) -> Result<SimState> {
        if self.status.is_terminal() {
            return Ok(self.status);
        }
        if self.steps >= self.config.max_steps {
            self.status = SimState::StepLimitReached;
            return Ok(self.status);
        }
        self.steps += 1;

        if let Some(mv) = take_turn(&mut self.state)? {
            self.moves_applied += 1;
            if self.config.record_moves {
                self.moves.push(mv);
            }
            if self.config.cache_reset == CacheReset::OnProgress {
                self.cycle_cache.clear();
            }
            if self.state.is_complete() {
                self.status = SimState::WonComplete;
            }
            return Ok(self.status);
        }

        match self.state.stock.exposed() {
            Some(card) if self.cycle_cache.contains(&card) => {
                debug!("step {}: {card} already drawn without a move", self.steps);
                self.status = SimState::CycleDetected;
            }
            Some(card) => {
                self.cycle_cache.insert(card);
                self.state.stock.advance()?;
                self.draws += 1;
                debug!(
                    "step {}: drew past {card}, now showing {}",
                    self.steps,
                    self.state.stock.exposed().map_or_else(|| "nothing".to_string(), |c| c.to_string())
                );
            }
            None if self.state.is_complete() => self.status = SimState::WonComplete,
            None => self.status = SimState::StuckNoMoves,
        }
        Ok(self.status)
    }

    /// Step until a terminal state and report.
    pub fn run(mut self) -> Result<SimulationOutcome> {
        while !self.step()?.is_terminal() {}

        if self.status != SimState::WonComplete && self.state.is_complete() {
            self.status = SimState::WonComplete;
        }
        info!(
            "finished {:?} after {} steps ({} moves, {} draws)",
            self.status, self.steps, self.moves_applied, self.draws
        );
        Ok(self.into_outcome())
    }

    fn into_outcome(self) -> SimulationOutcome {
        SimulationOutcome {
            terminal: self.status,
            steps: self.steps,
            moves_applied: self.moves_applied,
            draws: self.draws,
            final_state: self.state.snapshot(),
            moves: self.moves,
        }
    }
}

/// Deal `deck` and play it out under `config`.
pub fn simulate(deck: &Deck, config: &SimulationConfig) -> Result<SimulationOutcome> {
    Simulation::new(deck, *config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical_decks::{
        canonical_ace_first_deck, canonical_solved_deck, canonical_unplayable_deck,
    };
    use crate::card::{Rank, Suit};
    use crate::game::Layout;
    use crate::moves::{KingSource, MoveKind};

    fn c(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn ace_on_first_pile_goes_home_in_one_step() {
        let mut sim = Simulation::new(&canonical_ace_first_deck(), SimulationConfig::default()).unwrap();
        assert_eq!(sim.state().tableau.piles[0].face_up_top(), Some(c("AS")));

        assert_eq!(sim.step().unwrap(), SimState::Running);
        assert!(sim.state().tableau.piles[0].is_empty());
        assert_eq!(sim.state().foundations.pile(Suit::Spades), &[c("AS")]);
        assert_eq!(sim.state().foundations.total_cards(), 1);
        assert_eq!(sim.steps(), 1);
    }

    #[test]
    fn stock_king_waits_for_an_empty_pile() {
        let used = ["2H", "AH", "5C", "5S", "7C", "7S", "9C", "9S", "KS"].map(c);
        let mut stock = vec![c("KS")];
        stock.extend(Card::all().filter(|card| !used.contains(card)));

        let layout = Layout {
            piles: [
                (vec![c("2H"), c("AH")], 1),
                (vec![c("5C")], 0),
                (vec![c("5S")], 0),
                (vec![c("7C")], 0),
                (vec![c("7S")], 0),
                (vec![c("9C")], 0),
                (vec![c("9S")], 0),
            ],
            stock,
            foundations: [0; 4],
        };
        let state = GameState::from_layout(layout).unwrap();
        let mut sim = Simulation::from_state(state, SimulationConfig::default()).unwrap();

        // AH then 2H go home; the King stays put while every pile is occupied.
        sim.step().unwrap();
        assert_eq!(sim.state().stock.exposed(), Some(c("KS")));
        assert!(sim.state().tableau.piles.iter().all(|p| !p.is_empty()));
        sim.step().unwrap();
        assert_eq!(sim.state().stock.exposed(), Some(c("KS")));
        assert!(sim.state().tableau.piles[0].is_empty());

        sim.step().unwrap();
        assert_eq!(sim.state().tableau.piles[0].cards(), &[c("KS")]);
        assert_ne!(sim.state().stock.exposed(), Some(c("KS")));

        let outcome = sim.run().unwrap();
        assert_eq!(
            outcome.moves[2].kind,
            MoveKind::KingToEmptyPile { src: KingSource::Stock, dst: 0 }
        );
    }

    #[test]
    fn unplayable_deck_stops_on_cycle() {
        let config = SimulationConfig::default();
        let outcome = simulate(&canonical_unplayable_deck(), &config).unwrap();

        assert_eq!(outcome.terminal, SimState::CycleDetected);
        assert_eq!(outcome.moves_applied, 0);
        // 24 draws, then the first card comes round again.
        assert_eq!(outcome.draws, 24);
        assert_eq!(outcome.steps, 25);
        assert!(outcome.steps < config.max_steps);
    }

    #[test]
    fn solved_deck_wins() {
        let outcome = simulate(&canonical_solved_deck(), &SimulationConfig::default()).unwrap();

        assert_eq!(outcome.terminal, SimState::WonComplete);
        assert!(outcome.is_win());
        assert_eq!(outcome.moves_applied, 52);
        assert_eq!(outcome.draws, 0);
        for pile in &outcome.final_state.foundations {
            assert_eq!(pile.len(), 13);
        }
        assert!(outcome.final_state.tableau.iter().all(|p| p.cards.is_empty()));
        assert!(outcome.final_state.stock.is_empty());
    }

    #[test]
    fn step_ceiling_stops_the_run() {
        let config = SimulationConfig {
            max_steps: 5,
            ..SimulationConfig::default()
        };
        let outcome = simulate(&canonical_solved_deck(), &config).unwrap();
        assert_eq!(outcome.terminal, SimState::StepLimitReached);
        assert_eq!(outcome.steps, 5);
        assert_eq!(outcome.moves.len(), 5);
    }

    /// Hearts in the stock, out of order. The tableau holds red Diamonds
    /// that never move, so only the stock can make progress.
    fn hearts_only_stock() -> GameState {
        let order = ["2H", "AH", "4H", "3H", "5H", "6H", "7H", "8H", "9H", "TH", "JH", "QH", "KH"];
        let mut piles: [(Vec<Card>, usize); 7] = Default::default();
        piles[0] = (vec![c("6D"), c("8D")], 1);
        for (slot, top) in piles.iter_mut().skip(1).zip(["7D", "9D", "TD", "JD", "QD", "KD"]) {
            *slot = (vec![c(top)], 0);
        }
        GameState::from_layout(Layout {
            piles,
            stock: order.map(c).to_vec(),
            foundations: [5, 0, 13, 13],
        })
        .unwrap()
    }

    #[test]
    fn per_run_cache_stops_even_after_progress() {
        let sim = Simulation::from_state(hearts_only_stock(), SimulationConfig::default()).unwrap();
        let outcome = sim.run().unwrap();

        assert_eq!(outcome.terminal, SimState::CycleDetected);
        assert_eq!(outcome.final_state.foundations[Suit::Hearts.index()].len(), 2);
        assert_eq!(outcome.final_state.stock.first(), Some(&c("4H")));
    }

    #[test]
    fn on_progress_cache_lets_the_stock_drain() {
        let config = SimulationConfig {
            cache_reset: CacheReset::OnProgress,
            ..SimulationConfig::default()
        };
        let outcome = Simulation::from_state(hearts_only_stock(), config).unwrap().run().unwrap();

        assert_eq!(outcome.terminal, SimState::StuckNoMoves);
        assert!(outcome.final_state.stock.is_empty());
        assert_eq!(
            outcome.final_state.foundations[Suit::Hearts.index()].last(),
            Some(&Card::new(Suit::Hearts, Rank::King))
        );
    }

    #[test]
    fn run_swapped_between_twin_parents_hits_the_ceiling() {
        // 4H can sit on 5C or 5S; the run scan moves it back and forth.
        let tops = ["5C", "4H", "5S", "7C", "7S", "9C", "9S", "JC"].map(c);
        let mut buried: Vec<Card> = Card::all().filter(|card| !tops.contains(card)).collect();
        let face_down = buried.len();
        buried.push(c("JC"));

        let mut piles: [(Vec<Card>, usize); 7] = Default::default();
        piles[0] = (vec![c("5C"), c("4H")], 0);
        piles[1] = (vec![c("5S")], 0);
        for (slot, top) in piles.iter_mut().skip(2).zip(["7C", "7S", "9C", "9S"]) {
            *slot = (vec![c(top)], 0);
        }
        piles[6] = (buried, face_down);

        let state = GameState::from_layout(Layout {
            piles,
            stock: Vec::new(),
            foundations: [0; 4],
        })
        .unwrap();
        let config = SimulationConfig {
            max_steps: 10,
            ..SimulationConfig::default()
        };
        let outcome = Simulation::from_state(state, config).unwrap().run().unwrap();

        assert_eq!(outcome.terminal, SimState::StepLimitReached);
        assert_eq!(outcome.moves_applied, 10);
        let there = MoveKind::TableauToTableau { src: 0, dst: 1, count: 1 };
        let back = MoveKind::TableauToTableau { src: 1, dst: 0, count: 1 };
        for (i, mv) in outcome.moves.iter().enumerate() {
            assert_eq!(mv.card, c("4H"));
            assert_eq!(mv.kind, if i % 2 == 0 { there } else { back });
        }
        assert_eq!(outcome.final_state.tableau[0].cards, vec![c("5C"), c("4H")]);
    }

    #[test]
    fn empty_stock_without_moves_is_stuck() {
        // Seven black tops with nothing to build on and nothing to draw.
        let tops = ["5C", "5S", "7C", "7S", "9C", "9S", "JC"].map(c);
        let mut buried: Vec<Card> = Card::all().filter(|card| !tops.contains(card)).collect();
        let face_down = buried.len();
        buried.push(tops[0]);

        let mut piles: [(Vec<Card>, usize); 7] = Default::default();
        piles[0] = (buried, face_down);
        for (slot, &top) in piles.iter_mut().zip(&tops).skip(1) {
            *slot = (vec![top], 0);
        }

        let state = GameState::from_layout(Layout {
            piles,
            stock: Vec::new(),
            foundations: [0; 4],
        })
        .unwrap();
        let outcome = Simulation::from_state(state, SimulationConfig::default()).unwrap().run().unwrap();
        assert_eq!(outcome.terminal, SimState::StuckNoMoves);
        assert_eq!(outcome.steps, 1);
        assert_eq!(outcome.moves_applied, 0);
    }

    #[test]
    fn terminal_state_is_sticky() {
        let mut sim = Simulation::new(&canonical_unplayable_deck(), SimulationConfig::default()).unwrap();
        while !sim.step().unwrap().is_terminal() {}
        let steps = sim.steps();
        let snap = sim.snapshot();
        assert_eq!(sim.step().unwrap(), SimState::CycleDetected);
        assert_eq!(sim.steps(), steps);
        assert_eq!(sim.snapshot(), snap);
    }

    #[test]
    fn recording_can_be_turned_off() {
        let config = SimulationConfig {
            record_moves: false,
            ..SimulationConfig::default()
        };
        let outcome = simulate(&canonical_solved_deck(), &config).unwrap();
        assert!(outcome.moves.is_empty());
        assert_eq!(outcome.moves_applied, 52);
    }

    #[test]
    fn config_from_json_fills_defaults() {
        let config = SimulationConfig::from_json_str(r#"{"max_steps": 50}"#).unwrap();
        assert_eq!(config.max_steps, 50);
        assert_eq!(config.cache_reset, CacheReset::PerRun);
        assert!(config.record_moves);

        let config = SimulationConfig::from_json_str(r#"{"cache_reset": "on_progress"}"#).unwrap();
        assert_eq!(config.cache_reset, CacheReset::OnProgress);
        assert_eq!(config.max_steps, SimulationConfig::default().max_steps);
    }

    #[test]
    fn config_rejects_bad_input() {
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{"max_steps": 0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            SimulationConfig::from_json_str(r#"{"cache_reset": "sometimes"}"#),
            Err(Error::Config(_))
        ));
        let zero = SimulationConfig {
            max_steps: 0,
            ..SimulationConfig::default()
        };
        assert!(simulate(&Deck::standard(), &zero).is_err());
        assert!(matches!(Simulation::new(&Deck::standard(), zero), Err(Error::Config(_))));
        assert!(matches!(
            Simulation::from_state(GameState::new(&Deck::standard()), zero),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn outcome_serializes_to_json() {
        let outcome = simulate(&canonical_unplayable_deck(), &SimulationConfig::default()).unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["terminal"], "CycleDetected");
        assert_eq!(value["steps"], 25);
    }
}
