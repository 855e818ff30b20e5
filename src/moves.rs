//! Move representation and the greedy move engine.
//!
//! Each turn the engine flips any face-down pile tops, then walks
//! `RULE_PRIORITY` and applies the first move it finds. Finding a move is a
//! pure query over `&GameState`; applying it is `Move::apply`, which
//! re-checks legality and transfers the cards in one step.

use core::fmt;

use log::{debug, trace};
use serde::Serialize;

use crate::card::Card;
use crate::error::{Error, Result};
use crate::game::GameState;
use crate::rules::is_descending_alternating;
use crate::tableau::Pile;

/// The move rules the engine knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Rule {
    /// Face-up tableau top onto its foundation.
    TableauToFoundation,
    /// Exposed stock card onto its foundation.
    StockToFoundation,
    /// A King onto an empty tableau pile, from the tableau or the stock.
    KingToEmptyPile,
    /// Exposed stock card onto a tableau top.
    StockToTableau,
    /// Part or all of a face-up run onto another tableau pile.
    TableauToTableau,
}

/// Order in which the engine tries the rules, highest priority first.
pub const RULE_PRIORITY: [Rule; 5] = [
    Rule::TableauToFoundation,
    Rule::StockToFoundation,
    Rule::KingToEmptyPile,
    Rule::StockToTableau,
    Rule::TableauToTableau,
];

/// Where a King moved to an empty pile came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum KingSource {
    Tableau(u8),
    Stock,
}

/// Representation of the different move types.
///
/// Pile indices are 0-based internally and printed 1-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum MoveKind {
    TableauToFoundation { src: u8 },
    StockToFoundation,
    KingToEmptyPile { src: KingSource, dst: u8 },
    StockToTableau { dst: u8 },
    /// Move the top `count` face-up cards of `src` onto `dst`.
    TableauToTableau { src: u8, dst: u8, count: u8 },
}

/// A single move. `card` is the card that moves, or for a run the
/// bottommost card of the run (the one that lands on the destination top).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    pub kind: MoveKind,
    pub card: Card,
}

impl Move {
    pub fn rule(&self) -> Rule {
        match self.kind {
            MoveKind::TableauToFoundation { .. } => Rule::TableauToFoundation,
            MoveKind::StockToFoundation => Rule::StockToFoundation,
            MoveKind::KingToEmptyPile { .. } => Rule::KingToEmptyPile,
            MoveKind::StockToTableau { .. } => Rule::StockToTableau,
            MoveKind::TableauToTableau { .. } => Rule::TableauToTableau,
        }
    }

    /// Whether this move can be applied to `state` as it stands.
    pub fn is_legal(&self, state: &GameState) -> bool {
        let piles = &state.tableau.piles;
        let pile = |i: u8| piles.get(i as usize);
        let exposed_is_card = state.stock.exposed() == Some(self.card);

        match self.kind {
            MoveKind::TableauToFoundation { src } => pile(src)
                .and_then(Pile::face_up_top)
                .is_some_and(|top| top == self.card && state.foundations.accepts(top)),

            MoveKind::StockToFoundation => exposed_is_card && state.foundations.accepts(self.card),

            MoveKind::KingToEmptyPile { src, dst } => {
                let dst_empty = pile(dst).is_some_and(Pile::is_empty);
                let from_ok = match src {
                    KingSource::Tableau(s) => s != dst && pile(s).and_then(Pile::face_up_top) == Some(self.card),
                    KingSource::Stock => exposed_is_card,
                };
                dst_empty && from_ok && self.card.is_king()
            }

            MoveKind::StockToTableau { dst } => {
                exposed_is_card
                    && pile(dst)
                        .and_then(Pile::face_up_top)
                        .is_some_and(|top| is_descending_alternating(top, self.card))
            }

            MoveKind::TableauToTableau { src, dst, count } => {
                let (Some(from), Some(to)) = (pile(src), pile(dst)) else {
                    return false;
                };
                let run = from.face_up_run();
                let count = count as usize;
                src != dst
                    && count >= 1
                    && count <= run.len()
                    && run[run.len() - count] == self.card
                    && to
                        .face_up_top()
                        .is_some_and(|top| is_descending_alternating(top, self.card))
            }
        }
    }

    /// Apply this move to `state`.
    ///
    /// An illegal move is refused with `Error::IllegalMove` and leaves the
    /// state untouched.
    pub fn apply(&self, state: &mut GameState) -> Result<()> {
        if !self.is_legal(state) {
            return Err(Error::IllegalMove(*self));
        }

        match self.kind {
            MoveKind::TableauToFoundation { src } => {
                let card = state.tableau.piles[src as usize].pop_top()?;
                state.foundations.try_accept(card);
            }

            MoveKind::StockToFoundation => {
                let card = state.stock.take_exposed()?;
                state.foundations.try_accept(card);
            }

            MoveKind::KingToEmptyPile { src, dst } => {
                let card = match src {
                    KingSource::Tableau(s) => state.tableau.piles[s as usize].pop_top()?,
                    KingSource::Stock => state.stock.take_exposed()?,
                };
                state.tableau.piles[dst as usize].push_top(card);
            }

            MoveKind::StockToTableau { dst } => {
                let card = state.stock.take_exposed()?;
                state.tableau.piles[dst as usize].push_top(card);
            }

            MoveKind::TableauToTableau { src, dst, count } => {
                let (from, to) = state.tableau.pair_mut(src as usize, dst as usize);
                let run = from.take_run(count as usize)?;
                to.push_run(run);
            }
        }
        Ok(())
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let card = self.card;
        match self.kind {
            MoveKind::TableauToFoundation { src } => {
                write!(f, "Pile {}: {card} -> Foundation({:?})", src + 1, card.suit())
            }
            MoveKind::StockToFoundation => {
                write!(f, "Stock: {card} -> Foundation({:?})", card.suit())
            }
            MoveKind::KingToEmptyPile { src: KingSource::Tableau(s), dst } => {
                write!(f, "Pile {}: {card} -> empty Pile {}", s + 1, dst + 1)
            }
            MoveKind::KingToEmptyPile { src: KingSource::Stock, dst } => {
                write!(f, "Stock: {card} -> empty Pile {}", dst + 1)
            }
            MoveKind::StockToTableau { dst } => write!(f, "Stock: {card} -> Pile {}", dst + 1),
            MoveKind::TableauToTableau { src, dst, count: 1 } => {
                write!(f, "Pile {}: {card} -> Pile {}", src + 1, dst + 1)
            }
            MoveKind::TableauToTableau { src, dst, count } => {
                write!(f, "Pile {}: {count} cards from {card} -> Pile {}", src + 1, dst + 1)
            }
        }
    }
}

// ----- Rule search -----

/// Find the move `rule` would make in `state`, if any. Pure.
pub fn find_move(rule: Rule, state: &GameState) -> Option<Move> {
    match rule {
        Rule::TableauToFoundation => tableau_to_foundation(state),
        Rule::StockToFoundation => stock_to_foundation(state),
        Rule::KingToEmptyPile => king_to_empty_pile(state),
        Rule::StockToTableau => stock_to_tableau(state),
        Rule::TableauToTableau => tableau_to_tableau(state),
    }
}

/// The move the engine would make next, without flipping first.
pub fn next_move(state: &GameState) -> Option<Move> {
    RULE_PRIORITY.iter().find_map(|&rule| find_move(rule, state))
}

fn tableau_to_foundation(state: &GameState) -> Option<Move> {
    state.tableau.piles.iter().enumerate().find_map(|(i, pile)| {
        pile.face_up_top()
            .filter(|&card| state.foundations.accepts(card))
            .map(|card| Move {
                kind: MoveKind::TableauToFoundation { src: i as u8 },
                card,
            })
    })
}

fn stock_to_foundation(state: &GameState) -> Option<Move> {
    state
        .stock
        .exposed()
        .filter(|&card| state.foundations.accepts(card))
        .map(|card| Move {
            kind: MoveKind::StockToFoundation,
            card,
        })
}

/// For each empty pile in order: a tableau King first, then the stock King.
///
/// A King that is the only card of its pile still moves. With two empty
/// piles it goes back and forth until the step ceiling ends the run.
fn king_to_empty_pile(state: &GameState) -> Option<Move> {
    let piles = &state.tableau.piles;
    for (dst, _) in piles.iter().enumerate().filter(|(_, p)| p.is_empty()) {
        let from_tableau = piles.iter().enumerate().find_map(|(src, pile)| {
            pile.face_up_top()
                .filter(|card| card.is_king())
                .map(|card| (KingSource::Tableau(src as u8), card))
        });
        let from_stock = || {
            state
                .stock
                .exposed()
                .filter(|card| card.is_king())
                .map(|card| (KingSource::Stock, card))
        };

        if let Some((src, card)) = from_tableau.or_else(from_stock) {
            return Some(Move {
                kind: MoveKind::KingToEmptyPile { src, dst: dst as u8 },
                card,
            });
        }
    }
    None
}

fn stock_to_tableau(state: &GameState) -> Option<Move> {
    let card = state.stock.exposed()?;
    state.tableau.piles.iter().enumerate().find_map(|(dst, pile)| {
        pile.face_up_top()
            .filter(|&top| is_descending_alternating(top, card))
            .map(|_| Move {
                kind: MoveKind::StockToTableau { dst: dst as u8 },
                card,
            })
    })
}

/// Sources in order, then destinations in order, then run sizes ascending.
fn tableau_to_tableau(state: &GameState) -> Option<Move> {
    let piles = &state.tableau.piles;
    for (src, from) in piles.iter().enumerate() {
        let run = from.face_up_run();
        if run.is_empty() {
            continue;
        }
        for (dst, to) in piles.iter().enumerate() {
            if dst == src {
                continue;
            }
            let Some(top) = to.face_up_top() else {
                continue;
            };
            for count in 1..=run.len() {
                let bottom = run[run.len() - count];
                if is_descending_alternating(top, bottom) {
                    return Some(Move {
                        kind: MoveKind::TableauToTableau {
                            src: src as u8,
                            dst: dst as u8,
                            count: count as u8,
                        },
                        card: bottom,
                    });
                }
            }
        }
    }
    None
}

// ----- Engine -----

/// Turn every face-down pile top face-up. Returns how many were flipped.
pub fn flip_exposed_tops(state: &mut GameState) -> Result<usize> {
    let mut flipped = 0;
    for (i, pile) in state.tableau.piles.iter_mut().enumerate() {
        if pile.is_empty() || pile.top_is_face_up() {
            continue;
        }
        if pile.flip_top()? {
            flipped += 1;
            if let Some(card) = pile.peek_top() {
                trace!("flipped {card} on pile {}", i + 1);
            }
        }
    }
    Ok(flipped)
}

/// Run one engine turn: flip, then apply the highest-priority move.
///
/// `Ok(None)` means no rule applies; that is a normal outcome. Calling this
/// again without any other change returns `Ok(None)` and changes nothing.
pub fn take_turn(state: &mut GameState) -> Result<Option<Move>> {
    flip_exposed_tops(state)?;

    let Some(mv) = next_move(state) else {
        return Ok(None);
    };
    mv.apply(state)?;
    debug!("{:?}: {mv}", mv.rule());
    Ok(Some(mv))
}

// ----- Tests -----
