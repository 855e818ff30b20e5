//! The draw source: undealt cards behind a one-card cursor.
//!
//! The exposed card is the front of the queue. Advancing the cursor sends
//! the exposed card to the back, so repeated draws walk the whole stock and
//! then wrap around to the first card again.

use std::collections::VecDeque;

use crate::card::Card;
use crate::error::{EmptyPile, PileKind};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Stock {
    cards: VecDeque<Card>,
}

impl Stock {
    /// Stock in deal order; the first card is exposed.
    pub fn new(cards: &[Card]) -> Self {
        Stock {
            cards: cards.iter().copied().collect(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The card under the cursor.
    #[inline]
    pub fn exposed(&self) -> Option<Card> {
        self.cards.front().copied()
    }

    /// Remove the exposed card; the next one becomes exposed.
    pub fn take_exposed(&mut self) -> Result<Card, EmptyPile> {
        self.cards.pop_front().ok_or(EmptyPile(PileKind::Stock))
    }

    /// Move the cursor one card on, wrapping at the end.
    pub fn advance(&mut self) -> Result<(), EmptyPile> {
        let card = self.take_exposed()?;
        self.cards.push_back(card);
        Ok(())
    }

    /// Cards starting from the exposed one, in cursor order.
    pub fn iter(&self) -> impl Iterator<Item = Card> + '_ {
        self.cards.iter().copied()
    }
}
