//! Tableau piles and the seven-pile tableau.
//!
//! A `Pile` stores its cards bottom-to-top in a `Vec`, so the top card is
//! the last element. Face state is a single count of face-down cards at the
//! bottom of the pile: the first `num_face_down` entries are hidden and the
//! rest are face-up. That makes "face-up cards form an unbroken run from the
//! top" hold by construction.

use serde::Serialize;

use crate::card::Card;
use crate::error::{EmptyPile, PileKind};

/// Number of tableau piles.
pub const NUM_PILES: usize = 7;

/// Cards dealt into the tableau: 1 + 2 + ... + 7.
pub const TABLEAU_CARDS: usize = NUM_PILES * (NUM_PILES + 1) / 2;

/// One tableau pile.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Pile {
    cards: Vec<Card>,
    num_face_down: usize,
}

impl Pile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pile as dealt: `cards` bottom-to-top, everything face-down
    /// except the top card.
    pub fn dealt(cards: &[Card]) -> Self {
        Pile {
            cards: cards.to_vec(),
            num_face_down: cards.len().saturating_sub(1),
        }
    }

    /// Build a pile with an explicit face-down count. `None` if the count
    /// is larger than the pile.
    pub fn with_face_down(cards: Vec<Card>, num_face_down: usize) -> Option<Self> {
        (num_face_down <= cards.len()).then_some(Pile { cards, num_face_down })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    #[inline]
    pub fn num_face_down(&self) -> usize {
        self.num_face_down
    }

    #[inline]
    pub fn num_face_up(&self) -> usize {
        self.cards.len() - self.num_face_down
    }

    /// Top card regardless of face state.
    #[inline]
    pub fn peek_top(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    #[inline]
    pub fn top_is_face_up(&self) -> bool {
        self.num_face_up() > 0
    }

    /// Top card, only if it is face-up.
    #[inline]
    pub fn face_up_top(&self) -> Option<Card> {
        if self.top_is_face_up() { self.peek_top() } else { None }
    }

    /// The face-up run, bottom-to-top. Empty if the top card is face-down.
    #[inline]
    pub fn face_up_run(&self) -> &[Card] {
        &self.cards[self.num_face_down..]
    }

    /// All cards bottom-to-top, hidden ones included.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Whether the card at `index` (bottom = 0) is face-up.
    pub fn is_face_up_at(&self, index: usize) -> bool {
        index >= self.num_face_down && index < self.cards.len()
    }

    /// Place a face-up card on top.
    pub fn push_top(&mut self, card: Card) {
        self.cards.push(card);
    }

    /// Take the top card. If that uncovers a face-down card it stays
    /// face-down until the next flip.
    pub fn pop_top(&mut self) -> Result<Card, EmptyPile> {
        let card = self.cards.pop().ok_or(EmptyPile(PileKind::Tableau))?;
        self.num_face_down = self.num_face_down.min(self.cards.len());
        Ok(card)
    }

    /// Turn the top card face-up. Returns `Ok(true)` if it was face-down,
    /// `Ok(false)` if it was already face-up.
    pub fn flip_top(&mut self) -> Result<bool, EmptyPile> {
        if self.is_empty() {
            return Err(EmptyPile(PileKind::Tableau));
        }
        if self.top_is_face_up() {
            return Ok(false);
        }
        self.num_face_down -= 1;
        Ok(true)
    }

    /// Remove the top `count` face-up cards as one run, bottom-to-top.
    pub fn take_run(&mut self, count: usize) -> Result<Vec<Card>, EmptyPile> {
        if count == 0 || count > self.num_face_up() {
            return Err(EmptyPile(PileKind::Tableau));
        }
        let at = self.cards.len() - count;
        Ok(self.cards.split_off(at))
    }

    /// Place a face-up run on top, keeping its order.
    pub fn push_run(&mut self, run: Vec<Card>) {
        self.cards.extend(run);
    }
}

/// Read-only view of one pile for observers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PileSnapshot {
    /// Bottom-to-top.
    pub cards: Vec<Card>,
    pub num_face_down: usize,
}

impl From<&Pile> for PileSnapshot {
    fn from(pile: &Pile) -> Self {
        PileSnapshot {
            cards: pile.cards.clone(),
            num_face_down: pile.num_face_down,
        }
    }
}

/// The seven tableau piles.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Tableau {
    pub piles: [Pile; NUM_PILES],
}

impl Tableau {
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Deal the first `TABLEAU_CARDS` cards: pile `i` takes the next `i+1`
    /// cards, each placed on top of the previous one, and only its last card
    /// is face-up.
    ///
    /// Returns the tableau and the cards left over for the stock.
    pub fn deal(cards: &[Card]) -> (Self, &[Card]) {
        let mut tab = Tableau::new_empty();
        let mut offset = 0usize;
        for (i, pile) in tab.piles.iter_mut().enumerate() {
            let end = (offset + i + 1).min(cards.len());
            *pile = Pile::dealt(&cards[offset..end]);
            offset = end;
        }
        (tab, &cards[offset..])
    }

    pub fn total_cards(&self) -> usize {
        self.piles.iter().map(Pile::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.piles.iter().all(Pile::is_empty)
    }

    /// Mutable access to two distinct piles.
    ///
    /// Panics in debug builds if `a == b`; callers never ask for that.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Pile, &mut Pile) {
        debug_assert_ne!(a, b);
        if a < b {
            let (left, right) = self.piles.split_at_mut(b);
            (&mut left[a], &mut right[0])
        } else {
            let (left, right) = self.piles.split_at_mut(a);
            (&mut right[0], &mut left[b])
        }
    }

    pub fn snapshot(&self) -> Vec<PileSnapshot> {
        self.piles.iter().map(PileSnapshot::from).collect()
    }
}
