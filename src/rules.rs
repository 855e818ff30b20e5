//! Ordering rules shared by the tableau and the foundations.
//!
//! Both predicates are pure: they only look at rank and suit, which never
//! change once a card exists.

use crate::card::{Card, Rank};

/// True if `lower` may sit directly on `higher` in a tableau pile.
///
/// Requires opposite colors and `lower` exactly one rank below `higher`.
#[inline]
pub fn is_descending_alternating(higher: Card, lower: Card) -> bool {
    higher.color() != lower.color() && higher.rank().prev() == Some(lower.rank())
}

/// True if `candidate` is the next rank for a foundation whose top rank is
/// `top` (`None` for an empty foundation, which only takes an Ace).
#[inline]
pub fn is_next_foundation_rank(top: Option<Rank>, candidate: Rank) -> bool {
    match top {
        None => candidate == Rank::Ace,
        Some(top) => top.next() == Some(candidate),
    }
}
