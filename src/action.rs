//! # Actions
//!
//! The five simultaneous-choice actions of a duel and their fixed mana
//! costs. Counter and Steal are charged at the moment of selection, before
//! round resolution runs; the other three are free.

use std::fmt;

pub const NUM_ACTIONS: usize = 5;

#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum Action {
    Attack,
    Defend,
    Rest,
    Counter,
    Steal,
}

/// Fixed evaluation order. Ties in the decision engine break toward the
/// earlier entry, so the order is part of the engine's contract.
pub const ALL_ACTIONS: [Action; NUM_ACTIONS] = [
    Action::Attack,
    Action::Defend,
    Action::Rest,
    Action::Counter,
    Action::Steal,
];

impl Action {
    /// Mana charged to the acting side when the action is selected.
    #[inline]
    pub fn mana_cost(self) -> i32 {
        match self {
            Action::Counter => 1,
            Action::Steal => 3,
            _ => 0,
        }
    }

    /// Position in one-hot encodings and probability vectors.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Action::Attack => 0,
            Action::Defend => 1,
            Action::Rest => 2,
            Action::Counter => 3,
            Action::Steal => 4,
        }
    }

    pub fn from_index(idx: usize) -> Option<Action> {
        ALL_ACTIONS.get(idx).copied()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Attack => "Attack",
            Action::Defend => "Defend",
            Action::Rest => "Rest",
            Action::Counter => "Counter",
            Action::Steal => "Steal",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn costs() {
        assert_eq!(Action::Attack.mana_cost(), 0);
        assert_eq!(Action::Defend.mana_cost(), 0);
        assert_eq!(Action::Rest.mana_cost(), 0);
        assert_eq!(Action::Counter.mana_cost(), 1);
        assert_eq!(Action::Steal.mana_cost(), 3);
    }

    #[test]
    fn index_roundtrip() {
        for (i, a) in ALL_ACTIONS.iter().enumerate() {
            assert_eq!(a.index(), i);
            assert_eq!(Action::from_index(i), Some(*a));
        }
        assert_eq!(Action::from_index(NUM_ACTIONS), None);
    }
}
