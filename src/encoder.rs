//! # History encoding
//!
//! Turns the rolling window of past rounds plus the current resource state
//! into the fixed-size feature vector the predictor consumes, and produces
//! its opponent-relative mirror.
//!
//! Layout, for window length k and subject side S:
//!   - k blocks of 10: one-hot of S's action, then one-hot of the other
//!     side's action, oldest round first. With fewer than k recorded rounds
//!     the trailing blocks stay all-zero.
//!   - S's health and the opponent's health as raw scalars.
//!   - S's mana, then the opponent's mana, each one-hot of width
//!     max_mana + 1.
//!
//! `mirror` re-expresses a vector from the other side's perspective and is
//! an involution; encoding with the roles swapped equals mirroring the
//! original encoding. One predictor can therefore be trained and queried
//! from either seat.

use crate::action::NUM_ACTIONS;
use crate::combatant::CombatantState;
use crate::config::DuelConfig;
use crate::resolve::RoundActionPair;
use crate::utils::Side;

/// Every round of the current match, in side order, oldest first. Only the
/// last `cfg.window` entries participate in encoding.
#[derive(Debug, Clone, Default)]
pub struct HistoryWindow {
    rounds: Vec<RoundActionPair>,
}

impl HistoryWindow {
    pub fn new() -> Self {
        HistoryWindow { rounds: Vec::new() }
    }

    pub fn push(&mut self, pair: RoundActionPair) {
        self.rounds.push(pair);
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// The most recent `k` rounds in chronological order.
    pub fn recent(&self, k: usize) -> &[RoundActionPair] {
        let start = self.rounds.len().saturating_sub(k);
        &self.rounds[start..]
    }
}

/// Encode the window and current state from `subject`'s perspective.
pub fn encode(
    cfg: &DuelConfig,
    history: &HistoryWindow,
    states: [CombatantState; 2],
    subject: Side,
) -> Vec<f32> {
    let k = cfg.window;
    let mana_width = cfg.max_mana as usize + 1;
    let mut x = vec![0.0f32; cfg.feature_len()];

    let own = subject;
    let opp = subject.other();
    for (i, pair) in history.recent(k).iter().enumerate() {
        let base = i * 2 * NUM_ACTIONS;
        x[base + pair.by(own).index()] = 1.0;
        x[base + NUM_ACTIONS + pair.by(opp).index()] = 1.0;
    }

    let state_base = 2 * NUM_ACTIONS * k;
    x[state_base] = states[own.index()].health as f32;
    x[state_base + 1] = states[opp.index()].health as f32;

    let mana_base = state_base + 2;
    x[mana_base + states[own.index()].mana as usize] = 1.0;
    x[mana_base + mana_width + states[opp.index()].mana as usize] = 1.0;
    x
}

/// Re-express a feature vector from the opposite side's perspective: swap
/// the halves of every action block, the two health scalars and the two
/// mana one-hots.
pub fn mirror(cfg: &DuelConfig, v: &[f32]) -> Vec<f32> {
    debug_assert_eq!(v.len(), cfg.feature_len());
    let k = cfg.window;
    let mana_width = cfg.max_mana as usize + 1;
    let mut out = v.to_vec();

    for i in 0..k {
        let base = i * 2 * NUM_ACTIONS;
        for j in 0..NUM_ACTIONS {
            out.swap(base + j, base + NUM_ACTIONS + j);
        }
    }

    let state_base = 2 * NUM_ACTIONS * k;
    out.swap(state_base, state_base + 1);

    let mana_base = state_base + 2;
    for j in 0..mana_width {
        out.swap(mana_base + j, mana_base + mana_width + j);
    }
    out
}
