//! # Combatant state
//!
//! Health and mana for one side of a duel, with the clamping rules every
//! mutation goes through. Mana stays in `[0, max_mana]`; a mana application
//! that would underflow converts the shortfall into health damage. Health is
//! capped at `max_health` on gain and floored at 0, and 0 means dead.

use crate::action::{Action, ALL_ACTIONS};
use crate::config::DuelConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatantState {
    pub health: i32,
    pub mana: i32,
}

impl CombatantState {
    pub fn fresh(cfg: &DuelConfig) -> Self {
        CombatantState {
            health: cfg.max_health,
            mana: cfg.starting_mana,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    #[inline]
    pub fn can_afford(&self, action: Action) -> bool {
        self.mana >= action.mana_cost()
    }

    /// Actions this side could legally select right now. Never empty:
    /// Attack, Defend and Rest are free.
    pub fn legal_actions(&self) -> Vec<Action> {
        ALL_ACTIONS
            .iter()
            .copied()
            .filter(|a| self.can_afford(*a))
            .collect()
    }

    /// Selection-time cost deduction. Legality is the caller's problem;
    /// this never underflows because every call site checks `can_afford`.
    pub fn spend(&mut self, action: Action) {
        debug_assert!(self.can_afford(action), "cost charged for illegal action");
        self.mana -= action.mana_cost();
    }

    /// Apply a health delta: capped at `max_health`, floored at 0.
    pub fn apply_health(&mut self, delta: i32, cfg: &DuelConfig) {
        self.health = (self.health + delta).clamp(0, cfg.max_health);
    }

    /// Apply an end-of-round mana delta. Overflow clamps to `max_mana`;
    /// underflow clamps to 0 and the shortfall is taken out of health.
    pub fn apply_mana(&mut self, delta: i32, cfg: &DuelConfig) {
        let next = self.mana + delta;
        if next < 0 {
            self.mana = 0;
            self.apply_health(next, cfg);
        } else {
            self.mana = next.min(cfg.max_mana);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_state_uses_config() {
        let cfg = DuelConfig::default();
        let s = CombatantState::fresh(&cfg);
        assert_eq!(s.health, 5);
        assert_eq!(s.mana, 0);
    }

    #[test]
    fn health_clamps_both_ends() {
        let cfg = DuelConfig::default();
        let mut s = CombatantState { health: 5, mana: 0 };
        s.apply_health(3, &cfg);
        assert_eq!(s.health, 5);
        s.apply_health(-7, &cfg);
        assert_eq!(s.health, 0);
        assert!(s.is_dead());
    }

    #[test]
    fn mana_overflow_clamps() {
        let cfg = DuelConfig::default();
        let mut s = CombatantState { health: 5, mana: 2 };
        s.apply_mana(2, &cfg);
        assert_eq!(s.mana, 3);
        assert_eq!(s.health, 5);
    }

    #[test]
    fn mana_debt_becomes_health_damage() {
        let cfg = DuelConfig::default();
        let mut s = CombatantState { health: 5, mana: 1 };
        s.apply_mana(-3, &cfg);
        assert_eq!(s.mana, 0);
        assert_eq!(s.health, 3);
    }

    #[test]
    fn legality_tracks_mana() {
        let broke = CombatantState { health: 5, mana: 0 };
        assert_eq!(
            broke.legal_actions(),
            vec![Action::Attack, Action::Defend, Action::Rest]
        );
        let rich = CombatantState { health: 5, mana: 3 };
        assert_eq!(rich.legal_actions().len(), 5);
    }
}
