//! Engine-level scenario tests: the resolution table's symmetry, the
//! clamping and mana-debt rules, encoder mirroring, and full duels driven
//! by scripted action plans.

#[cfg(test)]
mod tests {
    use crate::action::{Action, ALL_ACTIONS};
    use crate::combatant::CombatantState;
    use crate::config::DuelConfig;
    use crate::controller::{Controller, PredictiveController, RoundView, ScriptedController};
    use crate::duel::{Duel, Outcome};
    use crate::encoder::{encode, mirror, HistoryWindow};
    use crate::predictor::OnlineLogit;
    use crate::resolve::{resolve, RoundActionPair};
    use crate::utils::{DuelError, Side};

    fn at(health: i32, mana: i32) -> CombatantState {
        CombatantState { health, mana }
    }

    /// Plays a fixed sequence of free actions, for steering full duels.
    struct Planned {
        name: String,
        plan: Vec<Action>,
        cursor: usize,
    }

    impl Planned {
        fn new(name: &str, plan: Vec<Action>) -> Self {
            Planned {
                name: name.into(),
                plan,
                cursor: 0,
            }
        }
    }

    impl Controller for Planned {
        fn name(&self) -> &str {
            &self.name
        }

        fn choose(&mut self, _view: &RoundView) -> Result<Action, DuelError> {
            let action = self.plan.get(self.cursor).copied().expect("plan exhausted");
            self.cursor += 1;
            Ok(action)
        }
    }

    #[test]
    fn resolution_is_symmetric() {
        // At full health nothing dies in one round, so the terminal flag is
        // 0 from both perspectives and the deltas must mirror exactly.
        for a in ALL_ACTIONS {
            for b in ALL_ACTIONS {
                for mana_a in 0..=3 {
                    for mana_b in 0..=3 {
                        let d1 = resolve(a, b, at(5, mana_a), at(5, mana_b));
                        let d2 = resolve(b, a, at(5, mana_b), at(5, mana_a));
                        assert_eq!(d1.health[0], d2.health[1], "{:?} vs {:?}", a, b);
                        assert_eq!(d1.health[1], d2.health[0], "{:?} vs {:?}", a, b);
                        assert_eq!(d1.mana[0], d2.mana[1], "{:?} vs {:?}", a, b);
                        assert_eq!(d1.mana[1], d2.mana[0], "{:?} vs {:?}", a, b);
                        assert_eq!(d1.terminal, -d2.terminal, "{:?} vs {:?}", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn mana_application_matches_reference() {
        let cfg = DuelConfig::default();
        for mana in 0..=cfg.max_mana {
            for delta in -(cfg.max_mana + 3)..=3 {
                let mut s = CombatantState {
                    health: cfg.max_health,
                    mana,
                };
                s.apply_mana(delta, &cfg);

                let raw = mana + delta;
                let expected_mana = raw.clamp(0, cfg.max_mana);
                let expected_health = if raw < 0 {
                    (cfg.max_health + raw).clamp(0, cfg.max_health)
                } else {
                    cfg.max_health
                };
                assert_eq!(s.mana, expected_mana, "mana {} delta {}", mana, delta);
                assert_eq!(s.health, expected_health, "mana {} delta {}", mana, delta);
            }
        }
    }

    fn sample_history() -> HistoryWindow {
        let mut history = HistoryWindow::new();
        history.push(RoundActionPair::new(Action::Attack, Action::Rest));
        history.push(RoundActionPair::new(Action::Defend, Action::Attack));
        history.push(RoundActionPair::new(Action::Steal, Action::Counter));
        history.push(RoundActionPair::new(Action::Rest, Action::Rest));
        history
    }

    #[test]
    fn mirror_is_an_involution() {
        let cfg = DuelConfig::default();
        let states = [at(4, 2), at(1, 3)];
        for history in [HistoryWindow::new(), sample_history()] {
            for side in [Side::P1, Side::P2] {
                let v = encode(&cfg, &history, states, side);
                assert_eq!(mirror(&cfg, &mirror(&cfg, &v)), v);
            }
        }
    }

    #[test]
    fn role_swap_equals_mirror() {
        let cfg = DuelConfig::default();
        let history = sample_history();
        let states = [at(5, 0), at(2, 1)];
        let from_p1 = encode(&cfg, &history, states, Side::P1);
        let from_p2 = encode(&cfg, &history, states, Side::P2);
        assert_eq!(from_p2, mirror(&cfg, &from_p1));
    }

    #[test]
    fn mutual_attack_trades_one_health() {
        let cfg = DuelConfig::default();
        let mut p1 = CombatantState::fresh(&cfg);
        let mut p2 = CombatantState::fresh(&cfg);
        let d = resolve(Action::Attack, Action::Attack, p1, p2);
        assert_eq!(d.terminal, 0);
        p1.apply_health(d.health[0], &cfg);
        p2.apply_health(d.health[1], &cfg);
        p1.apply_mana(d.mana[0], &cfg);
        p2.apply_mana(d.mana[1], &cfg);
        assert_eq!((p1.health, p1.mana), (4, 0));
        assert_eq!((p2.health, p2.mana), (4, 0));
    }

    #[test]
    fn defend_negates_an_attack() {
        let cfg = DuelConfig::default();
        let mut defender = at(4, 0);
        let mut attacker = at(5, 2);
        let d = resolve(Action::Defend, Action::Attack, defender, attacker);
        defender.apply_health(d.health[0], &cfg);
        attacker.apply_health(d.health[1], &cfg);
        defender.apply_mana(d.mana[0], &cfg);
        attacker.apply_mana(d.mana[1], &cfg);
        // the +1 cancels the hit, the attacker pays a mana for the trouble
        assert_eq!((defender.health, defender.mana), (4, 0));
        assert_eq!((attacker.health, attacker.mana), (5, 1));
    }

    #[test]
    fn steal_against_rest_takes_health_and_mana() {
        let cfg = DuelConfig::default();
        let mut thief = at(4, 3);
        let mut victim = at(5, 1);
        // selection cost comes off before resolution
        thief.spend(Action::Steal);
        let d = resolve(Action::Steal, Action::Rest, thief, victim);
        thief.apply_health(d.health[0], &cfg);
        victim.apply_health(d.health[1], &cfg);
        thief.apply_mana(d.mana[0], &cfg);
        victim.apply_mana(d.mana[1], &cfg);
        assert_eq!((thief.health, thief.mana), (5, 1));
        // victim lost a health and a mana, but its own Rest banked +2
        assert_eq!((victim.health, victim.mana), (4, 2));
    }

    #[test]
    fn lethal_attack_ends_the_duel() {
        let cfg = DuelConfig::default();
        let mut aggressor = Planned::new("aggressor", vec![Action::Attack; 5]);
        let mut pacifist = Planned::new("pacifist", vec![Action::Rest; 5]);
        let report = Duel::new(cfg, &mut aggressor, &mut pacifist)
            .run()
            .unwrap();
        assert_eq!(report.outcome, Outcome::Win(Side::P1));
        assert!(!report.timed_out);
        assert_eq!(report.rounds, 5);
    }

    #[test]
    fn mutual_death_is_a_tie() {
        let cfg = DuelConfig::default();
        let mut left = Planned::new("left", vec![Action::Attack; 5]);
        let mut right = Planned::new("right", vec![Action::Attack; 5]);
        let report = Duel::new(cfg, &mut left, &mut right).run().unwrap();
        assert_eq!(report.outcome, Outcome::Tie);
        assert_eq!(report.rounds, 5);
    }

    #[test]
    fn timeout_scores_health_plus_discounted_mana() {
        let cfg = DuelConfig {
            max_turns: 4,
            ..DuelConfig::default()
        };
        // P1 ends at 2 health 0 mana (score 2.0), P2 at 1 health 2 mana
        // (score 2.5): the banked mana outweighs the extra health.
        let mut p1 = Planned::new(
            "p1",
            vec![Action::Attack, Action::Attack, Action::Attack, Action::Attack],
        );
        let mut p2 = Planned::new(
            "p2",
            vec![Action::Attack, Action::Attack, Action::Attack, Action::Rest],
        );
        let report = Duel::new(cfg, &mut p1, &mut p2).run().unwrap();
        assert!(report.timed_out);
        assert_eq!(report.rounds, 4);
        assert_eq!(report.outcome, Outcome::Win(Side::P2));
    }

    #[test]
    fn predictive_duel_runs_to_completion() {
        let cfg = DuelConfig::default();
        let mut bot = PredictiveController::new(cfg, OnlineLogit::for_config(&cfg), "bot");
        let mut foil = ScriptedController::new("foil");
        let report = Duel::new(cfg, &mut bot, &mut foil).run().unwrap();
        assert!(report.rounds <= cfg.max_turns);
        let tally = report.predictions[Side::P1.index()];
        assert!(tally.hits + tally.misses > 0);
    }
}
