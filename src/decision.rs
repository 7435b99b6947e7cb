//! # Decision engine
//!
//! Chooses an automated side's action from a predicted distribution over
//! the opponent's next move. The distribution is first masked down to what
//! the opponent could legally do; the surviving argmax becomes a single
//! point estimate, and every own legal action is then scored by replaying
//! the resolution rules against that estimate and taking an expected-value
//! reading of the hypothetical delta. Degenerate predictions drop to a
//! uniform random legal action rather than failing.

use log::debug;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::action::{Action, ALL_ACTIONS, NUM_ACTIONS};
use crate::combatant::CombatantState;
use crate::config::DuelConfig;
use crate::resolve::{resolve, StatsDelta};
use crate::utils::{DuelError, Probability, Score, W_HP, W_MP, W_TERM};

/// What the engine settled on for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub action: Action,
    /// The masked argmax that drove lookahead. Absent when the engine fell
    /// back to a random legal action, in which case nothing was predicted.
    pub predicted: Option<Action>,
}

/// Uniform choice among the currently legal actions. Attack is always
/// legal, so the set is never empty.
pub fn uniform_legal<R: Rng>(rng: &mut R, state: CombatantState) -> Action {
    state
        .legal_actions()
        .choose(rng)
        .copied()
        .unwrap_or(Action::Attack)
}

/// Expected value of a hypothetical round from the acting side's view.
/// Selection costs are passed separately because the resolution table is
/// cost-free; they count as mana lost by whoever pays them.
fn expected_value(delta: &StatsDelta, own_cost: i32, opp_cost: i32) -> Score {
    let favorable_health = (delta.health[0] - delta.health[1]) as Score;
    let own_mana = delta.mana[0] - own_cost;
    let opp_mana = delta.mana[1] - opp_cost;
    let favorable_mana = (own_mana - opp_mana) as Score;
    W_HP * favorable_health + W_MP * favorable_mana + W_TERM * delta.terminal as Score
}

pub struct DecisionEngine {
    cfg: DuelConfig,
}

impl DecisionEngine {
    pub fn new(cfg: DuelConfig) -> Self {
        DecisionEngine { cfg }
    }

    /// Pick an action for the side holding `own`, given a predicted
    /// distribution over the opponent's next action.
    ///
    /// Errors when either side is already dead: the match controller must
    /// never ask for a move in a terminal position.
    pub fn choose<R: Rng>(
        &self,
        rng: &mut R,
        mut predicted: [Probability; NUM_ACTIONS],
        own: CombatantState,
        opp: CombatantState,
    ) -> Result<Decision, DuelError> {
        if own.is_dead() || opp.is_dead() {
            return Err(DuelError::DecisionAfterDeath {
                own_health: own.health,
                opponent_health: opp.health,
            });
        }
        debug_assert!(
            own.mana <= self.cfg.max_mana && opp.mana <= self.cfg.max_mana,
            "mana above the configured cap"
        );

        // The opponent cannot have picked what it cannot pay for.
        for action in [Action::Counter, Action::Steal] {
            if opp.mana < action.mana_cost() {
                predicted[action.index()] = 0.0;
            }
        }

        let mass: Probability = predicted.iter().sum();
        if mass <= 0.0 {
            let action = uniform_legal(rng, own);
            debug!("prediction fully masked, falling back to {}", action);
            return Ok(Decision {
                action,
                predicted: None,
            });
        }
        for p in predicted.iter_mut() {
            *p /= mass;
        }

        // Single point estimate; ties break to the lowest action index.
        let mut expected_opp = Action::Attack;
        for action in ALL_ACTIONS {
            if predicted[action.index()] > predicted[expected_opp.index()] {
                expected_opp = action;
            }
        }

        let mut best: Option<(Action, Score)> = None;
        for tentative in ALL_ACTIONS {
            if !own.can_afford(tentative) {
                continue;
            }
            let score = self.lookahead(tentative, expected_opp, own, opp);
            debug!("lookahead {} vs {}: ev {:.2}", tentative, expected_opp, score);
            match best {
                Some((_, incumbent)) if score <= incumbent => {}
                _ => best = Some((tentative, score)),
            }
        }

        match best {
            Some((action, _)) => Ok(Decision {
                action,
                predicted: Some(expected_opp),
            }),
            // Unreachable while Attack costs nothing, kept as a recovery
            // path rather than a panic.
            None => Ok(Decision {
                action: uniform_legal(rng, own),
                predicted: Some(expected_opp),
            }),
        }
    }

    /// Score one hypothetical round. Both sides' selection costs are
    /// charged to scratch copies first, exactly as the authoritative loop
    /// charges them before resolution, and count toward the EV.
    fn lookahead(
        &self,
        own_action: Action,
        opp_action: Action,
        own: CombatantState,
        opp: CombatantState,
    ) -> Score {
        let mut own_sim = own;
        let mut opp_sim = opp;
        own_sim.spend(own_action);
        opp_sim.spend(opp_action);
        let delta = resolve(own_action, opp_action, own_sim, opp_sim);
        expected_value(&delta, own_action.mana_cost(), opp_action.mana_cost())
    }
}
