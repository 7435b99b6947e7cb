//! # Round resolution
//!
//! Reconciles two simultaneously chosen actions into one combined delta.
//! The rule table is written once, from the acting side's perspective, and
//! evaluated twice with roles swapped; both contributions accumulate
//! additively, so evaluation order cannot matter. Selection costs for
//! Counter and Steal are charged out-of-band before resolution and never
//! appear in the table.
//!
//! The same function scores hypothetical rounds inside the decision engine,
//! which is why it takes snapshots and returns a transient delta instead of
//! touching live state.

use crate::action::Action;
use crate::combatant::CombatantState;
use crate::utils::Side;

/// The two chosen actions for one round, in side order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundActionPair {
    pub actions: [Action; 2],
}

impl RoundActionPair {
    pub fn new(p1: Action, p2: Action) -> Self {
        RoundActionPair { actions: [p1, p2] }
    }

    #[inline]
    pub fn by(&self, side: Side) -> Action {
        self.actions[side.index()]
    }
}

/// Outcome of resolving one round, relative to the evaluating side:
/// index 0 is "own", index 1 is "opponent". Produced and consumed within a
/// single resolution; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsDelta {
    pub health: [i32; 2],
    pub mana: [i32; 2],
    /// +1 when strictly the opponent dies, -1 when own side dies (alone or
    /// together with the opponent), 0 otherwise.
    pub terminal: i8,
}

/// One side's contribution to the round, relative to that side.
#[derive(Default, Clone, Copy)]
struct SideEffects {
    own_health: i32,
    own_mana: i32,
    opp_health: i32,
    opp_mana: i32,
}

/// The rule table for a single acting side. `opp_mana` is the opponent's
/// mana at resolution time (selection costs already charged); the Steal
/// clauses use it to refuse stealing mana the opponent does not have.
fn acted(own: Action, opp: Action, opp_mana: i32) -> SideEffects {
    let mut fx = SideEffects::default();
    match own {
        Action::Attack => fx.opp_health -= 1,
        Action::Defend => {
            if opp == Action::Attack {
                fx.opp_mana -= 1;
                fx.own_health += 1;
            }
        }
        Action::Rest => fx.own_mana += 2,
        Action::Counter => {
            if opp == Action::Attack {
                fx.own_health += 1;
                fx.opp_health -= 1;
            }
        }
        Action::Steal => match opp {
            Action::Attack => {
                fx.own_health += 1;
                fx.opp_health -= 1;
            }
            Action::Defend => {
                fx.opp_mana -= 1;
                if opp_mana > 0 {
                    fx.own_mana += 1;
                }
            }
            Action::Rest => {
                fx.own_health += 1;
                fx.opp_health -= 1;
                fx.own_mana += 1;
                fx.opp_mana -= 1;
            }
            Action::Counter => {
                fx.own_health += 1;
                fx.opp_health -= 1;
                if opp_mana > 0 {
                    fx.own_mana += 1;
                    fx.opp_mana -= 1;
                }
            }
            Action::Steal => {}
        },
    }
    fx
}

/// Resolve one simultaneous round from `own`'s perspective.
///
/// `own_state` and `opp_state` are snapshots taken after selection costs
/// were charged. Swapping all operands yields the mirrored delta with the
/// terminal sign flipped, except that mutual death reads -1 from both
/// perspectives.
pub fn resolve(
    own: Action,
    opp: Action,
    own_state: CombatantState,
    opp_state: CombatantState,
) -> StatsDelta {
    let ours = acted(own, opp, opp_state.mana);
    let theirs = acted(opp, own, own_state.mana);

    let delta = StatsDelta {
        health: [
            ours.own_health + theirs.opp_health,
            ours.opp_health + theirs.own_health,
        ],
        mana: [
            ours.own_mana + theirs.opp_mana,
            ours.opp_mana + theirs.own_mana,
        ],
        terminal: 0,
    };

    let own_after = own_state.health + delta.health[0];
    let opp_after = opp_state.health + delta.health[1];
    let terminal = match (own_after <= 0, opp_after <= 0) {
        (true, _) => -1,
        (false, true) => 1,
        (false, false) => 0,
    };

    StatsDelta { terminal, ..delta }
}
