//! # Match controller
//!
//! Drives the turn loop: asks both controllers for their simultaneous
//! actions against the same pre-round snapshot, charges selection costs,
//! resolves the pair, applies the combined delta under the clamping rules,
//! and checks for a decisive result. When the turn cap runs out the duel is
//! scored by remaining resources. Also keeps the running tallies of how
//! often each side's prediction matched what its opponent actually did.

use log::debug;

use crate::action::Action;
use crate::combatant::CombatantState;
use crate::config::DuelConfig;
use crate::controller::{Controller, RoundView};
use crate::encoder::HistoryWindow;
use crate::resolve::{resolve, RoundActionPair};
use crate::utils::{DuelError, Side, BOTH_SIDES, TIMEOUT_MANA_WEIGHT};

/// How a finished duel ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win(Side),
    Tie,
}

/// Prediction bookkeeping for one side. A round counts only when that
/// side's controller actually made a prediction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PredictionTally {
    pub hits: u32,
    pub misses: u32,
}

impl PredictionTally {
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.hits + self.misses;
        if total == 0 {
            None
        } else {
            Some(self.hits as f64 / total as f64)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchReport {
    pub outcome: Outcome,
    /// True when the turn cap forced the resource-score comparison.
    pub timed_out: bool,
    /// Rounds actually played.
    pub rounds: u32,
    pub predictions: [PredictionTally; 2],
}

/// One match between two controllers. Owns its state and history
/// exclusively; independent duels share nothing and can run side by side.
pub struct Duel<'a> {
    cfg: DuelConfig,
    states: [CombatantState; 2],
    history: HistoryWindow,
    turn: u32,
    controllers: [&'a mut dyn Controller; 2],
    tallies: [PredictionTally; 2],
}

impl<'a> Duel<'a> {
    pub fn new(
        cfg: DuelConfig,
        first: &'a mut dyn Controller,
        second: &'a mut dyn Controller,
    ) -> Self {
        let fresh = CombatantState::fresh(&cfg);
        Duel {
            cfg,
            states: [fresh, fresh],
            history: HistoryWindow::new(),
            turn: 1,
            controllers: [first, second],
            tallies: [PredictionTally::default(); 2],
        }
    }

    /// Play the duel to completion.
    pub fn run(mut self) -> Result<MatchReport, DuelError> {
        loop {
            if self.turn > self.cfg.max_turns {
                if self.cfg.narrate {
                    println!("Out of Time!");
                }
                return Ok(self.timed_out());
            }
            self.narrate_round_header();

            let pair = self.collect_actions()?;
            self.score_predictions(&pair);
            self.apply_round(&pair);
            self.history.push(pair);
            self.narrate_round_result(&pair);

            if let Some(outcome) = self.decisive_outcome() {
                self.narrate_outcome(outcome);
                return Ok(MatchReport {
                    outcome,
                    timed_out: false,
                    rounds: self.turn,
                    predictions: self.tallies,
                });
            }
            self.turn += 1;
        }
    }

    /// Both controllers decide against the same pre-round snapshot, then
    /// selection costs come off and each learns the other's revealed move.
    fn collect_actions(&mut self) -> Result<RoundActionPair, DuelError> {
        let snapshot = self.states;
        let mut actions = [Action::Attack; 2];
        for side in BOTH_SIDES {
            let view = RoundView {
                cfg: &self.cfg,
                history: &self.history,
                states: snapshot,
                side,
            };
            actions[side.index()] = self.controllers[side.index()].choose(&view)?;
        }
        let pair = RoundActionPair { actions };

        for side in BOTH_SIDES {
            self.states[side.index()].spend(pair.by(side));
            self.controllers[side.index()].observe_round(pair.by(side.other()));
        }
        Ok(pair)
    }

    fn score_predictions(&mut self, pair: &RoundActionPair) {
        for side in BOTH_SIDES {
            if let Some(predicted) = self.controllers[side.index()].last_prediction() {
                let actual = pair.by(side.other());
                if predicted == actual {
                    self.tallies[side.index()].hits += 1;
                } else {
                    self.tallies[side.index()].misses += 1;
                }
            }
        }
    }

    /// Resolve and apply: health first, then mana, whose underflow bleeds
    /// back into health. Both applications are clamped.
    fn apply_round(&mut self, pair: &RoundActionPair) {
        let delta = resolve(
            pair.by(Side::P1),
            pair.by(Side::P2),
            self.states[0],
            self.states[1],
        );
        debug!(
            "turn {}: {:?} resolved to {:?}",
            self.turn, pair.actions, delta
        );
        for side in BOTH_SIDES {
            self.states[side.index()].apply_health(delta.health[side.index()], &self.cfg);
        }
        for side in BOTH_SIDES {
            self.states[side.index()].apply_mana(delta.mana[side.index()], &self.cfg);
        }
    }

    fn decisive_outcome(&self) -> Option<Outcome> {
        match (self.states[0].is_dead(), self.states[1].is_dead()) {
            (true, true) => Some(Outcome::Tie),
            (true, false) => Some(Outcome::Win(Side::P2)),
            (false, true) => Some(Outcome::Win(Side::P1)),
            (false, false) => None,
        }
    }

    /// Turn-cap scoring: remaining health plus discounted remaining mana,
    /// higher total wins, equal totals tie.
    fn timed_out(self) -> MatchReport {
        let score = |s: CombatantState| s.health as f64 + TIMEOUT_MANA_WEIGHT * s.mana as f64;
        let p1 = score(self.states[0]);
        let p2 = score(self.states[1]);
        let outcome = if p1 > p2 {
            Outcome::Win(Side::P1)
        } else if p2 > p1 {
            Outcome::Win(Side::P2)
        } else {
            Outcome::Tie
        };
        self.narrate_outcome(outcome);
        MatchReport {
            outcome,
            timed_out: true,
            rounds: self.turn - 1,
            predictions: self.tallies,
        }
    }

    fn narrate_round_header(&self) {
        if !self.cfg.narrate {
            return;
        }
        println!("Round {}", self.turn);
        println!("There are {} rounds left", self.cfg.max_turns - self.turn);
        for side in BOTH_SIDES {
            let state = self.states[side.index()];
            println!(
                "{} ({}): {} health, {} mana",
                side,
                self.controllers[side.index()].name(),
                state.health,
                state.mana
            );
        }
        println!();
    }

    fn narrate_round_result(&self, pair: &RoundActionPair) {
        if !self.cfg.narrate {
            return;
        }
        for side in BOTH_SIDES {
            println!(
                "{} plays {}",
                self.controllers[side.index()].name(),
                pair.by(side)
            );
        }
        println!();
    }

    fn narrate_outcome(&self, outcome: Outcome) {
        if !self.cfg.narrate {
            return;
        }
        match outcome {
            Outcome::Win(side) => {
                println!("{} wins!", self.controllers[side.index()].name())
            }
            Outcome::Tie => println!("We have a tie!"),
        }
        println!("Game over\n");
    }
}
