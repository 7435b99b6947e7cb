//! Evaluation batches: many independent duels between the same two
//! controllers, with outcomes and prediction accuracy aggregated. The
//! controllers persist across matches, so a learning side keeps its model
//! from one duel to the next.

use log::info;

use crate::config::DuelConfig;
use crate::controller::Controller;
use crate::duel::{Duel, Outcome, PredictionTally};
use crate::utils::{DuelError, Side, BOTH_SIDES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub matches: u32,
    pub wins: [u32; 2],
    pub ties: u32,
    pub timeouts: u32,
    pub predictions: [PredictionTally; 2],
}

impl BatchReport {
    pub fn summary(&self) -> String {
        let mut line = format!(
            "{} matches: {} / {} / {} (P1 wins / P2 wins / ties), {} by timeout",
            self.matches, self.wins[0], self.wins[1], self.ties, self.timeouts
        );
        for side in BOTH_SIDES {
            if let Some(acc) = self.predictions[side.index()].accuracy() {
                line.push_str(&format!(", {} accuracy {:.1}%", side, acc * 100.0));
            }
        }
        line
    }
}

/// Run `matches` duels between the two controllers and aggregate results.
pub fn run_batch(
    cfg: DuelConfig,
    matches: u32,
    first: &mut dyn Controller,
    second: &mut dyn Controller,
) -> Result<BatchReport, DuelError> {
    let mut report = BatchReport {
        matches,
        ..BatchReport::default()
    };
    for played in 0..matches {
        let result = Duel::new(cfg, first, second).run()?;
        match result.outcome {
            Outcome::Win(Side::P1) => report.wins[0] += 1,
            Outcome::Win(Side::P2) => report.wins[1] += 1,
            Outcome::Tie => report.ties += 1,
        }
        if result.timed_out {
            report.timeouts += 1;
        }
        for side in BOTH_SIDES {
            report.predictions[side.index()].hits += result.predictions[side.index()].hits;
            report.predictions[side.index()].misses += result.predictions[side.index()].misses;
        }
        if (played + 1) % 100 == 0 {
            info!("evaluation progress: {}/{}", played + 1, matches);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{PredictiveController, RandomController, ScriptedController};
    use crate::predictor::OnlineLogit;

    #[test]
    fn batch_counts_add_up() {
        let cfg = DuelConfig::default();
        let mut a = RandomController::new("a");
        let mut b = ScriptedController::new("b");
        let report = run_batch(cfg, 20, &mut a, &mut b).unwrap();
        assert_eq!(report.matches, 20);
        assert_eq!(report.wins[0] + report.wins[1] + report.ties, 20);
    }

    #[test]
    fn learning_side_accumulates_examples() {
        let cfg = DuelConfig::default();
        let mut bot = PredictiveController::new(cfg, OnlineLogit::for_config(&cfg), "bot");
        let mut foil = ScriptedController::new("foil");
        run_batch(cfg, 5, &mut bot, &mut foil).unwrap();
        assert!(bot.predictor().examples_seen() > 0);
    }
}
