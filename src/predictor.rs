//! # Opponent predictors
//!
//! The statistical side of the automated player lives behind one narrow
//! capability: estimate a distribution over the subject side's next action
//! from an encoded feature vector, and optionally learn from the action the
//! subject actually took. The decision engine never knows which backend it
//! is talking to.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::action::{Action, NUM_ACTIONS};
use crate::config::DuelConfig;
use crate::utils::{DuelError, Probability};

/// A next-action estimator. The feature vector is always oriented so its
/// first half describes the side being predicted.
pub trait Predictor {
    /// Distribution over the subject's next action, or `None` when the
    /// backend has nothing to say (callers fall back to a random legal
    /// choice).
    fn predict(&self, features: &[f32]) -> Option<[Probability; NUM_ACTIONS]>;

    /// Learn from the action the subject actually took for `features`.
    fn observe(&mut self, features: &[f32], taken: Action);
}

/// No-data baseline. Every action is equally likely and nothing is learned.
#[derive(Debug, Default, Clone)]
pub struct UniformPredictor;

impl Predictor for UniformPredictor {
    fn predict(&self, _features: &[f32]) -> Option<[Probability; NUM_ACTIONS]> {
        Some([1.0 / NUM_ACTIONS as Probability; NUM_ACTIONS])
    }

    fn observe(&mut self, _features: &[f32], _taken: Action) {}
}

/// Multinomial logistic regression trained online by plain SGD on the
/// cross-entropy loss, one example per observed round. Starts from zero
/// weights, which predicts uniform until the first updates arrive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OnlineLogit {
    weights: Vec<[f64; NUM_ACTIONS]>,
    bias: [f64; NUM_ACTIONS],
    learning_rate: f64,
    examples_seen: u64,
}

impl OnlineLogit {
    const DEFAULT_LEARNING_RATE: f64 = 0.05;

    pub fn new(feature_len: usize) -> Self {
        OnlineLogit {
            weights: vec![[0.0; NUM_ACTIONS]; feature_len],
            bias: [0.0; NUM_ACTIONS],
            learning_rate: Self::DEFAULT_LEARNING_RATE,
            examples_seen: 0,
        }
    }

    pub fn for_config(cfg: &DuelConfig) -> Self {
        Self::new(cfg.feature_len())
    }

    pub fn feature_len(&self) -> usize {
        self.weights.len()
    }

    pub fn examples_seen(&self) -> u64 {
        self.examples_seen
    }

    fn softmax(&self, features: &[f32]) -> [f64; NUM_ACTIONS] {
        let mut logits = self.bias;
        for (row, &x) in self.weights.iter().zip(features) {
            if x == 0.0 {
                continue;
            }
            for (l, &w) in logits.iter_mut().zip(row) {
                *l += w * x as f64;
            }
        }
        let max = logits.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let mut exp = [0.0; NUM_ACTIONS];
        let mut sum = 0.0;
        for (e, l) in exp.iter_mut().zip(logits) {
            *e = (l - max).exp();
            sum += *e;
        }
        for e in exp.iter_mut() {
            *e /= sum;
        }
        exp
    }

    /// Persist the model as pretty JSON.
    pub fn save(&self, path: &Path) -> Result<(), DuelError> {
        let encoded = serde_json::to_string_pretty(self)?;
        fs::write(path, encoded)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, DuelError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Predictor for OnlineLogit {
    fn predict(&self, features: &[f32]) -> Option<[Probability; NUM_ACTIONS]> {
        debug_assert_eq!(features.len(), self.weights.len());
        Some(self.softmax(features))
    }

    fn observe(&mut self, features: &[f32], taken: Action) {
        debug_assert_eq!(features.len(), self.weights.len());
        let probs = self.softmax(features);
        let target = taken.index();
        // gradient of cross-entropy wrt logits is (p - onehot)
        for c in 0..NUM_ACTIONS {
            let grad = probs[c] - if c == target { 1.0 } else { 0.0 };
            let step = self.learning_rate * grad;
            self.bias[c] -= step;
            for (row, &x) in self.weights.iter_mut().zip(features) {
                if x != 0.0 {
                    row[c] -= step * x as f64;
                }
            }
        }
        self.examples_seen += 1;
    }
}
