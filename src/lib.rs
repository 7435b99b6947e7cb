pub mod action;
pub mod combatant;
pub mod config;
pub mod controller;
pub mod decision;
pub mod duel;
pub mod encoder;
pub mod predictor;
pub mod resolve;
pub mod simulate;
pub mod utils;

// Tests
#[cfg(test)]
mod duel_tests;
