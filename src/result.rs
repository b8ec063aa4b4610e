//! Final result handed to the progression layer
//!
//! The simulation only reports goals; turning them into XP belongs to the
//! collaborator that persists the profile. `MatchResult::xp_earned` is the
//! shared formula so every host computes it the same way.

use serde::{Deserialize, Serialize};

use crate::difficulty::Difficulty;

/// XP per goal scored by the player
pub const XP_PER_GOAL: u32 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    /// Flat XP bonus for the outcome
    pub fn bonus(&self) -> u32 {
        match self {
            Outcome::Win => 150,
            Outcome::Draw => 60,
            Outcome::Loss => 20,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Draw => "draw",
            Outcome::Loss => "loss",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub player_goals: u32,
    pub opponent_goals: u32,
    pub difficulty: Difficulty,
    /// Configured match length
    pub duration_secs: u32,
}

impl MatchResult {
    pub fn new(player_goals: u32, opponent_goals: u32, difficulty: Difficulty) -> Self {
        Self {
            player_goals,
            opponent_goals,
            difficulty,
            duration_secs: difficulty.profile().match_duration,
        }
    }

    pub fn outcome(&self) -> Outcome {
        use std::cmp::Ordering;
        match self.player_goals.cmp(&self.opponent_goals) {
            Ordering::Greater => Outcome::Win,
            Ordering::Equal => Outcome::Draw,
            Ordering::Less => Outcome::Loss,
        }
    }

    /// `round((goals * 40 + bonus) * multiplier)`
    pub fn xp_earned(&self) -> u32 {
        let base = self.player_goals as f64 * XP_PER_GOAL as f64 + self.outcome().bonus() as f64;
        (base * self.difficulty.xp_multiplier()).round() as u32
    }
}
