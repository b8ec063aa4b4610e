//! Difficulty tiers
//!
//! A tier is picked by the caller before kickoff and stays fixed for the
//! whole match.

use serde::{Deserialize, Serialize};

/// Difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" | "med" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// XP multiplier applied to the match reward
    pub fn xp_multiplier(&self) -> f64 {
        match self {
            Difficulty::Easy => 1.0,
            Difficulty::Medium => 1.2,
            Difficulty::Hard => 1.5,
        }
    }

    pub fn profile(&self) -> DifficultyProfile {
        DifficultyProfile::for_difficulty(*self)
    }
}

/// Fixed per-tier constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub difficulty: Difficulty,
    /// Player top speed (units/s)
    pub player_speed: f32,
    /// Defender chase speed (units/s)
    pub defender_speed: f32,
    pub defender_count: usize,
    /// Goalkeeper lateral speed (units/s)
    pub keeper_speed: f32,
    /// Distance under which a defender stops patrolling
    pub engagement_range: f32,
    /// Match length in whole seconds
    pub match_duration: u32,
    /// Defenders may enter the intercept state
    pub intercept_enabled: bool,
    /// Ball prediction horizon used while pressing (seconds)
    pub press_horizon: f32,
}

impl DifficultyProfile {
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        match difficulty {
            Difficulty::Easy => Self {
                difficulty,
                player_speed: 200.0,
                defender_speed: 120.0,
                defender_count: 2,
                keeper_speed: 90.0,
                engagement_range: 200.0,
                match_duration: 60,
                intercept_enabled: false,
                press_horizon: 0.4,
            },
            Difficulty::Medium => Self {
                difficulty,
                player_speed: 220.0,
                defender_speed: 160.0,
                defender_count: 3,
                keeper_speed: 110.0,
                engagement_range: 260.0,
                match_duration: 75,
                intercept_enabled: false,
                press_horizon: 0.45,
            },
            Difficulty::Hard => Self {
                difficulty,
                player_speed: 240.0,
                defender_speed: 200.0,
                defender_count: 4,
                keeper_speed: 140.0,
                engagement_range: 320.0,
                match_duration: 90,
                intercept_enabled: true,
                press_horizon: 0.5,
            },
        }
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}
