//! Match state and core simulation types
//!
//! `Match` is the single simulation context: it owns every entity by index
//! and is passed explicitly to each AI/physics step. No entity holds a
//! reference to another.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::field::{Field, GoalSide};
use super::schedule::PendingAction;
use crate::consts::*;
use crate::difficulty::DifficultyProfile;
use crate::tuning::Tuning;

/// Match lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchPhase {
    /// Ball in play
    Playing,
    /// Goal just scored; ball is dead until the kickoff reset fires
    Celebrating,
    /// Clock expired, final result not yet emitted
    FullTime,
    /// Final result emitted or match torn down
    Ended,
}

/// Who is carrying the ball (held by the carrier, not the ball)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

/// Transient banner shown by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusBanner {
    Goal,
    OpponentGoal,
    FullTime,
}

impl StatusBanner {
    pub fn text(&self) -> &'static str {
        match self {
            StatusBanner::Goal => "GOAL!",
            StatusBanner::OpponentGoal => "Opponent scored!",
            StatusBanner::FullTime => "FULL TIME!",
        }
    }
}

/// Something the host or the result emitter cares about
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    GoalScored {
        scorer: Side,
        player_goals: u32,
        opponent_goals: u32,
    },
    Kick {
        speed: f32,
    },
    Clearance {
        defender: usize,
    },
    Save,
    FullTime {
        player_goals: u32,
        opponent_goals: u32,
    },
    GameEnd {
        player_goals: u32,
        opponent_goals: u32,
    },
}

/// Kinematic body shared by every entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
        }
    }

    #[inline]
    pub fn distance_to(&self, other: &Body) -> f32 {
        self.pos.distance(other.pos)
    }

    /// Explicit Euler step
    #[inline]
    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// The human-controlled player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Dribbling: the ball is attracted to the player
    pub has_ball: bool,
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, PLAYER_RADIUS),
            has_ball: false,
        }
    }
}

/// Defender FSM states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DefenderState {
    #[default]
    Patrol,
    Press,
    Intercept,
    ClearBall,
}

/// A scripted defender
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefenderAgent {
    pub id: usize,
    pub body: Body,
    pub state: DefenderState,
    /// Patrol anchor
    pub home: Vec2,
    /// Hysteresis countdown (ms), decremented every tick
    pub state_timer: f32,
    /// Blocks another clearance or touch right after one (ms)
    pub clear_cooldown: f32,
    /// Phase offset so defenders don't patrol in lockstep
    pub patrol_phase: f32,
}

impl DefenderAgent {
    pub fn new(id: usize, home: Vec2) -> Self {
        Self {
            id,
            body: Body::new(home, DEFENDER_RADIUS),
            state: DefenderState::Patrol,
            home,
            state_timer: 0.0,
            clear_cooldown: 0.0,
            patrol_phase: id as f32 * 1.7,
        }
    }
}

/// The opponent goalkeeper (x pinned to its line)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goalkeeper {
    pub body: Body,
    pub line_x: f32,
}

impl Goalkeeper {
    pub fn new(field: &Field) -> Self {
        let line_x = field.width - KEEPER_LINE_OFFSET;
        Self {
            body: Body::new(Vec2::new(line_x, field.height / 2.0), KEEPER_RADIUS),
            line_x,
        }
    }
}

/// Home anchors for `count` defenders
///
/// Staggered in two columns and spread evenly between y=100 and
/// y=height-100. A single defender sits on the halfway height.
pub fn defender_homes(field: &Field, count: usize) -> Vec<Vec2> {
    (0..count)
        .map(|i| {
            let x = field.width * 0.4 + (i % 2) as f32 * 120.0;
            let y = if count > 1 {
                100.0 + i as f32 * ((field.height - 200.0) / (count - 1) as f32)
            } else {
                field.height / 2.0
            };
            Vec2::new(x, y)
        })
        .collect()
}

/// Score, clock and cooldowns owned by the match director
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchState {
    pub player_goals: u32,
    pub opponent_goals: u32,
    /// Whole seconds left on the clock
    pub time_remaining: u32,
    pub phase: MatchPhase,
    /// Milliseconds before the player may kick again
    pub kick_cooldown: f32,
    /// Milliseconds before a loose ball can be picked up again
    pub possession_lock: f32,
    pub status: Option<StatusBanner>,
    /// Cosmetic goal flash intensity (0-1)
    pub goal_flash: f32,
}

impl MatchState {
    pub fn new(duration: u32) -> Self {
        Self {
            player_goals: 0,
            opponent_goals: 0,
            time_remaining: duration,
            phase: MatchPhase::Playing,
            kick_cooldown: 0.0,
            possession_lock: 0.0,
            status: None,
            goal_flash: 0.0,
        }
    }

    /// True until the clock expires or the match is torn down
    pub fn is_active(&self) -> bool {
        matches!(self.phase, MatchPhase::Playing | MatchPhase::Celebrating)
    }

    pub fn ball_in_play(&self) -> bool {
        self.phase == MatchPhase::Playing
    }
}

/// Complete simulation context
#[derive(Debug, Clone)]
pub struct Match {
    pub seed: u64,
    pub field: Field,
    pub profile: DifficultyProfile,
    pub tuning: Tuning,
    pub state: MatchState,
    pub ball: Body,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub defenders: Vec<DefenderAgent>,
    pub keeper: Goalkeeper,
    /// Match-scoped delayed actions
    pub pending: Vec<PendingAction>,
    /// Events produced since the host last drained them
    pub events: Vec<GameEvent>,
    /// Simulated seconds since kickoff (drives patrol drift)
    pub elapsed: f32,
    pub time_ticks: u64,
    pub(crate) rng: Pcg32,
}

impl Match {
    pub fn new(profile: DifficultyProfile, tuning: Tuning, seed: u64) -> Self {
        let field = Field::default();
        let defenders = defender_homes(&field, profile.defender_count)
            .into_iter()
            .enumerate()
            .map(|(i, home)| DefenderAgent::new(i, home))
            .collect();
        let keeper = Goalkeeper::new(&field);

        Self {
            seed,
            ball: Body::new(field.center(), BALL_RADIUS),
            player: Player::new(Vec2::new(PLAYER_START_X, field.height / 2.0)),
            defenders,
            keeper,
            field,
            state: MatchState::new(profile.match_duration),
            profile,
            tuning,
            pending: Vec::new(),
            events: Vec::new(),
            elapsed: 0.0,
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Goal the opponents (defenders, keeper) protect
    pub fn defended_goal(&self) -> GoalSide {
        GoalSide::Right
    }

    /// Put the ball back on the center spot and the player on its mark
    pub fn reset_positions(&mut self) {
        self.ball.pos = self.field.center();
        self.ball.vel = Vec2::ZERO;
        self.player.body.pos = Vec2::new(PLAYER_START_X, self.field.height / 2.0);
        self.player.body.vel = Vec2::ZERO;
        self.player.has_ball = false;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
