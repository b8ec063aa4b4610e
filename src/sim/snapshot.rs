//! Render view of a match
//!
//! Plain data handed to whatever draws the pitch. Built fresh each frame
//! from the `Match`; nothing here feeds back into the simulation.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::field::{Field, Rect};
use super::state::{DefenderState, Match, MatchPhase};

/// Static pitch markings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldView {
    pub width: f32,
    pub height: f32,
    pub goal_top: f32,
    pub goal_bottom: f32,
    /// Depth of the net drawn behind each goal line
    pub goal_net_depth: f32,
    /// Penalty and six-yard boxes, left then right
    pub penalty_areas: [Rect; 4],
}

impl FieldView {
    pub fn new(field: &Field, goal_net_depth: f32) -> Self {
        Self {
            width: field.width,
            height: field.height,
            goal_top: field.goal_top(),
            goal_bottom: field.goal_bottom(),
            goal_net_depth,
            penalty_areas: field.penalty_areas,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DefenderView {
    pub id: usize,
    pub pos: Vec2,
    pub radius: f32,
    pub state: DefenderState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub field: FieldView,
    pub phase: MatchPhase,
    pub player_goals: u32,
    pub opponent_goals: u32,
    pub time_remaining: u32,
    /// Clock display turns red
    pub clock_critical: bool,
    pub status: Option<String>,
    pub goal_flash: f32,
    pub ball: EntityView,
    pub player: EntityView,
    pub player_has_ball: bool,
    pub keeper: EntityView,
    pub defenders: Vec<DefenderView>,
}

impl MatchSnapshot {
    pub fn capture(m: &Match) -> Self {
        let defenders = m
            .defenders
            .iter()
            .map(|d| DefenderView {
                id: d.id,
                pos: d.body.pos,
                radius: d.body.radius,
                state: d.state,
            })
            .collect();

        Self {
            tick: m.time_ticks,
            field: FieldView::new(&m.field, m.tuning.goal_net_depth),
            phase: m.state.phase,
            player_goals: m.state.player_goals,
            opponent_goals: m.state.opponent_goals,
            time_remaining: m.state.time_remaining,
            clock_critical: super::tick::clock_critical(m),
            status: m.state.status.map(|s| s.text().to_string()),
            goal_flash: m.state.goal_flash,
            ball: EntityView {
                pos: m.ball.pos,
                radius: m.ball.radius,
            },
            player: EntityView {
                pos: m.player.body.pos,
                radius: m.player.body.radius,
            },
            player_has_ball: m.player.has_ball,
            keeper: EntityView {
                pos: m.keeper.body.pos,
                radius: m.keeper.body.radius,
            },
            defenders,
        }
    }

    /// `mm:ss` clock text
    pub fn clock_text(&self) -> String {
        format!("{}:{:02}", self.time_remaining / 60, self.time_remaining % 60)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
