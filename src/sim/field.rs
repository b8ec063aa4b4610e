//! Pitch geometry
//!
//! Static description of the field: touchlines, goal mouths and the
//! (cosmetic) penalty areas. Goal detection and bounds resolution are
//! expressed against it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Keeps a ball center strictly inside the goal mouth while in the net
const NET_SIDE_SKIN: f32 = 0.5;

/// One of the two short edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GoalSide {
    /// x = 0, defended by nobody; the opponent scores here
    Left,
    /// x = width, defended by the goalkeeper and defenders; the player scores here
    Right,
}

/// Axis-aligned rectangle (top-left origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }
}

/// Result of clamping a body against the field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsHit {
    /// Outward normal of each wall touched this step (zero when none)
    pub normal: Vec2,
}

impl BoundsHit {
    pub fn hit(&self) -> bool {
        self.normal != Vec2::ZERO
    }
}

/// The pitch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub width: f32,
    pub height: f32,
    pub goal_half_height: f32,
    /// Penalty and six-yard boxes, left then right (cosmetic only)
    pub penalty_areas: [Rect; 4],
}

impl Default for Field {
    fn default() -> Self {
        Self::new(FIELD_WIDTH, FIELD_HEIGHT, GOAL_HALF_HEIGHT)
    }
}

impl Field {
    pub fn new(width: f32, height: f32, goal_half_height: f32) -> Self {
        let cy = height / 2.0;
        let m = TOUCHLINE_MARGIN;
        Self {
            width,
            height,
            goal_half_height,
            penalty_areas: [
                Rect::new(m, cy - 80.0, 120.0, 160.0),
                Rect::new(m, cy - 40.0, 50.0, 80.0),
                Rect::new(width - m - 120.0, cy - 80.0, 120.0, 160.0),
                Rect::new(width - m - 50.0, cy - 40.0, 50.0, 80.0),
            ],
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Top of both goal mouths
    #[inline]
    pub fn goal_top(&self) -> f32 {
        self.height / 2.0 - self.goal_half_height
    }

    /// Bottom of both goal mouths
    #[inline]
    pub fn goal_bottom(&self) -> f32 {
        self.height / 2.0 + self.goal_half_height
    }

    /// x of the goal line on a side
    #[inline]
    pub fn goal_line_x(&self, side: GoalSide) -> f32 {
        match side {
            GoalSide::Left => 0.0,
            GoalSide::Right => self.width,
        }
    }

    /// Center of the goal mouth on a side
    pub fn goal_center(&self, side: GoalSide) -> Vec2 {
        Vec2::new(self.goal_line_x(side), self.height / 2.0)
    }

    /// Whether `y` lies inside the goal-mouth band
    #[inline]
    pub fn in_goal_mouth(&self, y: f32) -> bool {
        y > self.goal_top() && y < self.goal_bottom()
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }

    /// Which goal (if any) the ball center has reached
    ///
    /// A ball resting exactly on the line counts.
    pub fn goal_crossed(&self, ball_pos: Vec2) -> Option<GoalSide> {
        if !self.in_goal_mouth(ball_pos.y) {
            return None;
        }
        if ball_pos.x >= self.goal_line_x(GoalSide::Right) {
            Some(GoalSide::Right)
        } else if ball_pos.x <= self.goal_line_x(GoalSide::Left) {
            Some(GoalSide::Left)
        } else {
            None
        }
    }

    /// Clamp a body of `radius` inside the touchlines
    pub fn clamp_body(&self, pos: &mut Vec2, radius: f32) -> BoundsHit {
        let mut normal = Vec2::ZERO;
        if pos.x < radius {
            pos.x = radius;
            normal.x = -1.0;
        } else if pos.x > self.width - radius {
            pos.x = self.width - radius;
            normal.x = 1.0;
        }
        if pos.y < radius {
            pos.y = radius;
            normal.y = -1.0;
        } else if pos.y > self.height - radius {
            pos.y = self.height - radius;
            normal.y = 1.0;
        }
        BoundsHit { normal }
    }

    /// Clamp the ball, leaving the goal-mouth corridors open
    ///
    /// Inside a corridor the ball may run past the short edge up to
    /// `net_depth`, where the back of the net stops it.
    pub fn clamp_ball(&self, pos: &mut Vec2, radius: f32, net_depth: f32) -> BoundsHit {
        let mut normal = Vec2::ZERO;

        let (min_x, max_x) = if self.in_goal_mouth(pos.y) {
            (-net_depth, self.width + net_depth)
        } else {
            (radius, self.width - radius)
        };
        if pos.x < min_x {
            pos.x = min_x;
            normal.x = -1.0;
        } else if pos.x > max_x {
            pos.x = max_x;
            normal.x = 1.0;
        }

        // Inside the net its side walls bound the center, otherwise the
        // touchlines bound the rim
        let (min_y, max_y) = if pos.x < 0.0 || pos.x > self.width {
            (
                self.goal_top() + NET_SIDE_SKIN,
                self.goal_bottom() - NET_SIDE_SKIN,
            )
        } else {
            (radius, self.height - radius)
        };
        if pos.y < min_y {
            pos.y = min_y;
            normal.y = -1.0;
        } else if pos.y > max_y {
            pos.y = max_y;
            normal.y = 1.0;
        }
        BoundsHit { normal }
    }
}
