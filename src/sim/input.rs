//! Input mapping
//!
//! The host writes raw control signals into an `InputState` whenever they
//! change; each tick samples it into a normalized `Intent`. Input is sampled,
//! not queued: changes between two samples are lost.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Direction keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// What the player wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// Movement direction scaled to magnitude <= 1 (y down)
    pub movement: Vec2,
    /// Kick requested this tick
    pub kick: bool,
}

/// Raw control signals, as last reported by the host
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Touch joystick vector; overrides the keys while non-zero
    pub analog: Vec2,
    /// Kick button currently held
    pub kick_held: bool,
    /// A press that has not been sampled yet
    kick_latched: bool,
}

impl InputState {
    pub fn set_direction(&mut self, dir: Direction, down: bool) {
        match dir {
            Direction::Up => self.up = down,
            Direction::Down => self.down = down,
            Direction::Left => self.left = down,
            Direction::Right => self.right = down,
        }
    }

    /// Update the touch joystick (clamped to unit length)
    pub fn set_analog(&mut self, v: Vec2) {
        self.analog = if v.is_finite() {
            v.clamp_length_max(1.0)
        } else {
            Vec2::ZERO
        };
    }

    pub fn release_analog(&mut self) {
        self.analog = Vec2::ZERO;
    }

    /// Kick key state; only the up->down edge requests a kick
    pub fn set_kick(&mut self, down: bool) {
        if down && !self.kick_held {
            self.kick_latched = true;
        }
        self.kick_held = down;
    }

    /// One-shot kick (touch tap)
    pub fn tap_kick(&mut self) {
        self.kick_latched = true;
    }

    /// Clear every held signal (focus lost, teardown)
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Sample the current snapshot, consuming any latched kick
    pub fn sample(&mut self) -> Intent {
        let kick = std::mem::take(&mut self.kick_latched);
        Intent {
            movement: self.movement(),
            kick,
        }
    }

    /// Current movement vector without consuming anything
    pub fn movement(&self) -> Vec2 {
        if self.analog != Vec2::ZERO {
            return self.analog;
        }
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down)).clamp_length_max(1.0)
    }
}
