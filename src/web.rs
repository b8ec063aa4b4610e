//! Browser bindings
//!
//! Thin wasm-bindgen wrapper over `MatchSession`. The page owns the canvas
//! and the requestAnimationFrame loop; it forwards key/touch input and the
//! frame timestamp, and draws from the JSON snapshot.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::difficulty::Difficulty;
use crate::result::MatchResult;
use crate::session::{MatchListener, MatchSession};
use crate::sim::Direction;

/// Forwards listener callbacks to JS functions
struct JsListener {
    on_goal: Option<js_sys::Function>,
    on_end: Option<js_sys::Function>,
}

impl MatchListener for JsListener {
    fn on_goal_scored(&mut self, player_goals: u32, opponent_goals: u32) {
        if let Some(f) = &self.on_goal {
            let res = f.call2(
                &JsValue::NULL,
                &JsValue::from(player_goals),
                &JsValue::from(opponent_goals),
            );
            if let Err(e) = res {
                log::warn!("onGoalScored threw: {:?}", e);
            }
        }
    }

    fn on_game_end(&mut self, result: &MatchResult) {
        if let Some(f) = &self.on_end {
            let res = f.call2(
                &JsValue::NULL,
                &JsValue::from(result.player_goals),
                &JsValue::from(result.opponent_goals),
            );
            if let Err(e) = res {
                log::warn!("onGameEnd threw: {:?}", e);
            }
        }
    }
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
}

#[wasm_bindgen]
pub struct WebMatch {
    session: MatchSession,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebMatch {
    /// `difficulty` is "easy" | "medium" | "hard"; unknown values fall back to easy
    #[wasm_bindgen(constructor)]
    pub fn new(
        difficulty: &str,
        on_goal_scored: Option<js_sys::Function>,
        on_game_end: Option<js_sys::Function>,
    ) -> WebMatch {
        let difficulty = Difficulty::from_str(difficulty).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using easy", difficulty);
            Difficulty::Easy
        });
        let seed = (js_sys::Math::random() * u32::MAX as f64) as u64;
        let listener = JsListener {
            on_goal: on_goal_scored,
            on_end: on_game_end,
        };
        WebMatch {
            session: MatchSession::start(difficulty, seed, Box::new(listener)),
            last_time: None,
        }
    }

    /// Frame callback with the requestAnimationFrame timestamp (ms)
    pub fn frame(&mut self, time_ms: f64) {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time_ms);
        self.session.update(dt);
    }

    /// Key up/down by `KeyboardEvent.key`
    pub fn key(&mut self, key: &str, down: bool) {
        let dir = match key {
            "ArrowUp" | "w" | "W" => Direction::Up,
            "ArrowDown" | "s" | "S" => Direction::Down,
            "ArrowLeft" | "a" | "A" => Direction::Left,
            "ArrowRight" | "d" | "D" => Direction::Right,
            " " => {
                self.session.input.set_kick(down);
                return;
            }
            _ => return,
        };
        self.session.input.set_direction(dir, down);
    }

    /// Touch joystick vector, each axis in [-1, 1]
    pub fn joystick(&mut self, x: f32, y: f32) {
        self.session.input.set_analog(Vec2::new(x, y));
    }

    pub fn joystick_release(&mut self) {
        self.session.input.release_analog();
    }

    pub fn tap_kick(&mut self) {
        self.session.input.tap_kick();
    }

    /// Window lost focus: drop held keys
    pub fn blur(&mut self) {
        self.session.input.reset();
    }

    /// JSON render snapshot, or null after teardown
    pub fn snapshot(&self) -> Option<String> {
        let snap = self.session.snapshot()?;
        match snap.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Snapshot serialization failed: {}", e);
                None
            }
        }
    }

    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.session.is_active()
    }

    /// XP for the finished match, once the result was emitted
    #[wasm_bindgen(js_name = xpEarned)]
    pub fn xp_earned(&self) -> Option<u32> {
        self.session.result().map(|r| r.xp_earned())
    }

    pub fn teardown(&mut self) {
        self.session.teardown();
        self.last_time = None;
    }
}
