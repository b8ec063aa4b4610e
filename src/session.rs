//! Live match session
//!
//! Bridges a host frame callback to the fixed-step simulation. Physics runs
//! in `SIM_DT` substeps out of an accumulator; the match clock and the
//! deferred actions advance on raw frame time. A timer armed during a frame
//! starts counting on the next one.
//! Goal and final-result events are forwarded to a `MatchListener`.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::difficulty::Difficulty;
use crate::result::MatchResult;
use crate::sim::snapshot::MatchSnapshot;
use crate::sim::tick::{self, advance_deferred, clock_second};
use crate::sim::{GameEvent, InputState, Match};
use crate::tuning::{Tuning, TuningError};

/// Callbacks implemented by the host (scoreboard, profile/XP system)
pub trait MatchListener {
    /// Fired every time the score changes
    fn on_goal_scored(&mut self, _player_goals: u32, _opponent_goals: u32) {}
    /// Fired once, after the full-time grace period
    fn on_game_end(&mut self, _result: &MatchResult) {}
}

pub struct MatchSession {
    game: Option<Match>,
    difficulty: Difficulty,
    /// Control signals written by the host between frames
    pub input: InputState,
    listener: Box<dyn MatchListener>,
    /// Unsimulated physics time
    accumulator: f32,
    /// Time toward the next clock second
    clock_accumulator: f32,
    final_result: Option<MatchResult>,
}

impl MatchSession {
    /// Kick off a match with default tuning
    pub fn start(difficulty: Difficulty, seed: u64, listener: Box<dyn MatchListener>) -> Self {
        Self::kickoff(difficulty, Tuning::default(), seed, listener)
    }

    /// Kick off a match with custom tuning; rejected values never reach the sim
    pub fn with_tuning(
        difficulty: Difficulty,
        tuning: Tuning,
        seed: u64,
        listener: Box<dyn MatchListener>,
    ) -> Result<Self, TuningError> {
        if let Err(e) = tuning.validate() {
            log::warn!("Rejected tuning: {}", e);
            return Err(e);
        }
        Ok(Self::kickoff(difficulty, tuning, seed, listener))
    }

    fn kickoff(
        difficulty: Difficulty,
        tuning: Tuning,
        seed: u64,
        listener: Box<dyn MatchListener>,
    ) -> Self {
        let game = Match::new(difficulty.profile(), tuning, seed);
        log::info!(
            "Kickoff: {} difficulty, {} defenders, {}s (seed {})",
            difficulty.as_str(),
            game.profile.defender_count,
            game.profile.match_duration,
            seed
        );
        Self {
            game: Some(game),
            difficulty,
            input: InputState::default(),
            listener,
            accumulator: 0.0,
            clock_accumulator: 0.0,
            final_result: None,
        }
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// The running match, until teardown
    pub fn game(&self) -> Option<&Match> {
        self.game.as_ref()
    }

    pub fn game_mut(&mut self) -> Option<&mut Match> {
        self.game.as_mut()
    }

    /// True while the clock is running
    pub fn is_active(&self) -> bool {
        self.game.as_ref().is_some_and(|m| m.state.is_active())
    }

    /// Final result once it has been emitted
    pub fn result(&self) -> Option<MatchResult> {
        self.final_result
    }

    /// Advance by one host frame; returns the events produced during it
    pub fn update(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        let Some(game) = self.game.as_mut() else {
            return Vec::new();
        };
        let dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };

        // Timers armed during an earlier frame; ones armed below start
        // counting next frame so no delay runs short
        advance_deferred(game, dt);

        // Fixed-step physics
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let intent = self.input.sample();
            tick::tick(game, &intent, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        // Drop time we refused to simulate
        if substeps == MAX_SUBSTEPS {
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        // Match clock
        self.clock_accumulator += dt;
        while self.clock_accumulator >= 1.0 {
            self.clock_accumulator -= 1.0;
            clock_second(game);
        }

        let events = game.drain_events();
        self.dispatch(&events);
        events
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match *event {
                GameEvent::GoalScored {
                    player_goals,
                    opponent_goals,
                    ..
                } => self.listener.on_goal_scored(player_goals, opponent_goals),
                GameEvent::GameEnd {
                    player_goals,
                    opponent_goals,
                } => {
                    if self.final_result.is_some() {
                        continue;
                    }
                    let result = MatchResult::new(player_goals, opponent_goals, self.difficulty);
                    log::info!(
                        "Final result: {}-{} ({}, {} XP)",
                        player_goals,
                        opponent_goals,
                        result.outcome().as_str(),
                        result.xp_earned()
                    );
                    self.final_result = Some(result);
                    self.listener.on_game_end(&result);
                }
                _ => {}
            }
        }
    }

    /// Render view of the current frame
    pub fn snapshot(&self) -> Option<MatchSnapshot> {
        self.game.as_ref().map(MatchSnapshot::capture)
    }

    /// Stop the match and drop its state; pending callbacks never fire
    ///
    /// Safe to call any number of times.
    pub fn teardown(&mut self) {
        if let Some(mut game) = self.game.take() {
            tick::teardown(&mut game);
        }
        self.input.reset();
        self.accumulator = 0.0;
        self.clock_accumulator = 0.0;
    }
}

impl Drop for MatchSession {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Direction;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Log {
        goals: Vec<(u32, u32)>,
        ends: Vec<MatchResult>,
    }

    struct Recorder(Rc<RefCell<Log>>);

    impl MatchListener for Recorder {
        fn on_goal_scored(&mut self, player_goals: u32, opponent_goals: u32) {
            self.0.borrow_mut().goals.push((player_goals, opponent_goals));
        }

        fn on_game_end(&mut self, result: &MatchResult) {
            self.0.borrow_mut().ends.push(*result);
        }
    }

    fn recorded(difficulty: Difficulty) -> (MatchSession, Rc<RefCell<Log>>) {
        let log = Rc::new(RefCell::new(Log::default()));
        let session = MatchSession::start(difficulty, 1, Box::new(Recorder(log.clone())));
        (session, log)
    }

    #[test]
    fn test_substeps_are_capped() {
        let (mut session, _) = recorded(Difficulty::Easy);
        session.update(10.0);
        let ticks = session.game().map(|m| m.time_ticks).unwrap_or(0);
        assert!(ticks <= MAX_SUBSTEPS as u64);
        assert!(ticks >= 5);
    }

    #[test]
    fn test_goal_reaches_listener() {
        let (mut session, log) = recorded(Difficulty::Medium);
        if let Some(m) = session.game_mut() {
            m.ball.pos = glam::Vec2::new(m.field.width, m.field.height / 2.0);
        }
        session.update(SIM_DT);
        assert_eq!(log.borrow().goals, vec![(1, 0)]);
    }

    #[test]
    fn test_clock_counts_down_on_frame_time() {
        let (mut session, _) = recorded(Difficulty::Easy);
        for _ in 0..25 {
            session.update(0.1);
        }
        let remaining = session.game().map(|m| m.state.time_remaining);
        assert!(matches!(remaining, Some(57) | Some(58)));
    }

    #[test]
    fn test_teardown_twice_and_update_after() {
        let (mut session, log) = recorded(Difficulty::Easy);
        if let Some(m) = session.game_mut() {
            m.state.time_remaining = 1;
        }
        session.update(0.1);
        for _ in 0..10 {
            session.update(0.1);
        }
        // Full time blown, result still pending
        assert!(!session.is_active());
        assert!(log.borrow().ends.is_empty());

        session.teardown();
        session.teardown();
        for _ in 0..50 {
            assert!(session.update(0.1).is_empty());
        }
        assert!(log.borrow().ends.is_empty());
        assert!(session.snapshot().is_none());
    }

    #[test]
    fn test_held_kick_fires_once() {
        let (mut session, _) = recorded(Difficulty::Easy);
        if let Some(m) = session.game_mut() {
            m.defenders.clear();
            m.ball.pos = m.player.body.pos + glam::Vec2::new(20.0, 0.0);
        }
        session.input.set_kick(true);
        let mut kicks = 0;
        for _ in 0..120 {
            kicks += session
                .update(SIM_DT)
                .iter()
                .filter(|e| matches!(e, GameEvent::Kick { .. }))
                .count();
        }
        assert_eq!(kicks, 1);
    }

    #[test]
    fn test_with_tuning_rejects_inverted_keeper_span() {
        let mut tuning = Tuning::default();
        tuning.keeper_margin = 60.0;
        let log = Rc::new(RefCell::new(Log::default()));
        let err =
            MatchSession::with_tuning(Difficulty::Easy, tuning, 1, Box::new(Recorder(log))).err();
        assert!(matches!(
            err,
            Some(TuningError::Invalid {
                field: "keeper_margin",
                ..
            })
        ));
    }

    #[test]
    fn test_with_tuning_widest_margin_plays() {
        let mut tuning = Tuning::default();
        tuning.keeper_margin = 54.0;
        let log = Rc::new(RefCell::new(Log::default()));
        let mut session =
            MatchSession::with_tuning(Difficulty::Hard, tuning, 3, Box::new(Recorder(log)))
                .unwrap();
        for _ in 0..120 {
            session.update(SIM_DT);
        }
        let keeper_y = session.game().map(|m| m.keeper.body.pos.y);
        assert_eq!(keeper_y, Some(250.0));
    }

    #[test]
    fn test_full_time_grace_is_never_short() {
        let (mut session, _) = recorded(Difficulty::Easy);
        if let Some(m) = session.game_mut() {
            m.defenders.clear();
            m.state.time_remaining = 1;
        }
        let mut full_time = None;
        let mut game_end = None;
        for frame in 0..60 {
            for event in session.update(0.1) {
                match event {
                    GameEvent::FullTime { .. } => full_time = Some(frame),
                    GameEvent::GameEnd { .. } => game_end = Some(frame),
                    _ => {}
                }
            }
        }
        let gap = game_end.unwrap() - full_time.unwrap();
        // 2 s of 100 ms frames, counted from the frame after the whistle
        assert!((20..=21).contains(&gap), "grace lasted {} frames", gap);
    }

    #[test]
    fn test_kickoff_reset_waits_full_delay() {
        let (mut session, _) = recorded(Difficulty::Easy);
        if let Some(m) = session.game_mut() {
            m.defenders.clear();
            m.ball.pos = glam::Vec2::new(m.field.width, m.field.height / 2.0);
        }
        session.update(0.1);
        let mut frames = 0;
        while session.game().map(|m| m.state.phase) == Some(crate::sim::MatchPhase::Celebrating) {
            session.update(0.1);
            frames += 1;
            assert!(frames < 30);
        }
        assert!((10..=11).contains(&frames), "reset after {} frames", frames);
    }

    #[test]
    fn test_input_moves_player() {
        let (mut session, _) = recorded(Difficulty::Easy);
        let start = session.game().map(|m| m.player.body.pos);
        session.input.set_direction(Direction::Down, true);
        session.update(0.05);
        let end = session.game().map(|m| m.player.body.pos);
        assert!(end.zip(start).is_some_and(|(e, s)| e.y > s.y));
    }
}
