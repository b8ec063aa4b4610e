//! End-to-end match scenarios driven through the public session API

use std::cell::RefCell;
use std::rc::Rc;

use glam::Vec2;
use kickoff::consts::SIM_DT;
use kickoff::sim::defender::step_defender;
use kickoff::sim::{DefenderState, GameEvent, Match, MatchPhase};
use kickoff::{Difficulty, MatchListener, MatchResult, MatchSession, Outcome, Tuning};

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

fn session(difficulty: Difficulty, tuning: Tuning) -> (MatchSession, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    let session =
        MatchSession::with_tuning(difficulty, tuning, 7, Box::new(Recorder(log.clone()))).unwrap();
    (session, log)
}

/// Run `seconds` of 60 Hz frames
fn run_for(session: &mut MatchSession, seconds: f32) {
    let frames = (seconds / SIM_DT).round() as usize;
    for _ in 0..frames {
        session.update(SIM_DT);
    }
}

fn place_ball(session: &mut MatchSession, pos: Vec2) {
    if let Some(m) = session.game_mut() {
        m.ball.pos = pos;
        m.ball.vel = Vec2::ZERO;
    }
}

/// Defenders that never touch the ball
fn hands_off_tuning() -> Tuning {
    Tuning::from_json(
        r#"{
            "defender_contact_range": 0.0,
            "patrol_clear_range": 0.0,
            "press_clear_range": 0.001
        }"#,
    )
    .unwrap()
}

#[test]
fn scoreless_hard_match_ends_once_after_ninety_seconds() {
    let (mut session, log) = session(Difficulty::Hard, hands_off_tuning());
    assert_eq!(session.game().map(|m| m.defenders.len()), Some(4));

    run_for(&mut session, 89.5);
    assert!(session.is_active());
    assert!(log.borrow().ends.is_empty());

    // Past full time plus the grace period
    run_for(&mut session, 3.0);
    assert!(!session.is_active());
    run_for(&mut session, 10.0);

    let log = log.borrow();
    assert!(log.goals.is_empty());
    assert_eq!(log.ends.len(), 1);
    assert_eq!(log.ends[0].player_goals, 0);
    assert_eq!(log.ends[0].opponent_goals, 0);
    assert_eq!(log.ends[0].outcome(), Outcome::Draw);
}

#[test]
fn three_one_win_on_medium_earns_324_xp() {
    let (mut session, log) = session(Difficulty::Medium, Tuning::default());
    if let Some(m) = session.game_mut() {
        m.defenders.clear();
    }

    for right in [true, true, false, true] {
        let x = if right { 800.0 } else { 0.0 };
        place_ball(&mut session, Vec2::new(x, 250.0));
        session.update(SIM_DT);
        // Celebration and kickoff reset
        run_for(&mut session, 1.2);
    }
    assert_eq!(log.borrow().goals, vec![(1, 0), (2, 0), (2, 1), (3, 1)]);

    if let Some(m) = session.game_mut() {
        m.state.time_remaining = 1;
    }
    run_for(&mut session, 4.0);

    let result = session.result().unwrap();
    assert_eq!((result.player_goals, result.opponent_goals), (3, 1));
    assert_eq!(result.outcome(), Outcome::Win);
    assert_eq!(result.xp_earned(), 324);
    assert_eq!(log.borrow().ends, vec![result]);
}

#[test]
fn ball_resting_on_goal_line_scores_and_resets() {
    let (mut session, log) = session(Difficulty::Medium, Tuning::default());
    if let Some(m) = session.game_mut() {
        m.defenders.clear();
    }
    place_ball(&mut session, Vec2::new(800.0, 250.0));

    let events = session.update(SIM_DT);
    assert!(events.contains(&GameEvent::GoalScored {
        scorer: kickoff::sim::Side::Player,
        player_goals: 1,
        opponent_goals: 0
    }));
    assert_eq!(log.borrow().goals, vec![(1, 0)]);

    // Run until the kickoff reset lands
    for _ in 0..120 {
        session.update(SIM_DT);
        if session.game().map(|m| m.state.phase) == Some(MatchPhase::Playing) {
            break;
        }
    }
    let m = session.game().unwrap();
    assert_eq!(m.ball.pos, m.field.center());
    assert_eq!(m.ball.vel, Vec2::ZERO);
    assert_eq!(m.state.phase, MatchPhase::Playing);
    assert_eq!(log.borrow().goals, vec![(1, 0)]);
}

#[test]
fn distant_defender_stays_in_patrol() {
    let mut m = Match::new(Difficulty::Hard.profile(), Tuning::default(), 5);
    m.defenders.truncate(1);
    let home = Vec2::new(400.0, 150.0);
    m.defenders[0].home = home;
    m.defenders[0].body.pos = home;

    for i in 0..600 {
        m.ball.pos = home + Vec2::new(300.0, 400.0);
        m.ball.vel = Vec2::ZERO;
        m.player.body.pos = home + Vec2::new(-360.0, 480.0);
        m.elapsed = i as f32 * SIM_DT;
        step_defender(&mut m, 0, SIM_DT);
        assert_eq!(m.defenders[0].state, DefenderState::Patrol);
    }
}

#[test]
fn teardown_twice_never_fires_pending_result() {
    let (mut session, log) = session(Difficulty::Easy, Tuning::default());
    if let Some(m) = session.game_mut() {
        m.state.time_remaining = 1;
    }
    run_for(&mut session, 1.5);
    assert!(!session.is_active());

    session.teardown();
    session.teardown();
    run_for(&mut session, 5.0);

    assert!(log.borrow().ends.is_empty());
    assert!(session.result().is_none());
    assert!(session.game().is_none());
}

#[test]
fn two_kick_presses_inside_cooldown_strike_once() {
    let (mut session, _) = session(Difficulty::Easy, Tuning::default());
    if let Some(m) = session.game_mut() {
        m.defenders.clear();
        m.ball.pos = m.player.body.pos + Vec2::new(15.0, 0.0);
    }

    let mut kicks = 0;
    let count = |events: Vec<GameEvent>| {
        events
            .iter()
            .filter(|e| matches!(e, GameEvent::Kick { .. }))
            .count()
    };
    session.input.tap_kick();
    kicks += count(session.update(SIM_DT));

    // Ball put back at the player's feet, second press 100 ms later
    run_for(&mut session, 0.1);
    if let Some(m) = session.game_mut() {
        m.ball.pos = m.player.body.pos + Vec2::new(15.0, 0.0);
    }
    session.input.tap_kick();
    kicks += count(session.update(SIM_DT));
    assert_eq!(kicks, 1);
}
