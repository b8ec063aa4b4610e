//! Kickoff - native headless runner
//!
//! Plays one full match with a scripted autopilot and logs what happens.
//! Usage: `kickoff [easy|medium|hard] [seed]`

#[cfg(not(target_arch = "wasm32"))]
use kickoff::{
    Difficulty, MatchListener, MatchResult, MatchSession,
    consts::SIM_DT,
    sim::{GoalSide, Match},
};

#[cfg(not(target_arch = "wasm32"))]
struct LogListener;

#[cfg(not(target_arch = "wasm32"))]
impl MatchListener for LogListener {
    fn on_goal_scored(&mut self, player_goals: u32, opponent_goals: u32) {
        log::info!("Scoreboard: {}-{}", player_goals, opponent_goals);
    }

    fn on_game_end(&mut self, result: &MatchResult) {
        println!(
            "Full time {}-{} on {}: {} ({} XP)",
            result.player_goals,
            result.opponent_goals,
            result.difficulty.as_str(),
            result.outcome().as_str(),
            result.xp_earned()
        );
    }
}

/// Chase the ball, carry it toward goal, shoot from range
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(m: &Match) -> (glam::Vec2, bool) {
    let goal = m.field.goal_center(GoalSide::Right);
    let player = m.player.body.pos;
    if m.player.has_ball {
        let shoot = player.distance(goal) < 260.0;
        ((goal - player).normalize_or_zero(), shoot)
    } else {
        ((m.ball.pos - player).normalize_or_zero(), false)
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let difficulty = match args.next() {
        Some(arg) => Difficulty::from_str(&arg).unwrap_or_else(|| {
            log::warn!("Unknown difficulty {:?}, using easy", arg);
            Difficulty::Easy
        }),
        None => Difficulty::Easy,
    };
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(1);

    let mut session = MatchSession::start(difficulty, seed, Box::new(LogListener));
    let mut kick_held = false;
    while session.result().is_none() {
        let Some(m) = session.game() else { break };
        let (movement, shoot) = autopilot(m);
        session.input.set_analog(movement);
        // Release between shots so every shot is a fresh press
        let press = shoot && !kick_held;
        session.input.set_kick(press);
        kick_held = press;
        session.update(SIM_DT);
    }
    session.teardown();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser entry point lives in `kickoff::web`
}
