//! Deterministic match simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by defender id)
//! - No rendering or platform dependencies

pub mod defender;
pub mod field;
pub mod goalkeeper;
pub mod input;
pub mod physics;
pub mod schedule;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use defender::{Action, Observation};
pub use field::{Field, GoalSide, Rect};
pub use input::{Direction, InputState, Intent};
pub use schedule::{DeferredAction, PendingAction};
pub use snapshot::{DefenderView, EntityView, FieldView, MatchSnapshot};
pub use state::{
    Body, DefenderAgent, DefenderState, GameEvent, Goalkeeper, Match, MatchPhase, MatchState,
    Player, Side, StatusBanner,
};
pub use tick::{advance_deferred, apply_deferred, clock_second, score_goal, teardown, tick};
