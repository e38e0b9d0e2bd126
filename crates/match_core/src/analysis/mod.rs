//! # Match Analysis Module
//!
//! Everything downstream of the cleaned ball track: who has the ball, which
//! team controls play, how possession moves between players and where each
//! team occupies the pitch.
//!
//! ## Structure
//! - `possession`: per-frame possessor and team ball control
//! - `pass_events`: possession state machine and per-player pass counters
//! - `pass_network`: teammate option graph
//! - `space_occupancy`: pitch grid control shares

pub mod pass_events;
pub mod pass_network;
pub mod possession;
pub mod space_occupancy;

pub use pass_events::{
    classify_transition, PassEvent, PassEventTracker, PassRecord, PlayerPassStats,
    PossessionState,
};
pub use pass_network::{PassEdge, PassNetwork};
pub use possession::{foot_distance, team_ball_control, BallControlSummary, PossessionAssigner};
pub use space_occupancy::SpaceOccupancy;
