//! # match_core - Possession and Pass Analytics for Tracked Match Footage
//!
//! Consumes per-frame player and ball tracks from an upstream detector and
//! turns them into possession, pass and space-control statistics.
//!
//! ## Features
//! - Ball candidate validation from box size and pixel colour
//! - Constant-velocity smoothing of the ball track
//! - Deterministic possession assignment (ties resolve to the lowest id)
//! - Pass/turnover state machine with per-player counters
//! - Pass network and pitch occupancy aggregates

// Doc formatting lints - purely cosmetic, fix incrementally
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// NaN-rejecting comparisons are written as negated comparisons
#![allow(clippy::neg_cmp_op_on_partial_ord)]
// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod tracking;
pub mod vision;

pub use error::{CoreError, Result};

pub use analysis::{
    PassEvent, PassEventTracker, PassNetwork, PlayerPassStats, PossessionAssigner,
    PossessionState, SpaceOccupancy,
};
pub use config::AnalysisConfig;
pub use models::{BBox, Frame, TeamId, TrackId, TrackRecord, Trajectory};
pub use pipeline::{FrameSource, ImageDirSource, MatchPipeline, MatchReport};
pub use tracking::PositionFilter;
pub use vision::BallCandidateValidator;
