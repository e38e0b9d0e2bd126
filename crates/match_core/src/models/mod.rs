//! # Track Data Model
//!
//! Plain per-frame track records shared by every analysis stage.

pub mod track;
pub mod trajectory;

pub use track::{BBox, TeamId, TrackId, TrackRecord};
pub use trajectory::{Frame, Trajectory, BALL_TRACK_ID};
