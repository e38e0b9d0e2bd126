//! Frames and trajectories.
//!
//! On disk a trajectory uses the tracker's layout: two parallel per-frame
//! arrays, one for players and one for ball candidates, each entry mapping
//! track id to record.
//!
//! ```json
//! { "players": [ { "7": { "bbox": [..], "team": 1 } } ],
//!   "ball":    [ { "1": { "bbox": [..] } } ] }
//! ```

use super::track::{TrackId, TrackRecord};
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Track id the interpolation step assigns to filled-in ball records.
pub const BALL_TRACK_ID: TrackId = 1;

/// One frame: the player collection and the ball-candidate collection.
///
/// `BTreeMap` keeps iteration in ascending id order, which the possession
/// tie-break relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub players: BTreeMap<TrackId, TrackRecord>,
    pub ball: BTreeMap<TrackId, TrackRecord>,
}

impl Frame {
    /// The player flagged with `has_ball`, lowest id first.
    pub fn possessor(&self) -> Option<(TrackId, &TrackRecord)> {
        self.players
            .iter()
            .find(|(_, rec)| rec.has_ball)
            .map(|(id, rec)| (*id, rec))
    }

    /// First ball candidate in id order, if any survived validation.
    pub fn primary_ball(&self) -> Option<(TrackId, &TrackRecord)> {
        self.ball.iter().next().map(|(id, rec)| (*id, rec))
    }

    /// Speed recorded on the primary ball record; missing means stationary.
    pub fn ball_speed(&self) -> f32 {
        self.primary_ball()
            .and_then(|(_, rec)| rec.speed)
            .unwrap_or(0.0)
    }
}

/// Ordered frames indexed by frame number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TracksFile", into = "TracksFile")]
pub struct Trajectory {
    pub frames: Vec<Frame>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TracksFile {
    #[serde(default)]
    players: Vec<BTreeMap<TrackId, TrackRecord>>,
    #[serde(default)]
    ball: Vec<BTreeMap<TrackId, TrackRecord>>,
}

impl TryFrom<TracksFile> for Trajectory {
    type Error = CoreError;

    fn try_from(file: TracksFile) -> Result<Self> {
        if file.players.len() != file.ball.len() {
            return Err(CoreError::TrajectoryMismatch {
                players: file.players.len(),
                ball: file.ball.len(),
            });
        }
        let frames = file
            .players
            .into_iter()
            .zip(file.ball)
            .map(|(players, ball)| Frame { players, ball })
            .collect();
        Ok(Self { frames })
    }
}

impl From<Trajectory> for TracksFile {
    fn from(t: Trajectory) -> Self {
        let (players, ball) = t.frames.into_iter().map(|f| (f.players, f.ball)).unzip();
        Self { players, ball }
    }
}

impl Trajectory {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, frame_num: usize) -> Result<&Frame> {
        self.frames.get(frame_num).ok_or(CoreError::FrameOutOfRange {
            frame: frame_num,
            len: self.frames.len(),
        })
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
