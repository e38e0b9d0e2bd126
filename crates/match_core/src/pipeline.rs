//! # Match Pipeline
//!
//! Runs every stage over a loaded trajectory, in order:
//!
//! 1. Ball candidate validation (only with a [`FrameSource`])
//! 2. Drop candidates marked invalid
//! 3. Optional gap interpolation
//! 4. Ball smoothing, one filter per ball track
//! 5. Possession per frame
//! 6. Team ball control
//! 7. Pass tracking over consecutive frame pairs
//! 8. Pass network and space occupancy
//!
//! Annotations (`is_valid_ball`, `has_ball`, `position_smoothed`) are written
//! into the trajectory in place; aggregates come back as a [`MatchReport`].

use crate::analysis::{
    team_ball_control, BallControlSummary, PassEventTracker, PassNetwork, PossessionAssigner,
    SpaceOccupancy,
};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::models::{TeamId, TrackId, Trajectory};
use crate::tracking::{drop_invalid_balls, interpolate_ball_positions, smooth_ball_track};
use crate::vision::BallCandidateValidator;
use image::RgbImage;
use serde::Serialize;
use std::borrow::Cow;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Pixel access for frame `n` of the footage.
pub trait FrameSource {
    fn frame(&self, frame_num: usize) -> Option<Cow<'_, RgbImage>>;
}

impl FrameSource for [RgbImage] {
    fn frame(&self, frame_num: usize) -> Option<Cow<'_, RgbImage>> {
        self.get(frame_num).map(Cow::Borrowed)
    }
}

impl FrameSource for Vec<RgbImage> {
    fn frame(&self, frame_num: usize) -> Option<Cow<'_, RgbImage>> {
        self.as_slice().frame(frame_num)
    }
}

/// Frames stored as `frame_{n}.png` (or `.jpg`) in one directory, decoded
/// on demand.
#[derive(Debug, Clone)]
pub struct ImageDirSource {
    dir: PathBuf,
}

impl ImageDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, frame_num: usize) -> Option<PathBuf> {
        ["png", "jpg", "jpeg"]
            .iter()
            .map(|ext| self.dir.join(format!("frame_{frame_num}.{ext}")))
            .find(|p| p.is_file())
    }

    pub fn load(&self, frame_num: usize) -> Result<Option<RgbImage>> {
        let Some(path) = self.path_for(frame_num) else {
            return Ok(None);
        };
        Ok(Some(image::open(path)?.to_rgb8()))
    }
}

impl FrameSource for ImageDirSource {
    fn frame(&self, frame_num: usize) -> Option<Cow<'_, RgbImage>> {
        match self.load(frame_num) {
            Ok(img) => img.map(Cow::Owned),
            Err(e) => {
                warn!(frame_num, error = %e, "failed to decode frame");
                None
            }
        }
    }
}

/// Aggregated output of one pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchReport {
    pub frames: usize,
    pub validated_frames: usize,
    pub accepted_candidates: usize,
    pub dropped_candidates: usize,
    pub interpolated_frames: usize,
    pub ball_tracks: usize,
    pub possession: Vec<Option<TrackId>>,
    pub team_control: Vec<Option<TeamId>>,
    pub ball_control: BallControlSummary,
    pub passes: PassEventTracker,
    pub network: PassNetwork,
    pub occupancy: SpaceOccupancy,
}

impl MatchReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MatchPipeline {
    config: AnalysisConfig,
    interpolate: bool,
}

impl MatchPipeline {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            interpolate: false,
        })
    }

    /// Fill ball gaps before smoothing.
    pub fn with_interpolation(mut self, enabled: bool) -> Self {
        self.interpolate = enabled;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn run(
        &self,
        trajectory: &mut Trajectory,
        frames: Option<&dyn FrameSource>,
    ) -> MatchReport {
        info!(frames = trajectory.len(), "analysis started");

        let mut validated_frames = 0;
        let mut accepted_candidates = 0;
        if let Some(source) = frames {
            let validator = BallCandidateValidator::new(self.config.ball.clone());
            for (n, frame) in trajectory.frames.iter_mut().enumerate() {
                let Some(pixels) = source.frame(n) else {
                    debug!(frame = n, "no pixels, candidates left unvalidated");
                    continue;
                };
                accepted_candidates += validator.validate_frame(frame, &pixels);
                validated_frames += 1;
            }
        }

        let dropped_candidates = drop_invalid_balls(trajectory);
        let interpolated_frames = if self.interpolate {
            interpolate_ball_positions(trajectory)
        } else {
            0
        };
        let ball_tracks = smooth_ball_track(trajectory, &self.config.filter);

        let assigner = PossessionAssigner::new(self.config.possession.clone());
        let possession = assigner.assign_trajectory(trajectory);
        let team_control = team_ball_control(trajectory);
        let ball_control = BallControlSummary::from_series(&team_control);

        let mut passes = PassEventTracker::new(self.config.pass.clone());
        let pass_count = passes.observe_trajectory(trajectory);

        let network = PassNetwork::from_trajectory(trajectory);
        let occupancy = SpaceOccupancy::from_trajectory(trajectory, &self.config.occupancy);

        info!(
            validated_frames,
            dropped_candidates,
            interpolated_frames,
            pass_events = pass_count,
            "analysis finished"
        );

        MatchReport {
            frames: trajectory.len(),
            validated_frames,
            accepted_candidates,
            dropped_candidates,
            interpolated_frames,
            ball_tracks,
            possession,
            team_control,
            ball_control,
            passes,
            network,
            occupancy,
        }
    }
}
