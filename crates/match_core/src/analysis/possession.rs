//! # Possession Assignment
//!
//! Decides which player, if any, controls the ball in a frame.
//!
//! ## Algorithm
//! 1. Threshold = mean player box height (scaled), or a fixed default when
//!    the frame has no players.
//! 2. Per player: distance from the ball centre to the nearer of the two
//!    foot points (bottom-left / bottom-right box corners).
//! 3. The nearest player wins if strictly under the threshold. Equal
//!    distances resolve to the lowest player id.

use crate::config::PossessionConfig;
use crate::models::{BBox, Frame, TeamId, TrackId, TrackRecord, Trajectory};
use nalgebra::{distance, Point2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

#[derive(Debug, Clone, Default)]
pub struct PossessionAssigner {
    config: PossessionConfig,
}

/// Distance from the ball to the nearer foot of a player box.
pub fn foot_distance(player: &BBox, ball_center: &Point2<f32>) -> f32 {
    let left = distance(&player.foot_left(), ball_center);
    let right = distance(&player.foot_right(), ball_center);
    left.min(right)
}

impl PossessionAssigner {
    pub fn new(config: PossessionConfig) -> Self {
        Self { config }
    }

    /// Distance gate for a set of player boxes.
    pub fn threshold<'a>(&self, boxes: impl Iterator<Item = &'a BBox>) -> f32 {
        let (sum, count) = boxes.fold((0.0f32, 0usize), |(s, n), b| (s + b.height(), n + 1));
        if count == 0 {
            self.config.default_threshold
        } else {
            sum / count as f32 * self.config.threshold_scale
        }
    }

    /// Player who possesses the ball, or `None` if nobody is close enough.
    pub fn assign(
        &self,
        players: &BTreeMap<TrackId, TrackRecord>,
        ball_bbox: &BBox,
    ) -> Option<TrackId> {
        if ball_bbox.is_degenerate() {
            trace!(?ball_bbox, "unusable ball box, no assignment");
            return None;
        }

        let candidates: Vec<(TrackId, &BBox)> = players
            .iter()
            .filter(|(_, rec)| !rec.bbox.is_degenerate())
            .map(|(id, rec)| (*id, &rec.bbox))
            .collect();

        let max_distance = self.threshold(candidates.iter().map(|(_, b)| *b));
        let ball_center = ball_bbox.center();

        let distances: Vec<(TrackId, f32)> = if self.config.parallel {
            candidates
                .par_iter()
                .map(|(id, b)| (*id, foot_distance(b, &ball_center)))
                .collect()
        } else {
            candidates
                .iter()
                .map(|(id, b)| (*id, foot_distance(b, &ball_center)))
                .collect()
        };

        // Ascending id order; strict comparison keeps the first of equals
        let mut best: Option<(TrackId, f32)> = None;
        for (id, d) in distances {
            if d < max_distance && best.map_or(true, |(_, bd)| d < bd) {
                best = Some((id, d));
            }
        }
        trace!(?best, max_distance, "possession");
        best.map(|(id, _)| id)
    }

    /// Assign possession for one frame and write `has_ball` on its players.
    ///
    /// Uses the first ball candidate; a frame without one has no possessor.
    pub fn assign_frame(&self, frame: &mut Frame) -> Option<TrackId> {
        let assigned = frame
            .primary_ball()
            .and_then(|(_, ball)| self.assign(&frame.players, &ball.bbox));

        for (id, rec) in frame.players.iter_mut() {
            rec.has_ball = Some(*id) == assigned;
        }
        assigned
    }

    /// Run `assign_frame` over a whole trajectory.
    pub fn assign_trajectory(&self, trajectory: &mut Trajectory) -> Vec<Option<TrackId>> {
        trajectory
            .frames
            .iter_mut()
            .map(|frame| self.assign_frame(frame))
            .collect()
    }
}

/// Team in control per frame.
///
/// A frame without a possessor inherits the previous frame's team; frames
/// before the first possession are `None`.
pub fn team_ball_control(trajectory: &Trajectory) -> Vec<Option<TeamId>> {
    let mut last: Option<TeamId> = None;
    trajectory
        .frames
        .iter()
        .map(|frame| {
            if let Some((_, rec)) = frame.possessor() {
                last = rec.team.or(last);
            }
            last
        })
        .collect()
}

/// Share of controlled frames per team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BallControlSummary {
    pub frames_controlled: BTreeMap<TeamId, usize>,
    pub total_frames: usize,
}

impl BallControlSummary {
    pub fn from_series(series: &[Option<TeamId>]) -> Self {
        let mut frames_controlled = BTreeMap::new();
        let mut total_frames = 0;
        for team in series.iter().flatten() {
            *frames_controlled.entry(*team).or_insert(0) += 1;
            total_frames += 1;
        }
        Self {
            frames_controlled,
            total_frames,
        }
    }

    /// Fraction of controlled frames held by `team`, in [0, 1].
    pub fn share(&self, team: TeamId) -> f32 {
        if self.total_frames == 0 {
            return 0.0;
        }
        self.frames_controlled.get(&team).copied().unwrap_or(0) as f32
            / self.total_frames as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(left: f32, top: f32, right: f32, bottom: f32) -> TrackRecord {
        TrackRecord::new(BBox::new(left, top, right, bottom))
    }

    fn ball_at(x: f32, y: f32) -> BBox {
        BBox::new(x - 4.0, y - 4.0, x + 4.0, y + 4.0)
    }

    #[test]
    fn test_single_player_within_threshold() {
        // Height 70 → threshold 70; ball 10 px from the left foot (6-8-10)
        let mut players = BTreeMap::new();
        players.insert(9, player(100.0, 30.0, 140.0, 100.0));
        let assigner = PossessionAssigner::default();

        assert_eq!(assigner.assign(&players, &ball_at(106.0, 108.0)), Some(9));
    }

    #[test]
    fn test_no_players_returns_none() {
        let assigner = PossessionAssigner::default();
        assert_eq!(assigner.assign(&BTreeMap::new(), &ball_at(10.0, 10.0)), None);
    }

    #[test]
    fn test_default_threshold_without_players() {
        let assigner = PossessionAssigner::default();
        assert_eq!(assigner.threshold(std::iter::empty()), 70.0);
    }

    #[test]
    fn test_ball_too_far() {
        let mut players = BTreeMap::new();
        players.insert(1, player(0.0, 0.0, 20.0, 50.0));
        let assigner = PossessionAssigner::default();
        // threshold 50, nearest foot (20, 50) is 60 px away
        assert_eq!(assigner.assign(&players, &ball_at(80.0, 50.0)), None);
        // exactly at the threshold is still too far
        assert_eq!(assigner.assign(&players, &ball_at(70.0, 50.0)), None);
        assert_eq!(assigner.assign(&players, &ball_at(69.0, 50.0)), Some(1));
    }

    #[test]
    fn test_nearest_player_wins() {
        let mut players = BTreeMap::new();
        players.insert(4, player(0.0, 0.0, 20.0, 60.0));
        players.insert(8, player(50.0, 0.0, 70.0, 60.0));
        let assigner = PossessionAssigner::default();
        // right foot of 4 at (20, 60): 15 px; left foot of 8 at (50, 60): 15 px → tie
        assert_eq!(assigner.assign(&players, &ball_at(35.0, 60.0)), Some(4));
        assert_eq!(assigner.assign(&players, &ball_at(38.0, 60.0)), Some(8));
    }

    #[test]
    fn test_tie_break_independent_of_parallelism() {
        let mut players = BTreeMap::new();
        for id in [30, 2, 17] {
            let x = 100.0 * (id % 3) as f32;
            players.insert(id, player(x, 0.0, x + 20.0, 60.0));
        }
        let ball = ball_at(60.0, 60.0);
        let parallel = PossessionAssigner::new(PossessionConfig::default());
        let serial = PossessionAssigner::new(PossessionConfig {
            parallel: false,
            ..PossessionConfig::default()
        });
        assert_eq!(parallel.assign(&players, &ball), serial.assign(&players, &ball));
    }

    #[test]
    fn test_degenerate_inputs() {
        let mut players = BTreeMap::new();
        players.insert(1, player(0.0, 0.0, 20.0, 60.0));
        players.insert(2, player(5.0, 60.0, 25.0, 60.0));
        let assigner = PossessionAssigner::default();

        assert_eq!(assigner.assign(&players, &BBox::new(5.0, 5.0, 5.0, 5.0)), None);
        // Degenerate player ignored, healthy one still assigned
        assert_eq!(assigner.assign(&players, &ball_at(22.0, 62.0)), Some(1));
    }

    #[test]
    fn test_assign_frame_sets_single_flag() {
        let mut frame = Frame::default();
        frame.players.insert(1, player(0.0, 0.0, 20.0, 60.0));
        let mut stale = player(200.0, 0.0, 220.0, 60.0);
        stale.has_ball = true;
        frame.players.insert(2, stale);
        frame.ball.insert(1, TrackRecord::new(ball_at(21.0, 58.0)));

        let assigner = PossessionAssigner::default();
        assert_eq!(assigner.assign_frame(&mut frame), Some(1));
        assert!(frame.players[&1].has_ball);
        assert!(!frame.players[&2].has_ball);

        frame.ball.clear();
        assert_eq!(assigner.assign_frame(&mut frame), None);
        assert!(frame.players.values().all(|p| !p.has_ball));
    }

    #[test]
    fn test_team_ball_control_carries_forward() {
        let mut frames = Vec::new();
        for owner in [None, Some((1, 1)), None, Some((2, 2)), None] {
            let mut f = Frame::default();
            f.players.insert(1, player(0.0, 0.0, 1.0, 1.0).with_team(1));
            f.players.insert(2, player(0.0, 0.0, 1.0, 1.0).with_team(2));
            if let Some((id, _)) = owner {
                f.players.get_mut(&id).unwrap().has_ball = true;
            }
            frames.push(f);
        }
        let series = team_ball_control(&Trajectory::new(frames));
        assert_eq!(
            series,
            vec![None, Some(TeamId(1)), Some(TeamId(1)), Some(TeamId(2)), Some(TeamId(2))]
        );

        let summary = BallControlSummary::from_series(&series);
        assert_eq!(summary.total_frames, 4);
        assert!((summary.share(TeamId(1)) - 0.5).abs() < 1e-6);
        assert_eq!(summary.share(TeamId(3)), 0.0);
    }
}
