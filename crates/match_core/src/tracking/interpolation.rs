//! Ball gap filling.
//!
//! Frames whose ball collection is empty (never detected, or removed by
//! validation) get a box linearly interpolated between the surrounding
//! detections. Leading gaps take the first known box, trailing gaps the
//! last one. The recorded ball speed is filled the same way so a filled
//! frame still takes part in the pass speed gate.

use crate::models::{BBox, Trajectory, TrackRecord, BALL_TRACK_ID};
use tracing::debug;

/// Remove ball candidates explicitly marked invalid.
///
/// Candidates never validated (`is_valid_ball == None`) are kept.
pub fn drop_invalid_balls(trajectory: &mut Trajectory) -> usize {
    let mut removed = 0;
    for frame in &mut trajectory.frames {
        let before = frame.ball.len();
        frame.ball.retain(|_, rec| rec.is_valid_ball != Some(false));
        removed += before - frame.ball.len();
    }
    if removed > 0 {
        debug!(removed, "dropped invalid ball candidates");
    }
    removed
}

/// Fill frames without a ball box. Returns the number of frames filled.
pub fn interpolate_ball_positions(trajectory: &mut Trajectory) -> usize {
    let known: Vec<(usize, BBox, Option<f32>)> = trajectory
        .frames
        .iter()
        .enumerate()
        .filter_map(|(i, f)| f.primary_ball().map(|(_, rec)| (i, rec.bbox, rec.speed)))
        .collect();

    let (Some(&(first_idx, first_box, first_speed)), Some(&(last_idx, last_box, last_speed))) =
        (known.first(), known.last())
    else {
        return 0;
    };

    let mut filled = 0;
    let mut next_known = 0usize;
    for (i, frame) in trajectory.frames.iter_mut().enumerate() {
        if !frame.ball.is_empty() {
            continue;
        }
        let (bbox, speed) = if i < first_idx {
            (first_box, first_speed)
        } else if i > last_idx {
            (last_box, last_speed)
        } else {
            while known[next_known].0 < i {
                next_known += 1;
            }
            let (hi_idx, hi_box, hi_speed) = known[next_known];
            let (lo_idx, lo_box, lo_speed) = known[next_known - 1];
            let t = (i - lo_idx) as f32 / (hi_idx - lo_idx) as f32;
            (lo_box.lerp(&hi_box, t), lerp_speed(lo_speed, hi_speed, t))
        };
        let mut rec = TrackRecord::new(bbox);
        rec.speed = speed;
        frame.ball.insert(BALL_TRACK_ID, rec);
        filled += 1;
    }

    debug!(filled, "interpolated ball frames");
    filled
}

/// Missing on one side holds the other side's value.
fn lerp_speed(lo: Option<f32>, hi: Option<f32>, t: f32) -> Option<f32> {
    match (lo, hi) {
        (Some(a), Some(b)) => Some(a + (b - a) * t),
        (a, b) => a.or(b),
    }
}
